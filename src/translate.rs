// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This file contains main logic used by the binary `godot-doc-translate`.

use crate::source::find_files;
use crate::xml::{Document, Element};
use crate::{translate_text, TranslationMap};
use anyhow::{anyhow, Context};
use log::{debug, error, info};
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Elements whose text is translated.
pub const TRANSLATABLE_TAGS: [&str; 4] = ["brief_description", "description", "member", "constant"];

/// Translate the text of `element` and all its descendants.
///
/// Only the direct text of elements in [`TRANSLATABLE_TAGS`] is
/// replaced. Attributes, text following child elements and all other
/// nodes are left alone.
pub fn translate_element(element: &mut Element, translations: &TranslationMap) {
    if TRANSLATABLE_TAGS.contains(&element.name.as_str()) {
        if let Some(text) = element.text().filter(|text| !text.is_empty()) {
            let translated = translate_text(text, translations);
            element.set_text(translated);
        }
    }

    for child in element.child_elements_mut() {
        translate_element(child, translations);
    }
}

/// Translate an entire document.
pub fn translate_document(document: &mut Document, translations: &TranslationMap) {
    translate_element(&mut document.root, translations);
}

/// Translate the XML file at `path` and write it below `output_dir`.
///
/// The output keeps the position of `path` relative to `source_dir`.
/// Returns the path of the written file.
pub fn translate_file(
    path: &Path,
    source_dir: &Path,
    output_dir: &Path,
    translations: &TranslationMap,
) -> anyhow::Result<PathBuf> {
    let mut document = Document::from_file(path)?;
    translate_document(&mut document, translations);

    let relative_path = path
        .strip_prefix(source_dir)
        .with_context(|| format!("{} is not below {}", path.display(), source_dir.display()))?;
    let output_path = output_dir.join(relative_path);
    let parent = output_path
        .parent()
        .ok_or_else(|| anyhow!("Invalid output path: {}", output_path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    document.write_file(&output_path)?;
    Ok(output_path)
}

/// Outcome of translating a tree of documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub total: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{} files", self.succeeded, self.total)
    }
}

/// Translate every XML file below `source_dir` into `output_dir`.
///
/// A file which cannot be translated is reported and skipped, the
/// remaining files are still processed.
pub fn translate_tree(
    source_dir: &Path,
    output_dir: &Path,
    translations: &TranslationMap,
) -> anyhow::Result<Summary> {
    let files = find_files(source_dir, "xml")?;
    info!("Found {} XML files to process", files.len());

    let mut summary = Summary {
        succeeded: 0,
        total: files.len(),
    };
    if files.is_empty() {
        info!("No XML files found to translate.");
        return Ok(summary);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    for (idx, path) in files.iter().enumerate() {
        let name = path.file_name().unwrap_or(path.as_os_str());
        info!("Processing [{}/{}]: {}", idx + 1, files.len(), name.to_string_lossy());
        match translate_file(path, source_dir, output_dir, translations) {
            Ok(output_path) => {
                debug!("Wrote {}", output_path.display());
                summary.succeeded += 1;
            }
            Err(err) => error!("Error processing {}: {err:#}", path.display()),
        }
    }

    Ok(summary)
}
