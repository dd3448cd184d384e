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

//! Translate the Godot class reference.
//!
//! This program clones the Godot repository at a given tag, reads
//! the `doc/translations/xx.po` catalog for the requested language
//! and writes translated copies of the XML files below `doc/` into
//! an output directory, by default `translated_doc_xx`.

use anyhow::{bail, Context};
use clap::Parser;
use godot_doc_i18n::build_translation_map;
use godot_doc_i18n::catalog::{load_catalog, po_files, translated_messages, CatalogStats};
use godot_doc_i18n::source::{clone_repository, GODOT_REPO_URL};
use godot_doc_i18n::translate::translate_tree;
use log::{error, info};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Parser)]
#[command(about = "Translate the Godot class reference with a Gettext catalog.")]
struct Cli {
    /// The Godot release tag to translate, such as `4.3-stable`.
    tag: String,
    /// The language to translate into, such as `fr` or `zh_CN`.
    lang: String,
    /// The repository to clone.
    #[arg(long, default_value = GODOT_REPO_URL)]
    repo_url: String,
    /// Where to clone the repository.
    #[arg(long, default_value = "godot")]
    checkout_dir: PathBuf,
    /// Use this PO file instead of `doc/translations/<lang>.po`.
    #[arg(long, value_name = "lang.po")]
    catalog: Option<PathBuf>,
    /// Directory for the translated files [default: translated_doc_<lang>].
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Use an existing checkout without running git.
    #[arg(long)]
    skip_clone: bool,
}

impl Cli {
    fn doc_dir(&self) -> PathBuf {
        self.checkout_dir.join("doc")
    }

    fn catalog_path(&self) -> PathBuf {
        match &self.catalog {
            Some(path) => path.clone(),
            None => self
                .doc_dir()
                .join("translations")
                .join(format!("{}.po", self.lang)),
        }
    }

    fn output_dir(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("translated_doc_{}", self.lang)),
        }
    }
}

/// Log the catalogs which are available next to the missing `path`.
fn report_missing_catalog(path: &Path) {
    let Some(directory) = path.parent() else {
        return;
    };
    match po_files(directory) {
        Ok(files) => {
            error!("Available files in {}:", directory.display());
            for file in files {
                let name = file.file_name().unwrap_or(file.as_os_str());
                error!("  - {}", name.to_string_lossy());
            }
        }
        Err(err) => error!("Could not list {}: {err:#}", directory.display()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    info!("Tag: {}", cli.tag);
    info!("Lang: {}", cli.lang);

    if !cli.skip_clone {
        clone_repository(&cli.repo_url, &cli.tag, &cli.checkout_dir)?;
    }

    let doc_dir = cli.doc_dir();
    if !doc_dir.is_dir() {
        bail!("Documentation directory {} not found", doc_dir.display());
    }

    let catalog_path = cli.catalog_path();
    info!("Reading translation file: {}", catalog_path.display());
    if !catalog_path.is_file() {
        report_missing_catalog(&catalog_path);
        bail!("Translation file {} not found", catalog_path.display());
    }
    let catalog = load_catalog(&catalog_path)?;
    info!(
        "Parsed catalog for language {:?}: {}",
        catalog.metadata.language,
        CatalogStats::for_catalog(&catalog)
    );

    let translations = build_translation_map(translated_messages(&catalog));
    info!("Created translation map with {} entries", translations.len());
    if translations.is_empty() {
        info!("No translated entries in the catalog, the output will be untranslated.");
    }

    let output_dir = cli.output_dir();
    let summary = translate_tree(&doc_dir, &output_dir, &translations)
        .with_context(|| format!("Could not translate {}", doc_dir.display()))?;
    info!("Translation complete!");
    info!("  Successfully processed: {summary}");
    info!("  Output directory: {}", output_dir.display());

    Ok(())
}
