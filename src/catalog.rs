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

//! Reading translations from Gettext PO files.

use anyhow::{anyhow, bail, Context};
use polib::catalog::Catalog;
use polib::po_file;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Header fields the PO parser expects to find in every catalog.
const REQUIRED_HEADER_FIELDS: [&str; 9] = [
    "Project-Id-Version",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Language-Team",
    "MIME-Version",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Language",
    "Plural-Forms",
];

/// Return the required header fields which are absent from `content`.
fn missing_header_fields(content: &str) -> Vec<&'static str> {
    REQUIRED_HEADER_FIELDS
        .into_iter()
        .filter(|field| !content.contains(&format!("\"{field}:")))
        .collect()
}

/// Load the catalog at `path`.
///
/// Catalogs with an incomplete header are rejected up front.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let missing = missing_header_fields(&content);
    if !missing.is_empty() {
        bail!("{path:?} is missing the header fields: {}", missing.join(", "));
    }
    po_file::parse(path)
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Could not parse {path:?} as PO file"))
}

/// Return the `(msgid, msgstr)` pairs of the translated messages.
///
/// Fuzzy messages and messages without a translation are left out,
/// as are plural messages since the class reference has none.
pub fn translated_messages(catalog: &Catalog) -> Vec<(String, String)> {
    catalog
        .messages()
        .filter(|msg| msg.is_singular() && msg.is_translated() && !msg.is_fuzzy())
        .filter_map(|msg| Some((msg.msgid().to_string(), msg.msgstr().ok()?.to_string())))
        .collect()
}

/// Given a directory path, returns the paths of all the `.po` files in it.
pub fn po_files(directory: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = fs::read_dir(directory)?
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let path = entry.path();
            if path.extension()? == "po" {
                Some(Ok(path))
            } else {
                None
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    files.sort();
    Ok(files)
}

/// Counts of translation message statuses.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CatalogStats {
    pub translated_count: usize,
    pub untranslated_count: usize,
    pub fuzzy_count: usize,
}

impl CatalogStats {
    /// Returns counts of messages statuses in the given catalog.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self::default();
        for message in catalog.messages() {
            if message.is_fuzzy() {
                stats.fuzzy_count += 1;
            } else if message.is_translated() {
                stats.translated_count += 1;
            } else {
                stats.untranslated_count += 1;
            }
        }
        stats
    }

    /// Returns the total number of messages.
    pub fn total(&self) -> usize {
        self.translated_count + self.untranslated_count + self.fuzzy_count
    }
}

impl Display for CatalogStats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} entries: {} translated, {} untranslated, {} fuzzy",
            self.total(),
            self.translated_count,
            self.untranslated_count,
            self.fuzzy_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"msgid ""
msgstr ""
"Project-Id-Version: Godot Engine class reference\n"
"Report-Msgid-Bugs-To: https://github.com/godotengine/godot\n"
"POT-Creation-Date: 2024-08-15 12:00+0000\n"
"PO-Revision-Date: 2024-08-20 09:30+0000\n"
"Last-Translator: Anonymous <noreply@weblate.org>\n"
"Language-Team: French <https://hosted.weblate.org/projects/godot-engine/godot-class-reference/fr/>\n"
"Language: fr\n"
"MIME-Version: 1.0\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Content-Transfer-Encoding: 8bit\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"
"X-Generator: Weblate 5.7\n"
"#;

    const MESSAGES: &str = r#"
#: doc/classes/Node.xml
msgid "Base class for all scene objects."
msgstr "Classe de base pour tous les objets de scène."

#: doc/classes/Node.xml
msgid ""
"First line.\n"
"Second line."
msgstr ""
"Première ligne.\n"
"Deuxième ligne."

#: doc/classes/Node.xml
msgid "Not translated yet."
msgstr ""

#: doc/classes/Node.xml
#, fuzzy
msgid "Needs review."
msgstr "À relire."
"#;

    fn write_catalog(dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join("fr.po");
        fs::write(&path, format!("{HEADER}{MESSAGES}"))?;
        Ok(path)
    }

    #[test]
    fn translated_messages_skip_fuzzy_and_empty() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let catalog = load_catalog(&write_catalog(tmp_dir.path())?)?;
        assert_eq!(
            translated_messages(&catalog),
            vec![
                (
                    String::from("Base class for all scene objects."),
                    String::from("Classe de base pour tous les objets de scène.")
                ),
                (
                    String::from("First line.\nSecond line."),
                    String::from("Première ligne.\nDeuxième ligne.")
                ),
            ]
        );
        Ok(())
    }

    #[test]
    fn catalog_stats() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let catalog = load_catalog(&write_catalog(tmp_dir.path())?)?;
        let stats = CatalogStats::for_catalog(&catalog);
        assert_eq!(
            stats,
            CatalogStats {
                translated_count: 2,
                untranslated_count: 1,
                fuzzy_count: 1,
            }
        );
        assert_eq!(
            stats.to_string(),
            "4 entries: 2 translated, 1 untranslated, 1 fuzzy"
        );
        Ok(())
    }

    #[test]
    fn load_catalog_missing_file() {
        assert!(load_catalog(Path::new("does-not-exist.po")).is_err());
    }

    #[test]
    fn load_catalog_short_header() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("fr.po");
        let short_header = "msgid \"\"\nmsgstr \"\"\n\"Language: fr\\n\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n";
        fs::write(&path, format!("{short_header}{MESSAGES}"))?;

        let err = load_catalog(&path).err().unwrap();
        let message = format!("{err:#}");
        assert!(message.contains("Project-Id-Version"), "{message}");
        assert!(message.contains("Plural-Forms"), "{message}");
        assert!(!message.contains("Content-Type"), "{message}");
        Ok(())
    }

    #[test]
    fn missing_header_fields_complete() {
        assert_eq!(missing_header_fields(HEADER), Vec::<&str>::new());
        assert_eq!(missing_header_fields(""), REQUIRED_HEADER_FIELDS.to_vec());
    }

    #[test]
    fn po_files_lists_catalogs() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        fs::write(tmp_dir.path().join("fr.po"), "")?;
        fs::write(tmp_dir.path().join("de.po"), "")?;
        fs::write(tmp_dir.path().join("classes.pot"), "")?;
        assert_eq!(
            po_files(tmp_dir.path())?,
            vec![tmp_dir.path().join("de.po"), tmp_dir.path().join("fr.po")]
        );
        Ok(())
    }
}
