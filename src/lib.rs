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

//! Helpers for translating the Godot class reference.
//!
//! The class reference is a tree of XML files under `doc/` in the
//! Godot repository. Translations of the descriptions are maintained
//! as GNU Gettext `xx.po` files in `doc/translations/`. The functions
//! here substitute the translated text into the XML files while
//! keeping the XML structure and the original indentation intact.

use std::collections::HashMap;

pub mod catalog;
pub mod source;
pub mod translate;
pub mod xml;

/// Lookup table from source text to translated text.
pub type TranslationMap = HashMap<String, String>;

/// Build a [`TranslationMap`] from `(source, translated)` pairs.
///
/// Pairs with an empty translation are skipped, we never want to
/// translate a text into a blank string. When a source text occurs
/// more than once, the last non-empty translation wins.
///
/// # Examples
///
/// ```
/// use godot_doc_i18n::build_translation_map;
///
/// let translations = build_translation_map(vec![
///     (String::from("a"), String::from("x")),
///     (String::from("a"), String::from("z")),
///     (String::from("b"), String::new()),
/// ]);
/// assert_eq!(translations.len(), 1);
/// assert_eq!(translations["a"], "z");
/// ```
pub fn build_translation_map<I>(pairs: I) -> TranslationMap
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut translations = TranslationMap::new();
    for (source, translated) in pairs {
        if !translated.is_empty() {
            translations.insert(source, translated);
        }
    }
    translations
}

fn first_non_blank_line(text: &str) -> Option<&str> {
    text.lines().find(|line| !line.trim().is_empty())
}

/// Find the leading whitespace shared by all non-blank lines of `text`.
///
/// The indentation is found by comparing the first non-blank line
/// before and after dedenting the text.
///
/// # Examples
///
/// ```
/// use godot_doc_i18n::extract_common_indentation;
///
/// assert_eq!(extract_common_indentation("\t\tfoo\n\t\t\tbar"), "\t\t");
/// assert_eq!(extract_common_indentation("foo"), "");
/// assert_eq!(extract_common_indentation(" \n\n"), "");
/// ```
pub fn extract_common_indentation(text: &str) -> String {
    let Some(original_first) = first_non_blank_line(text) else {
        return String::new();
    };
    let dedented = textwrap::dedent(text);
    let dedented_first = first_non_blank_line(&dedented).unwrap_or(original_first);
    let width = original_first.len().saturating_sub(dedented_first.len());
    original_first.get(..width).unwrap_or_default().to_string()
}

/// Split `text` into leading newlines, the content and the trailing
/// whitespace.
///
/// Concatenating the three parts gives back `text`.
fn split_surrounding_whitespace(text: &str) -> (&str, &str, &str) {
    let without_leading = text.trim_start_matches('\n');
    let (prefix, _) = text.split_at(text.len() - without_leading.len());
    let content = without_leading.trim_end();
    let (_, suffix) = without_leading.split_at(content.len());
    (prefix, content, suffix)
}

/// Translate `text` using `translations`.
///
/// Text found verbatim in `translations` is replaced by its
/// translation. Otherwise the text is stripped of its leading
/// newlines, trailing whitespace and common indentation and looked
/// up again. On a match, the translation is indented like the
/// original text and wrapped in the original surrounding whitespace.
///
/// Text without a translation is returned unchanged.
///
/// # Examples
///
/// ```
/// use godot_doc_i18n::{build_translation_map, translate_text};
///
/// let translations = build_translation_map(vec![(
///     String::from("Hello world."),
///     String::from("Bonjour le monde."),
/// )]);
/// assert_eq!(
///     translate_text("\n    Hello world.\n    ", &translations),
///     "\n    Bonjour le monde.\n    "
/// );
/// ```
pub fn translate_text(text: &str, translations: &TranslationMap) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    if let Some(translated) = translations.get(text) {
        return translated.clone();
    }

    let (prefix, content, suffix) = split_surrounding_whitespace(text);
    let indentation = extract_common_indentation(content);
    let dedented = textwrap::dedent(content);

    match translations.get(&dedented) {
        Some(translated) => {
            let indented = textwrap::indent(translated, &indentation);
            format!("{prefix}{indented}{suffix}")
        }
        None => text.to_string(),
    }
}
