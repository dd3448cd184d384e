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

use godot_doc_i18n::build_translation_map;
use godot_doc_i18n::catalog::{load_catalog, translated_messages};
use godot_doc_i18n::translate::{translate_tree, Summary};
use pretty_assertions::assert_eq;
use std::fs;

const CATALOG: &str = r#"msgid ""
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

#: doc/classes/Timer.xml
msgid "A countdown timer."
msgstr "Un minuteur."

#: doc/classes/Timer.xml
msgid ""
"Counts down a specified interval.\n"
"[codeblock]\n"
"var timer = Timer.new()\n"
"[/codeblock]"
msgstr ""
"Décompte un intervalle donné.\n"
"[codeblock]\n"
"var timer = Timer.new()\n"
"[/codeblock]"

#: doc/classes/Timer.xml
msgid "If [code]true[/code], the timer stops after reaching the end."
msgstr "Si [code]true[/code], le minuteur s'arrête à la fin."

#: doc/classes/Timer.xml
msgid "Emitted when the timer reaches 0."
msgstr ""
"#;

const TIMER_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>
<class name=\"Timer\" inherits=\"Node\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:noNamespaceSchemaLocation=\"../class.xsd\">
\t<brief_description>
\t\tA countdown timer.
\t</brief_description>
\t<description>
\t\tCounts down a specified interval.
\t\t[codeblock]
\t\tvar timer = Timer.new()
\t\t[/codeblock]
\t</description>
\t<tutorials>
\t</tutorials>
\t<members>
\t\t<member name=\"one_shot\" type=\"bool\" setter=\"set_one_shot\" getter=\"is_one_shot\" default=\"false\">
\t\t\tIf [code]true[/code], the timer stops after reaching the end.
\t\t</member>
\t</members>
\t<signals>
\t\t<signal name=\"timeout\">
\t\t\t<description>
\t\t\t\tEmitted when the timer reaches 0.
\t\t\t</description>
\t\t</signal>
\t</signals>
</class>
";

const TRANSLATED_TIMER_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<class name=\"Timer\" inherits=\"Node\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:noNamespaceSchemaLocation=\"../class.xsd\">
\t<brief_description>
\t\tUn minuteur.
\t</brief_description>
\t<description>
\t\tDécompte un intervalle donné.
\t\t[codeblock]
\t\tvar timer = Timer.new()
\t\t[/codeblock]
\t</description>
\t<tutorials>
\t</tutorials>
\t<members>
\t\t<member name=\"one_shot\" type=\"bool\" setter=\"set_one_shot\" getter=\"is_one_shot\" default=\"false\">
\t\t\tSi [code]true[/code], le minuteur s'arrête à la fin.
\t\t</member>
\t</members>
\t<signals>
\t\t<signal name=\"timeout\">
\t\t\t<description>
\t\t\t\tEmitted when the timer reaches 0.
\t\t\t</description>
\t\t</signal>
\t</signals>
</class>
";

#[test]
fn translate_class_reference() -> anyhow::Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let doc_dir = tmp_dir.path().join("godot/doc");
    let output_dir = tmp_dir.path().join("translated_doc_fr");
    fs::create_dir_all(doc_dir.join("classes"))?;
    fs::create_dir_all(doc_dir.join("translations"))?;
    fs::write(doc_dir.join("classes/Timer.xml"), TIMER_XML)?;
    fs::write(doc_dir.join("translations/fr.po"), CATALOG)?;

    let catalog = load_catalog(&doc_dir.join("translations/fr.po"))?;
    let translations = build_translation_map(translated_messages(&catalog));
    assert_eq!(translations.len(), 3);

    let summary = translate_tree(&doc_dir, &output_dir, &translations)?;
    assert_eq!(
        summary,
        Summary {
            succeeded: 1,
            total: 1
        }
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("classes/Timer.xml"))?,
        TRANSLATED_TIMER_XML
    );
    Ok(())
}

#[test]
fn translate_without_translations_keeps_text() -> anyhow::Result<()> {
    let tmp_dir = tempfile::tempdir()?;
    let doc_dir = tmp_dir.path().join("doc");
    let output_dir = tmp_dir.path().join("out");
    fs::create_dir_all(&doc_dir)?;
    fs::write(doc_dir.join("Timer.xml"), TIMER_XML)?;

    let translations = build_translation_map(Vec::new());
    translate_tree(&doc_dir, &output_dir, &translations)?;

    // Only the XML declaration is rewritten.
    let output = fs::read_to_string(output_dir.join("Timer.xml"))?;
    assert_eq!(
        output,
        TIMER_XML.replace(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>",
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        )
    );
    Ok(())
}
