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

//! A small XML element tree.
//!
//! Documents are read into an owned tree of [`Element`]s which can be
//! modified in place and written back. Everything except character
//! data is kept exactly as found in the input: start tags keep their
//! attribute quoting and spacing, comments, CDATA sections and
//! processing instructions are passed through.

use anyhow::{anyhow, bail, Context};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// An attribute of an element.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute {
    pub(crate) key: String,
    /// The value as written in the document, entities are not
    /// expanded.
    pub(crate) raw_value: String,
}

/// A node in the content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data with entities expanded.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// The start tag as written in the document, without the angle
    /// brackets: the name followed by the attributes.
    start_tag: String,
    pub children: Vec<Node>,
    /// Written as `<name/>` when there is no content.
    pub self_closing: bool,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, self_closing: bool) -> anyhow::Result<Self> {
        let name = utf8(start.name().as_ref())?;
        for attribute in start.attributes() {
            attribute.with_context(|| format!("Invalid attribute in element <{name}>"))?;
        }
        Ok(Self {
            name,
            start_tag: utf8(start)?,
            children: Vec::new(),
            self_closing,
        })
    }

    fn start(&self) -> BytesStart<'_> {
        BytesStart::from_content(self.start_tag.as_str(), self.name.len())
    }

    #[cfg(test)]
    pub(crate) fn attributes(&self) -> anyhow::Result<Vec<Attribute>> {
        let mut attributes = Vec::new();
        for attribute in self.start().attributes() {
            let attribute = attribute
                .with_context(|| format!("Invalid attribute in element <{}>", self.name))?;
            attributes.push(Attribute {
                key: utf8(attribute.key.as_ref())?,
                raw_value: utf8(&attribute.value)?,
            });
        }
        Ok(attributes)
    }

    /// Look up the raw value of the attribute named `key`.
    #[cfg(test)]
    pub(crate) fn attribute(&self, key: &str) -> Option<String> {
        self.attributes()
            .ok()?
            .into_iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| attribute.raw_value)
    }

    /// The character data before the first child node, if any.
    ///
    /// A leading comment or processing instruction ends the direct
    /// text: in `<a><!-- c -->foo</a>` the element has no text and
    /// `foo` is not returned.
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Replace the character data before the first child node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.children.first_mut() {
            Some(Node::Text(existing)) => *existing = text,
            _ => self.children.insert(0, Node::Text(text)),
        }
        self.self_closing = false;
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Append character data, merging it with a preceding text node.
    fn push_text(&mut self, text: String) {
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(&text),
            _ => self.children.push(Node::Text(text)),
        }
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> anyhow::Result<()> {
        if self.self_closing && self.children.is_empty() {
            writer.write_event(Event::Empty(self.start()))?;
            return Ok(());
        }

        writer.write_event(Event::Start(self.start()))?;
        for child in &self.children {
            write_node(child, writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Nodes between the XML declaration and the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Nodes after the root element.
    pub epilog: Vec<Node>,
}

impl Document {
    /// Parse `content` into a document.
    ///
    /// Line endings are normalized to `\n`. The XML declaration of the
    /// input is dropped, [`Document::to_xml`] writes its own.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let content = normalize_line_endings(content);
        let mut reader = Reader::from_str(&content);
        reader.config_mut().trim_text(false);

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .with_context(|| format!("Could not parse XML near byte {position}"))?;
            let node = match event {
                Event::Eof => break,
                Event::Decl(_) => continue,
                Event::Start(start) => {
                    stack.push(Element::from_start(&start, false)?);
                    continue;
                }
                Event::End(end) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| anyhow!("Unexpected closing tag near byte {position}"))?;
                    if end.name().as_ref() != element.name.as_bytes() {
                        bail!("Closing tag does not match <{}>", element.name);
                    }
                    Node::Element(element)
                }
                Event::Empty(start) => Node::Element(Element::from_start(&start, true)?),
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .with_context(|| format!("Invalid character data near byte {position}"))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.push_text(text),
                        None if text.trim().is_empty() => {
                            let misc = if root.is_some() { &mut epilog } else { &mut prolog };
                            misc.push(Node::Text(text));
                        }
                        None => bail!("Character data outside of the root element"),
                    }
                    continue;
                }
                Event::CData(cdata) => Node::CData(utf8(&cdata)?),
                Event::Comment(comment) => Node::Comment(utf8(&comment)?),
                Event::PI(pi) => Node::ProcessingInstruction(utf8(&pi)?),
                Event::DocType(doctype) => Node::DocType(utf8(&doctype)?),
            };

            match (stack.last_mut(), node) {
                (Some(parent), node) => parent.children.push(node),
                (None, Node::Element(element)) => {
                    if root.is_some() {
                        bail!("Document has more than one root element");
                    }
                    root = Some(element);
                }
                (None, node) if root.is_some() => epilog.push(node),
                (None, node) => prolog.push(node),
            }
        }

        if let Some(element) = stack.last() {
            bail!("Element <{}> is not closed", element.name);
        }
        let root = root.ok_or_else(|| anyhow!("Document has no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Read and parse the document at `path`.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Could not parse {}", path.display()))
    }

    /// Serialize the document with a UTF-8 XML declaration.
    pub fn to_xml(&self) -> anyhow::Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if !matches!(self.prolog.first(), Some(Node::Text(_))) {
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }
        for node in &self.prolog {
            write_node(node, &mut writer)?;
        }
        self.root.write(&mut writer)?;
        for node in &self.epilog {
            write_node(node, &mut writer)?;
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Write the document to `path`.
    pub fn write_file(&self, path: &Path) -> anyhow::Result<()> {
        let xml = self.to_xml()?;
        fs::write(path, xml).with_context(|| format!("Failed to write file: {}", path.display()))
    }
}

fn write_node<W: std::io::Write>(node: &Node, writer: &mut Writer<W>) -> anyhow::Result<()> {
    match node {
        Node::Element(element) => return element.write(writer),
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?
        }
        Node::CData(cdata) => writer.write_event(Event::CData(BytesCData::new(cdata.as_str())))?,
        Node::Comment(comment) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?
        }
        Node::ProcessingInstruction(pi) => {
            writer.write_event(Event::PI(BytesPI::new(pi.as_str())))?
        }
        Node::DocType(doctype) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?
        }
    }
    Ok(())
}

/// Replace `\r\n` and lone `\r` with `\n`.
fn normalize_line_endings(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

fn utf8(bytes: &[u8]) -> anyhow::Result<String> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}
