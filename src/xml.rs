//! Minimal element tree for `.aqua` documents.
//!
//! Documents are small and flat, so they are parsed completely into memory
//! before anything in the scene is touched.

use crate::error::SceneError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, keeping its original position if it already exists.
    pub fn set_attr(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric attribute; absent or unparsable values read as `0.0`.
    pub fn attr_f64(&self, key: &str) -> f64 {
        self.attr(key)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Appends `child` and hands back a reference to it.
    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Serializes `root` with an XML declaration and no indentation.
pub fn write_document(root: &Element) -> Result<String, SceneError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    write_element(&mut writer, root)?;
    writer.write_event(Event::Text(BytesText::new("\n")))?;
    String::from_utf8(writer.into_inner()).map_err(|e| SceneError::Xml(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<(), SceneError> {
    let mut start = BytesStart::new(el.name.as_str());
    for (k, v) in &el.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

/// Parses a whole document and returns its root element.
pub fn parse_document(text: &str) -> Result<Element, SceneError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => open.push(element_from(&e)?),
            Event::Empty(e) => {
                let el = element_from(&e)?;
                close(&mut open, &mut root, el)?;
            }
            Event::End(_) => {
                let el = open
                    .pop()
                    .ok_or_else(|| SceneError::Xml("unbalanced end tag".to_string()))?;
                close(&mut open, &mut root, el)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !open.is_empty() {
        return Err(SceneError::Xml("unexpected end of document".to_string()));
    }
    root.ok_or(SceneError::MissingRoot)
}

fn close(open: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<(), SceneError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => return Err(SceneError::Xml("more than one root element".to_string())),
    }
    Ok(())
}

fn element_from(start: &BytesStart) -> Result<Element, SceneError> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attrs.push((key, value));
    }
    Ok(el)
}
