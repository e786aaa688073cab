//! In-memory XML element tree
//!
//! The TEI serializer produces this tree instead of bytes so that serialization
//! stays a pure structural transform; encoding happens at the edge through
//! [`XmlElement::to_xml_document`], which runs the tree through a
//! `quick_xml::Writer`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{DramaError, Result};

/// One node of the tree: a child element or a text span.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Character data; escaped on write
    Text(String),
}

/// An XML element with ordered attributes and ordered children.
///
/// Attribute and child order is preserved exactly as inserted, so two trees
/// built the same way compare equal and serialize identically.
///
/// # Examples
///
/// ```rust
/// use dramatei_core::XmlElement;
///
/// let tree = XmlElement::new("sp")
///     .with_attr("who", "#hilse")
///     .with_child(XmlElement::new("speaker").with_text("Hilse"));
///
/// let xml = tree.to_xml_string().unwrap();
/// assert_eq!(xml, r##"<sp who="#hilse"><speaker>Hilse</speaker></sp>"##);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Tag name
    pub name: String,
    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in insertion order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an element with no attributes and no children.
    #[inline]
    #[must_use = "creates an empty element"]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, builder style.
    #[must_use = "returns the element with the attribute added"]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Adds a child element, builder style.
    #[must_use = "returns the element with the child added"]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Adds a text child, builder style.
    #[must_use = "returns the element with the text added"]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Appends a child element in place and returns a reference to it.
    pub fn push_element(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(XmlNode::Element(child));
        match self.children.last_mut() {
            Some(XmlNode::Element(element)) => element,
            _ => unreachable!("just pushed an element"),
        }
    }

    /// Appends a text child in place.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Returns the value of an attribute, if set.
    #[must_use = "returns the attribute value if present"]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates the direct child elements (skipping text nodes).
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Iterates the direct child elements with the given tag name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.child_elements()
            .filter(move |element| element.name == name)
    }

    /// Finds the first descendant element with the given tag name,
    /// depth-first, including self.
    #[must_use = "returns the first matching descendant"]
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        if self.name == name {
            return Some(self);
        }
        self.child_elements()
            .find_map(|element| element.find(name))
    }

    /// Concatenated text content of this element and its descendants.
    #[must_use = "returns the concatenated text content"]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Serializes the tree to a compact XML string without a declaration.
    ///
    /// Intended for tests and for embedding fragments; whole-document output
    /// goes through [`Self::to_xml_document`].
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        bytes_to_string(writer.into_inner())
    }

    /// Serializes the tree to a UTF-8 XML document: declaration first, then
    /// the tree indented with two spaces per level.
    ///
    /// Returns bytes ready to hand to a file writer.
    pub fn to_xml_document(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_into(&mut writer)?;
        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for node in &self.children {
            match node {
                XmlNode::Element(element) => element.write_into(writer)?,
                XmlNode::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn bytes_to_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| DramaError::ConversionError(format!("generated XML is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_self_closes() {
        let element = XmlElement::new("listPerson");
        assert_eq!(element.to_xml_string().unwrap(), "<listPerson/>");
    }

    #[test]
    fn test_nested_structure() {
        let tree = XmlElement::new("div")
            .with_attr("type", "scene")
            .with_child(XmlElement::new("stage").with_text("Ein Zimmer."));
        assert_eq!(
            tree.to_xml_string().unwrap(),
            r#"<div type="scene"><stage>Ein Zimmer.</stage></div>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let element = XmlElement::new("l").with_text("Krieg & <Frieden>");
        let xml = element.to_xml_string().unwrap();
        assert_eq!(xml, "<l>Krieg &amp; &lt;Frieden&gt;</l>");
    }

    #[test]
    fn test_attribute_value_is_escaped() {
        let element = XmlElement::new("sp").with_attr("who", "#a&b");
        let xml = element.to_xml_string().unwrap();
        assert!(
            xml.contains("who=\"#a&amp;b\""),
            "attribute should be escaped, got: {xml}"
        );
    }

    #[test]
    fn test_attribute_lookup() {
        let element = XmlElement::new("language")
            .with_attr("ident", "de")
            .with_attr("usage", "100");
        assert_eq!(element.attribute("ident"), Some("de"));
        assert_eq!(element.attribute("usage"), Some("100"));
        assert_eq!(element.attribute("missing"), None);
    }

    #[test]
    fn test_find_descends_depth_first() {
        let tree = XmlElement::new("TEI").with_child(
            XmlElement::new("teiHeader")
                .with_child(XmlElement::new("fileDesc").with_child(XmlElement::new("titleStmt"))),
        );
        assert!(tree.find("titleStmt").is_some());
        assert!(tree.find("body").is_none());
    }

    #[test]
    fn test_children_named_filters_direct_children_only() {
        let tree = XmlElement::new("body")
            .with_child(XmlElement::new("div").with_attr("type", "act"))
            .with_child(XmlElement::new("div").with_attr("type", "act"))
            .with_child(XmlElement::new("note"));
        assert_eq!(tree.children_named("div").count(), 2);
        assert_eq!(tree.children_named("note").count(), 1);
        assert_eq!(tree.children_named("div").next().unwrap().attribute("type"), Some("act"));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let tree = XmlElement::new("sp")
            .with_child(XmlElement::new("speaker").with_text("Hilse"))
            .with_child(XmlElement::new("p").with_text("Nu ja ja!"));
        assert_eq!(tree.text_content(), "HilseNu ja ja!");
    }

    #[test]
    fn test_document_form_has_declaration_and_indent() {
        let tree = XmlElement::new("TEI")
            .with_child(XmlElement::new("text").with_child(XmlElement::new("body")));
        let bytes = tree.to_xml_document().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(
            text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"),
            "document should start with the XML declaration, got: {text}"
        );
        assert!(text.contains("\n  <text>"), "children should be indented, got: {text}");
        assert!(text.ends_with('\n'), "document should end with a newline");
    }

    #[test]
    fn test_push_element_returns_reference() {
        let mut root = XmlElement::new("body");
        let scene = root.push_element(XmlElement::new("div").with_attr("type", "scene"));
        scene.push_text("placeholder");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.text_content(), "placeholder");
    }

    #[test]
    fn test_equal_construction_compares_equal() {
        let a = XmlElement::new("l").with_attr("n", "1").with_text("text");
        let b = XmlElement::new("l").with_attr("n", "1").with_text("text");
        assert_eq!(a, b);
    }
}
