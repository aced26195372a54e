use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node of the JSON-compatible XML tree.
///
/// Serializes to the `{"type": ..., "content": ...}` objects of the tree
/// format; see [Content] for how collapsed and omitted content is written.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root of a converted document, `"type": "xml"`
    Document(Document),
    Element(Element),
    /// `{"type": "text", "content": ...}`
    Text(String),
    /// A text node written as a bare JSON string
    Str(String),
    Comment(String),
    CData(String),
    /// An object whose `type` is none of the known kinds. Only produced when
    /// reading a tree from JSON.
    Unrecognized { kind: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// `None` when the attribute map was omitted for being empty
    pub attrs: Option<Attributes>,
    pub self_closing: bool,
    pub content: Content,
}

/// Children of a document or element.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// The `content` field is omitted
    Empty,
    /// A lone child stored in place of a one-element list
    Single(Box<Node>),
    Many(Vec<Node>),
}

/// Attribute map preserving document order. Keys are unique.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Node {
    /// Shorthand for an element with no attributes and no children.
    pub fn element<S: Into<String>>(name: S) -> Node {
        Node::Element(Element::new(name))
    }

    pub fn text<S: Into<String>>(content: S) -> Node {
        Node::Text(content.into())
    }

    /// The `type` discriminant of this node. Bare strings report `text`.
    pub fn kind(&self) -> &str {
        match self {
            Node::Document(_) => "xml",
            Node::Element(_) => "element",
            Node::Text(_) | Node::Str(_) => "text",
            Node::Comment(_) => "comment",
            Node::CData(_) => "cdata",
            Node::Unrecognized { kind } => kind.as_str(),
        }
    }

    /// Children in sequence form, empty for leaf nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(doc) => doc.content.nodes(),
            Node::Element(elem) => elem.content.nodes(),
            _ => &[],
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(elem) => Some(elem),
            _ => None,
        }
    }

    /// String payload of text, comment and CDATA nodes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) | Node::Str(s) | Node::Comment(s) | Node::CData(s) => Some(s),
            _ => None,
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Document { content: Content::Many(children) }
    }
}

impl Element {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Element {
            name: name.into(),
            attrs: Some(Attributes::default()),
            self_closing: false,
            content: Content::Many(vec![]),
        }
    }

    #[must_use]
    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attrs.get_or_insert_with(Attributes::default).insert(key, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.content.push(child);
        self
    }

    #[must_use]
    pub fn self_closing(mut self, self_closing: bool) -> Self {
        self.self_closing = self_closing;
        self
    }

    /// Attribute value by name; a missing map reads as empty.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(elem)
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Node::Document(doc)
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Many(vec![])
    }
}

impl Content {
    /// Normalized sequence view. `Empty` is no children, `Single` is one.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Content::Empty => &[],
            Content::Single(node) => std::slice::from_ref(node.as_ref()),
            Content::Many(nodes) => nodes,
        }
    }

    /// Append a child, expanding to sequence form first.
    pub fn push(&mut self, node: Node) {
        match std::mem::replace(self, Content::Empty) {
            Content::Empty => *self = Content::Many(vec![node]),
            Content::Single(first) => *self = Content::Many(vec![*first, node]),
            Content::Many(mut nodes) => {
                nodes.push(node);
                *self = Content::Many(nodes);
            }
        }
    }

    pub fn into_vec(self) -> Vec<Node> {
        match self {
            Content::Empty => vec![],
            Content::Single(node) => vec![*node],
            Content::Many(nodes) => nodes,
        }
    }

    /// Finalize the children of a closed node.
    ///
    /// `omit_empty` turns an empty list into `Empty` and `collapse` turns a
    /// one-element list into `Single`.
    pub fn finalize(mut nodes: Vec<Node>, omit_empty: bool, collapse: bool) -> Content {
        if omit_empty && nodes.is_empty() {
            return Content::Empty;
        }
        if collapse && nodes.len() == 1 {
            if let Some(only) = nodes.pop() {
                return Content::Single(Box::new(only));
            }
        }
        Content::Many(nodes)
    }

    fn is_omitted(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

impl Attributes {
    pub fn new() -> Self {
        Attributes(vec![])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the original position of a replaced key.
    /// Returns the previous value.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item=(K, V)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

// Serialization

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Str(s) => serializer.serialize_str(s),
            Node::Text(s) => leaf(serializer, "text", s),
            Node::Comment(s) => leaf(serializer, "comment", s),
            Node::CData(s) => leaf(serializer, "cdata", s),
            Node::Document(doc) => {
                let len = if doc.content.is_omitted() { 1 } else { 2 };
                let mut st = serializer.serialize_struct("Node", len)?;
                st.serialize_field("type", "xml")?;
                if !doc.content.is_omitted() {
                    st.serialize_field("content", &doc.content)?;
                }
                st.end()
            }
            Node::Element(elem) => {
                let mut st = serializer.serialize_struct("Node", 5)?;
                st.serialize_field("type", "element")?;
                st.serialize_field("name", &elem.name)?;
                match &elem.attrs {
                    Some(attrs) => st.serialize_field("attrs", attrs)?,
                    None => st.skip_field("attrs")?,
                }
                if elem.content.is_omitted() {
                    st.skip_field("content")?;
                } else {
                    st.serialize_field("content", &elem.content)?;
                }
                st.serialize_field("selfClosing", &elem.self_closing)?;
                st.end()
            }
            Node::Unrecognized { kind } => {
                let mut st = serializer.serialize_struct("Node", 1)?;
                st.serialize_field("type", kind)?;
                st.end()
            }
        }
    }
}

fn leaf<S: Serializer>(serializer: S, kind: &'static str, content: &str) -> Result<S::Ok, S::Error> {
    let mut st = serializer.serialize_struct("Node", 2)?;
    st.serialize_field("type", kind)?;
    st.serialize_field("content", content)?;
    st.end()
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Content::Empty => serializer.serialize_unit(),
            Content::Single(node) => node.serialize(serializer),
            Content::Many(nodes) => nodes.serialize(serializer),
        }
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// Deserialization accepts every shape the builder emits: bare strings as
// text, collapsed or missing content, missing attrs.

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Bare(String),
    Object(ObjectRepr),
}

#[derive(Deserialize)]
struct ObjectRepr {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    attrs: Option<Attributes>,
    #[serde(default)]
    content: Option<ContentRepr>,
    #[serde(rename = "selfClosing", default)]
    self_closing: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentRepr {
    Many(Vec<Node>),
    Single(Box<Node>),
}

impl ContentRepr {
    /// Leaf nodes hold a string, possibly wrapped in a list
    fn into_string(self) -> String {
        let first = match self {
            ContentRepr::Single(node) => Some(*node),
            ContentRepr::Many(nodes) => nodes.into_iter().next(),
        };
        match first {
            Some(Node::Str(s)) | Some(Node::Text(s)) => s,
            _ => String::new(),
        }
    }
}

impl From<Option<ContentRepr>> for Content {
    fn from(repr: Option<ContentRepr>) -> Self {
        match repr {
            None => Content::Empty,
            Some(ContentRepr::Single(node)) => Content::Single(node),
            Some(ContentRepr::Many(nodes)) => Content::Many(nodes),
        }
    }
}

impl From<NodeRepr> for Node {
    fn from(repr: NodeRepr) -> Self {
        let obj = match repr {
            NodeRepr::Bare(s) => return Node::Str(s),
            NodeRepr::Object(obj) => obj,
        };
        let text = |content: Option<ContentRepr>| content.map(ContentRepr::into_string).unwrap_or_default();
        match obj.kind.as_str() {
            "xml" => Node::Document(Document { content: obj.content.into() }),
            "element" => Node::Element(Element {
                name: obj.name,
                attrs: obj.attrs,
                self_closing: obj.self_closing,
                content: obj.content.into(),
            }),
            "text" => Node::Text(text(obj.content)),
            "comment" => Node::Comment(text(obj.content)),
            "cdata" => Node::CData(text(obj.content)),
            _ => Node::Unrecognized { kind: obj.kind },
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeRepr::deserialize(deserializer).map(Node::from)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                let mut attrs = Attributes::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    attrs.insert(k, v);
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}
