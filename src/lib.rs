//! Conversion between XML documents and a JSON-compatible node tree.
//!
//! ```
//! use xmljson::{to_json, to_xml, Profile};
//!
//! let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a x=\"1\">hi<b /></a>";
//! let tree = to_json(xml, Profile::Strict);
//! assert_eq!(xml, to_xml(&tree));
//! ```

pub mod error;
pub mod event;
pub mod node;
pub mod options;
pub mod parse;
pub mod report;
pub mod serialize;
pub mod wasm;

mod entity;
mod xmlchar;

use std::path::Path;

use serde::Deserialize;

pub use crate::error::{Diagnostic, Error, Result, TextPos};
pub use crate::node::{Attributes, Content, Document, Element, Node};
pub use crate::options::{Options, Profile};
pub use crate::parse::TreeBuilder;
pub use crate::report::{ErrorReporter, IgnoreReporter, StderrReporter};
pub use crate::serialize::TreeSerializer;

/// Build the tree of `xml`, reporting malformed input to standard error.
pub fn to_json<O: Into<Options>>(xml: &str, options: O) -> Node {
    to_json_with(xml, options, &mut StderrReporter)
}

pub fn to_json_with<O: Into<Options>>(xml: &str, options: O, reporter: &mut dyn ErrorReporter) -> Node {
    TreeBuilder::new(options.into(), reporter).build(xml)
}

/// Read a UTF-8 file without blocking the runtime, then convert it.
#[cfg(not(target_arch = "wasm32"))]
pub async fn to_json_from_file<P: AsRef<Path>, O: Into<Options>>(path: P, options: O) -> Result<Node> {
    let xml = tokio::fs::read_to_string(path).await?;
    Ok(to_json(&xml, options))
}

pub fn to_json_from_file_sync<P: AsRef<Path>, O: Into<Options>>(path: P, options: O) -> Result<Node> {
    let xml = std::fs::read_to_string(path)?;
    Ok(to_json(&xml, options))
}

/// Read a tree back from its JSON text. Nesting depth is not limited.
pub fn tree_from_json(json: &str) -> Result<Node> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let node = Node::deserialize(&mut de)?;
    de.end()?;
    Ok(node)
}

/// Render a tree as XML, reporting unrecognized nodes to standard error.
pub fn to_xml(node: &Node) -> String {
    to_xml_with(node, &mut StderrReporter)
}

pub fn to_xml_with(node: &Node, reporter: &mut dyn ErrorReporter) -> String {
    TreeSerializer::new(reporter).render(node)
}
