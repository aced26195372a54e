use crate::node::{Element, Node};
use crate::report::ErrorReporter;

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Renders trees back to XML text.
///
/// Compacted shapes are accepted: bare strings are text nodes, omitted
/// content is no children and a single content node is one child. The
/// output has no added whitespace.
pub struct TreeSerializer<'r> {
    reporter: &'r mut dyn ErrorReporter,
}

impl<'r> TreeSerializer<'r> {
    pub fn new(reporter: &'r mut dyn ErrorReporter) -> Self {
        TreeSerializer { reporter }
    }

    pub fn render(&mut self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&mut self, node: &Node, out: &mut String) {
        match node {
            Node::Document(doc) => {
                out.push_str(XML_HEADER);
                for child in doc.content.nodes() {
                    self.write_node(child, out);
                }
            }
            Node::Element(element) => self.write_element(element, out),
            Node::Text(text) | Node::Str(text) => escape_text(text, out),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::CData(text) => {
                out.push_str("<![CDATA[");
                out.push_str(text);
                out.push_str("]]>");
            }
            Node::Unrecognized { kind } => {
                // contributes nothing, siblings still render
                let message = format!("unrecognized node type: {}", kind);
                log::debug!("{}", message);
                self.reporter.report(&message);
            }
        }
    }

    fn write_element(&mut self, element: &Element, out: &mut String) {
        out.push('<');
        out.push_str(&element.name);
        if let Some(attrs) = &element.attrs {
            // values are written as they are, a '"' in a value breaks the output
            for (key, value) in attrs.iter() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(value);
                out.push('"');
            }
        }
        if element.self_closing {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in element.content.nodes() {
            self.write_node(child, out);
        }
        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }
}

/// Escape the five XML metacharacters. Single pass, so `&` in a
/// replacement is never escaped again.
pub fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_order() {
        let mut out = String::new();
        escape_text("a&lt;b \"c\" 'd' <e>", &mut out);
        assert_eq!("a&amp;lt;b &quot;c&quot; &apos;d&apos; &lt;e&gt;", out);
    }
}
