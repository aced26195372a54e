use crate::event::{Event, EventReader};
use crate::node::{Content, Document, Element, Node};
use crate::options::Options;
use crate::report::ErrorReporter;
use crate::xmlchar::XmlStr;

/// A node still waiting for its closing event. Owns its children until then.
enum Frame {
    Document(Vec<Node>),
    Element(Element, Vec<Node>),
}

/// Reduces parse events to a [Node] tree.
pub struct TreeBuilder<'r> {
    options: Options,
    reporter: &'r mut dyn ErrorReporter,
    stack: Vec<Frame>,
    result: Option<Node>,
}

impl<'r> TreeBuilder<'r> {
    pub fn new(options: Options, reporter: &'r mut dyn ErrorReporter) -> Self {
        TreeBuilder {
            options,
            reporter,
            stack: vec![],
            result: None,
        }
    }

    /// Build the tree of `xml`. Malformed input is reported, never fatal;
    /// past the first problem the shape of the tree is best-effort.
    pub fn build(mut self, xml: &str) -> Node {
        log::debug!("building tree from {} bytes with {:?}", xml.len(), self.options);
        for event in EventReader::new(xml) {
            match event {
                Ok(event) => self.handle(event),
                Err(diagnostic) => self.report(&diagnostic.to_string()),
            }
        }
        self.result.take().unwrap_or_else(|| Node::Document(Document::default()))
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::StartDocument => self.stack.push(Frame::Document(vec![])),
            Event::Text(text) => {
                if self.options.skip_empty_texts && text.is_xml_blank() {
                    return;
                }
                let node = if self.options.text_nodes_to_str {
                    Node::Str(text.into_owned())
                } else {
                    Node::Text(text.into_owned())
                };
                self.append(node);
            }
            Event::Comment(text) => self.append(Node::Comment(text.to_string())),
            Event::CData(text) => self.append(Node::CData(text.to_string())),
            Event::OpenElement { name, attributes, self_closing } => {
                let attrs = if self.options.omit_empty_attrs && attributes.is_empty() {
                    None
                } else {
                    Some(attributes)
                };
                let element = Element {
                    name: name.to_string(),
                    attrs,
                    self_closing,
                    content: Content::Empty,
                };
                self.stack.push(Frame::Element(element, vec![]));
            }
            Event::CloseElement { name } => self.close_element(&name),
            Event::EndDocument => self.end_document(),
        }
    }

    fn close_element(&mut self, name: &str) {
        let open = self.stack.iter().rposition(|frame| match frame {
            Frame::Element(element, _) => element.name == name,
            Frame::Document(_) => false,
        });
        let Some(index) = open else {
            self.report(&format!("unexpected close tag </{}>", name));
            return;
        };
        while self.stack.len() > index + 1 {
            self.close_unclosed();
        }
        self.close_top();
    }

    fn end_document(&mut self) {
        while self.stack.len() > 1 {
            self.close_unclosed();
        }
        if let Some(Frame::Document(children)) = self.stack.pop() {
            let content = Content::finalize(children, false, self.options.extract_only_childs);
            self.result = Some(Node::Document(Document { content }));
        }
    }

    fn close_unclosed(&mut self) {
        if let Some(Frame::Element(element, _)) = self.stack.last() {
            let message = format!("unclosed tag <{}>", element.name);
            self.report(&message);
        }
        self.close_top();
    }

    /// Finalize the top element and hand it to its parent.
    fn close_top(&mut self) {
        if let Some(Frame::Element(mut element, children)) = self.stack.pop() {
            element.content = Content::finalize(
                children,
                self.options.omit_empty_content,
                self.options.extract_only_childs,
            );
            self.append(Node::Element(element));
        }
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(Frame::Document(children)) | Some(Frame::Element(_, children)) => children.push(node),
            None => {}
        }
    }

    fn report(&mut self, message: &str) {
        log::debug!("{}", message);
        self.reporter.report(message);
    }
}
