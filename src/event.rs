use std::borrow::Cow;
use std::collections::VecDeque;

use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::entity::decode_references;
use crate::error::{Diagnostic, TextPos};
use crate::node::Attributes;
use crate::xmlchar::XmlChar;

/// Parse events in document order.
#[derive(Debug, PartialEq)]
pub enum Event<'a> {
    StartDocument,
    Text(Cow<'a, str>),
    Comment(&'a str),
    CData(&'a str),
    OpenElement { name: &'a str, attributes: Attributes, self_closing: bool },
    CloseElement { name: Cow<'a, str> },
    EndDocument,
}

#[derive(Debug, PartialEq)]
enum State {
    Start,
    Body,
    Finished,
}

struct PendingTag<'a> {
    name: &'a str,
    attributes: Attributes,
}

/// Pull-based adapter from [xmlparser] tokens to [Event]s.
///
/// Always yields `StartDocument` first and `EndDocument` last. Problems are
/// yielded as `Err` items between events; a tokenizer error ends the token
/// stream but not the event stream.
pub struct EventReader<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    queue: VecDeque<Result<Event<'a>, Diagnostic>>,
    state: State,
    pending: Option<PendingTag<'a>>,
    depth: usize,
    in_dtd: bool,
    failed: bool,
    // end of the last token, for recovering whitespace the tokenizer skips
    last_end: usize,
}

impl<'a> EventReader<'a> {
    pub fn new(text: &'a str) -> Self {
        // a byte order mark and whitespace before the first token are dropped
        let body = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        let body = body.trim_start_matches(|c: char| c.is_xml_whitespace());
        EventReader {
            text,
            tokenizer: Tokenizer::from(text),
            queue: VecDeque::new(),
            state: State::Start,
            pending: None,
            depth: 0,
            in_dtd: false,
            failed: false,
            last_end: text.len() - body.len(),
        }
    }

    fn pull(&mut self) {
        if self.failed {
            self.finish();
            return;
        }
        match self.tokenizer.next() {
            None => {
                if self.depth == 0 && self.pending.is_none() {
                    self.flush_gap(self.text.len());
                }
                self.finish();
            }
            Some(Err(e)) => {
                self.failed = true;
                self.queue.push_back(Err(Diagnostic::new(e.to_string())));
            }
            Some(Ok(token)) => self.process(token),
        }
    }

    fn finish(&mut self) {
        if let Some(tag) = self.pending.take() {
            self.queue.push_back(Err(Diagnostic::new(format!("unfinished start tag <{}>", tag.name))));
        }
        self.queue.push_back(Ok(Event::EndDocument));
        self.state = State::Finished;
    }

    /// Whitespace the tokenizer skipped outside the root element
    fn flush_gap(&mut self, until: usize) {
        if until > self.last_end {
            let gap = &self.text[self.last_end..until];
            self.queue.push_back(Ok(Event::Text(Cow::Borrowed(gap))));
        }
    }

    fn process(&mut self, token: Token<'a>) {
        let span = token_span(&token);
        if self.depth == 0 && self.pending.is_none() && !self.in_dtd {
            self.flush_gap(span.start());
        }
        self.last_end = span.end();

        match token {
            Token::Declaration { .. } |
            Token::ProcessingInstruction { .. } |
            Token::EntityDeclaration { .. } |
            Token::EmptyDtd { .. } => {}
            Token::DtdStart { .. } => self.in_dtd = true,
            Token::DtdEnd { .. } => self.in_dtd = false,
            Token::Comment { text, .. } => self.queue.push_back(Ok(Event::Comment(text.as_str()))),
            Token::Cdata { text, .. } => self.queue.push_back(Ok(Event::CData(text.as_str()))),
            Token::Text { text } => {
                let decoded = self.decode(text);
                self.queue.push_back(Ok(Event::Text(decoded)));
            }
            Token::ElementStart { prefix, local, .. } => {
                let text: &'a str = self.text;
                let name = if prefix.as_str().is_empty() {
                    local.as_str()
                } else {
                    &text[prefix.start()..local.end()]
                };
                self.pending = Some(PendingTag { name, attributes: Attributes::new() });
            }
            Token::Attribute { prefix, local, value, .. } => {
                let name = qualified_name(prefix, local);
                let value = self.decode(value);
                let Some(tag) = self.pending.as_mut() else { return };
                if tag.attributes.contains_key(&name) {
                    let message = format!("duplicate attribute '{}' on <{}>", name, tag.name);
                    self.report(message, prefix.start().min(local.start()));
                } else {
                    tag.attributes.insert(name, value);
                }
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => {
                    if let Some(tag) = self.pending.take() {
                        self.depth += 1;
                        self.queue.push_back(Ok(Event::OpenElement {
                            name: tag.name,
                            attributes: tag.attributes,
                            self_closing: false,
                        }));
                    }
                }
                ElementEnd::Empty => {
                    if let Some(tag) = self.pending.take() {
                        self.queue.push_back(Ok(Event::OpenElement {
                            name: tag.name,
                            attributes: tag.attributes,
                            self_closing: true,
                        }));
                        self.queue.push_back(Ok(Event::CloseElement { name: Cow::Borrowed(tag.name) }));
                    }
                }
                ElementEnd::Close(prefix, local) => {
                    self.depth = self.depth.saturating_sub(1);
                    self.queue.push_back(Ok(Event::CloseElement { name: qualified_name(prefix, local) }));
                }
            },
        }
    }

    fn decode(&mut self, span: StrSpan<'a>) -> Cow<'a, str> {
        let mut invalid = vec![];
        let decoded = decode_references(span.as_str(), &mut invalid);
        for reference in invalid {
            let message = format!("invalid character entity '{}'", reference.text);
            self.report(message, span.start() + reference.offset);
        }
        decoded
    }

    fn report(&mut self, message: String, offset: usize) {
        let pos = TextPos::of(self.text, offset);
        self.queue.push_back(Err(Diagnostic::at(message, pos)));
    }
}

impl<'a> Iterator for EventReader<'a> {
    type Item = Result<Event<'a>, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Some(item);
            }
            match self.state {
                State::Start => {
                    self.state = State::Body;
                    return Some(Ok(Event::StartDocument));
                }
                State::Body => self.pull(),
                State::Finished => return None,
            }
        }
    }
}

fn qualified_name<'a>(prefix: StrSpan<'a>, local: StrSpan<'a>) -> Cow<'a, str> {
    if prefix.as_str().is_empty() {
        Cow::Borrowed(local.as_str())
    } else {
        Cow::Owned(format!("{}:{}", prefix.as_str(), local.as_str()))
    }
}

fn token_span<'a>(token: &Token<'a>) -> StrSpan<'a> {
    match *token {
        Token::Declaration { span, .. } |
        Token::ProcessingInstruction { span, .. } |
        Token::Comment { span, .. } |
        Token::DtdStart { span, .. } |
        Token::EmptyDtd { span, .. } |
        Token::EntityDeclaration { span, .. } |
        Token::DtdEnd { span, .. } |
        Token::ElementStart { span, .. } |
        Token::Attribute { span, .. } |
        Token::ElementEnd { span, .. } |
        Token::Cdata { span, .. } => span,
        Token::Text { text } => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(xml: &str) -> Vec<Result<Event, Diagnostic>> {
        EventReader::new(xml).collect()
    }

    fn open<'a>(name: &'a str, attributes: Vec<(&str, &str)>, self_closing: bool) -> Result<Event<'a>, Diagnostic> {
        Ok(Event::OpenElement { name, attributes: attributes.into_iter().collect(), self_closing })
    }

    fn close(name: &str) -> Result<Event, Diagnostic> {
        Ok(Event::CloseElement { name: Cow::Borrowed(name) })
    }

    #[test]
    fn element_events() {
        assert_eq!(vec![
            Ok(Event::StartDocument),
            open("root", vec![("a", "1")], false),
            Ok(Event::Text(Cow::Borrowed("hi"))),
            open("b", vec![], true),
            close("b"),
            Ok(Event::Comment(" c ")),
            Ok(Event::CData("x<y")),
            close("root"),
            Ok(Event::EndDocument),
        ], events("<root a=\"1\">hi<b/><!-- c --><![CDATA[x<y]]></root>"));
    }

    #[test]
    fn prefixed_names_are_kept() {
        let all = events("<x:root x:a='1'></x:root>");
        assert_eq!(open("x:root", vec![("x:a", "1")], false), all[1]);
        assert_eq!(close("x:root"), all[2]);
    }

    #[test]
    fn whitespace_outside_root_is_recovered() {
        let all = events("<?xml version=\"1.0\"?>\n<a/>\n");
        assert_eq!(vec![
            Ok(Event::StartDocument),
            Ok(Event::Text(Cow::Borrowed("\n"))),
            open("a", vec![], true),
            close("a"),
            Ok(Event::Text(Cow::Borrowed("\n"))),
            Ok(Event::EndDocument),
        ], all);
    }

    #[test]
    fn leading_bom_and_whitespace_are_dropped() {
        let expected = vec![Ok(Event::StartDocument), open("a", vec![], true), close("a"), Ok(Event::EndDocument)];
        assert_eq!(expected, events("\u{FEFF}<a/>"));
        assert_eq!(expected, events(" \r\n\t<a/>"));
        assert_eq!(expected, events("\u{FEFF}\n<a/>"));
    }

    #[test]
    fn references_are_decoded() {
        let all = events("<a t=\"&lt;&#65;\">&amp;&bogus;</a>");
        assert_eq!(open("a", vec![("t", "<A")], false), all[1]);
        assert!(matches!(&all[2], Err(d) if d.message == "invalid character entity '&bogus;'"
            && d.pos == Some(TextPos { row: 1, col: 23 })));
        assert_eq!(Ok(Event::Text(Cow::Owned("&&bogus;".to_string()))), all[3]);
    }

    #[test]
    fn duplicate_attribute_keeps_first() {
        let all = events("<a k=\"1\" k=\"2\"/>");
        assert!(matches!(&all[1], Err(d) if d.message.starts_with("duplicate attribute 'k'")));
        assert_eq!(open("a", vec![("k", "1")], true), all[2]);
    }

    #[test]
    fn tokenizer_error_still_ends_document() {
        let all = events("<a><</a>");
        assert!(all.iter().any(|e| e.is_err()));
        assert_eq!(Some(&Ok(Event::EndDocument)), all.last());
    }
}
