use xmljson::{to_json_with, to_xml, Content, Element, IgnoreReporter, Node, Options, Profile};

fn build<O: Into<Options>>(xml: &str, options: O) -> Node {
    to_json_with(xml, options, &mut IgnoreReporter)
}

fn only_element(node: &Node) -> &Element {
    match node {
        Node::Document(doc) => match &doc.content {
            Content::Single(child) => child.as_element().unwrap(),
            Content::Many(children) => children[0].as_element().unwrap(),
            Content::Empty => panic!("document without content"),
        },
        _ => panic!("not a document"),
    }
}

#[test]
pub fn test_whitespace_kept_by_default() {
    let node = build("<a>   </a>", Profile::Strict);
    assert_eq!(Content::Many(vec![Node::text("   ")]), only_element(&node).content);
}

#[test]
pub fn test_skip_empty_texts() {
    let node = build("<a>   </a>", Options::default().skip_empty_texts(true));
    assert_eq!(Content::Many(vec![]), only_element(&node).content);

    let options = Options::default().skip_empty_texts(true).omit_empty_content(true);
    let node = build("<a> \t\r\n</a>", options);
    assert_eq!(Content::Empty, only_element(&node).content);
}

#[test]
pub fn test_skip_keeps_text_with_content() {
    let node = build("<a> x </a>", Profile::Simple);
    assert_eq!(Content::Many(vec![Node::text(" x ")]), only_element(&node).content);
}

#[test]
pub fn test_text_nodes_to_str() {
    let node = build("<a>hi</a>", Options::default().text_nodes_to_str(true));
    assert_eq!(Content::Many(vec![Node::Str("hi".to_string())]), only_element(&node).content);
    assert_eq!(
        r#"{"type":"xml","content":[{"type":"element","name":"a","attrs":{},"content":["hi"],"selfClosing":false}]}"#,
        serde_json::to_string(&node).unwrap()
    );
}

#[test]
pub fn test_extract_only_childs() {
    let node = build("<a><b/></a>", Options::default().extract_only_childs(true));
    let b = Element::new("b").self_closing(true);
    // the collapsed self-closing child has an empty list of its own
    assert_eq!(Content::Single(Box::new(b.into())), only_element(&node).content);
    match &node {
        Node::Document(doc) => assert!(matches!(doc.content, Content::Single(_))),
        _ => panic!("not a document"),
    }
}

#[test]
pub fn test_extract_leaves_lists_alone() {
    let node = build("<a><b/><c/></a>", Options::default().extract_only_childs(true));
    assert_eq!(2, only_element(&node).content.nodes().len());
    assert!(matches!(only_element(&node).content, Content::Many(_)));
}

#[test]
pub fn test_compact_drops_empty_fields() {
    let node = build("<a></a>", Profile::Compact);
    let a = only_element(&node);
    assert_eq!(None, a.attrs);
    assert_eq!(Content::Empty, a.content);
    assert!(!a.self_closing);
    assert_eq!(
        r#"{"type":"xml","content":{"type":"element","name":"a","selfClosing":false}}"#,
        serde_json::to_string(&node).unwrap()
    );

    // not the original text, but still well-formed
    let xml = to_xml(&node);
    assert_eq!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><a></a>", xml);
    assert!(roxmltree::Document::parse(&xml).is_ok());
}

#[test]
pub fn test_compact_document() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<list>\n  <item id=\"1\">one</item>\n  <item>two</item>\n</list>\n";
    let node = build(xml, Profile::Compact);
    let expected = serde_json::json!({
        "type": "xml",
        "content": {
            "type": "element",
            "name": "list",
            "content": [
                {"type": "element", "name": "item", "attrs": {"id": "1"}, "content": "one", "selfClosing": false},
                {"type": "element", "name": "item", "content": "two", "selfClosing": false}
            ],
            "selfClosing": false
        }
    });
    assert_eq!(expected, serde_json::to_value(&node).unwrap());

    let rendered = to_xml(&node);
    assert_eq!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><list><item id=\"1\">one</item><item>two</item></list>",
        rendered
    );
}

#[test]
pub fn test_simple_profile() {
    let node = build("<a>\n  <b/>\n</a>", Profile::Simple);
    let a = only_element(&node);
    assert_eq!(Some(&xmljson::Attributes::new()), a.attrs.as_ref());
    assert_eq!(Content::Many(vec![Element::new("b").self_closing(true).into()]), a.content);
}

#[test]
pub fn test_byte_order_mark_is_dropped() {
    let node = build("\u{FEFF}<a/>", Profile::Compact);
    match &node {
        Node::Document(doc) => assert!(matches!(&doc.content, Content::Single(child) if child.as_element().is_some())),
        _ => panic!("not a document"),
    }
    assert_eq!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><a />", to_xml(&node));
}

#[test]
pub fn test_leading_whitespace_is_dropped() {
    let node = build("  \n<a/>", Profile::Strict);
    assert_eq!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><a />", to_xml(&node));
}
