use xmljson::{to_json_with, Node, Profile};

fn parse_text(xml: &str) -> (String, Vec<String>) {
    let mut errors: Vec<String> = vec![];
    let node = to_json_with(xml, Profile::Strict, &mut errors);
    let root = node.children()[0].as_element().unwrap();
    let text = root.content.nodes().iter().filter_map(Node::as_text).collect();
    (text, errors)
}

#[test]
pub fn test_valid_char_references() {
    let to_test = vec![
        ("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">"), ("&quot;", "\""), ("&apos;", "'"),
        ("&#x9;", "\t"), ("&#xA;", "\n"), ("&#xD;", "\r"), ("&#x10FFFF;", "\u{10FFFF}"),
        ("&#10;", "\n"), ("&#13;", "\r"), ("&#32;", " "),
    ];
    for (reference, expected) in to_test {
        let xml = format!("<root>{}</root>", reference);
        assert_eq!((expected.to_string(), vec![]), parse_text(&xml));
    }
}


#[test]
pub fn test_invalid_char_references() {
    let to_test = vec!["&unknown;", "&#xaaaaffffffff;", "&#x8;", "&#a;", "&#10345672367;"];
    for reference in to_test {
        let xml = format!("<root>&amp;{}</root>", reference);
        let (text, errors) = parse_text(&xml);
        // kept as written
        assert_eq!(format!("&{}", reference), text);
        assert_eq!(vec![format!("invalid character entity '{}' at 1:12", reference)], errors);
    }
}
