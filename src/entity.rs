use std::borrow::Cow;

use crate::xmlchar::XmlChar;

/// A reference that could not be decoded and was kept verbatim.
#[derive(Debug, PartialEq)]
pub(crate) struct InvalidReference<'a> {
    /// Byte offset of the `&` in the decoded slice
    pub(crate) offset: usize,
    pub(crate) text: &'a str,
}

/// Replace entity and character references in character data or an
/// attribute value.
///
/// Reference ::= EntityRef | CharRef
/// [https://www.w3.org/TR/xml/#sec-references]
///
/// Only the five predefined entities are known since DTDs are not processed.
pub(crate) fn decode_references<'a>(raw: &'a str, invalid: &mut Vec<InvalidReference<'a>>) -> Cow<'a, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut pos = 0;
    while let Some(found) = raw[pos..].find('&') {
        let start = pos + found;
        out.push_str(&raw[pos..start]);

        let rest = &raw[start + 1..];
        let name_end = rest.find(|c: char| c == ';' || c == '&' || c == '<' || c.is_xml_whitespace());
        match name_end {
            Some(len) if rest[len..].starts_with(';') => {
                let reference = &raw[start..start + len + 2];
                match decode_reference(&rest[..len]) {
                    Some(c) => out.push(c),
                    None => {
                        invalid.push(InvalidReference { offset: start, text: reference });
                        out.push_str(reference);
                    }
                }
                pos = start + len + 2;
            }
            _ => {
                // no terminating ';', keep the ampersand as text
                let len = name_end.unwrap_or(rest.len());
                invalid.push(InvalidReference { offset: start, text: &raw[start..start + len + 1] });
                out.push('&');
                pos = start + 1;
            }
        }
    }
    out.push_str(&raw[pos..]);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => decode_char_ref(hex, 16),
                None => decode_char_ref(digits, 10),
            }
        }
    }
}

/// CharRef ::= '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'
/// [https://www.w3.org/TR/xml/#NT-CharRef]
fn decode_char_ref(digits: &str, radix: u32) -> Option<char> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let code = u32::from_str_radix(digits, radix).ok()?;
    let c = char::from_u32(code)?;
    if !c.is_xml_char() {
        return None;
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> (String, Vec<String>) {
        let mut invalid = vec![];
        let decoded = decode_references(raw, &mut invalid).into_owned();
        (decoded, invalid.iter().map(|r| r.text.to_string()).collect())
    }

    #[test]
    fn no_references_borrows() {
        let mut invalid = vec![];
        assert!(matches!(decode_references("plain text", &mut invalid), Cow::Borrowed("plain text")));
        assert!(invalid.is_empty());
    }

    #[test]
    fn valid_references() {
        let to_test = vec![
            ("&amp;", "&"), ("&lt;", "<"), ("&gt;", ">"), ("&quot;", "\""), ("&apos;", "'"),
            ("&#x9;", "\t"), ("&#xA;", "\n"), ("&#xD;", "\r"), ("&#x10FFFF;", "\u{10FFFF}"),
            ("&#10;", "\n"), ("&#13;", "\r"), ("&#32;", " "), ("&#X41;", "A"),
        ];
        for (reference, expected) in to_test {
            assert_eq!((expected.to_string(), vec![]), decode(reference));
        }
    }

    #[test]
    fn invalid_references_are_kept() {
        let to_test = vec!["&unknown;", "&#xaaaaffffffff;", "&#x8;", "&#a;", "&#10345672367;", "&#;", "&#x;"];
        for reference in to_test {
            let (decoded, invalid) = decode(&format!("&amp;{}", reference));
            assert_eq!(format!("&{}", reference), decoded);
            assert_eq!(vec![reference.to_string()], invalid);
        }
    }

    #[test]
    fn bare_ampersand() {
        let (decoded, invalid) = decode("fish & chips &amp; peas");
        assert_eq!("fish & chips & peas", decoded);
        assert_eq!(vec!["&".to_string()], invalid);

        let (decoded, invalid) = decode("trailing &amp");
        assert_eq!("trailing &amp", decoded);
        assert_eq!(vec!["&amp".to_string()], invalid);
    }

    #[test]
    fn offsets_point_at_ampersand() {
        let mut invalid = vec![];
        decode_references("ab&x;cd&#0;", &mut invalid);
        assert_eq!(vec![2, 7], invalid.iter().map(|r| r.offset).collect::<Vec<_>>());
    }
}
