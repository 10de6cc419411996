//! Tolerant HTML tokenizer and tree builder.
//!
//! Handles the markup a hand-written static page contains: doctype,
//! comments, void and self-closing elements, quoted and unquoted attribute
//! values, character references, and raw text inside `<script>`/`<style>`.
//! Unmatched end tags are dropped; unclosed elements are closed at the end
//! of input.

use super::{Document, NodeId, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    Comment(String),
}

/// Parse `html` and append the resulting nodes under `parent`.
pub(super) fn parse_into(doc: &mut Document, parent: NodeId, html: &str) {
    let mut stack: Vec<NodeId> = vec![parent];

    for token in tokenize(html) {
        let current = *stack.last().unwrap_or(&parent);
        match token {
            Token::Doctype(text) => {
                let node = doc.create_doctype(&text);
                doc.append_child(current, node);
            }
            Token::Comment(text) => {
                let node = doc.create_comment(&text);
                doc.append_child(current, node);
            }
            Token::Text(text) => {
                let node = doc.create_text(&text);
                doc.append_child(current, node);
            }
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                close_implied(doc, &mut stack, &name);
                let current = *stack.last().unwrap_or(&parent);
                let node = doc.create_element_with_attrs(&name, attrs);
                doc.append_child(current, node);
                if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                    stack.push(node);
                }
            }
            Token::EndTag(name) => {
                // Index 0 is the insertion parent and is never popped.
                if let Some(pos) = stack
                    .iter()
                    .skip(1)
                    .rposition(|id| doc.tag_name(*id) == Some(name.as_str()))
                {
                    stack.truncate(pos + 1);
                }
            }
        }
    }
}

/// Close an open `<p>` or `<li>` that the new start tag implicitly ends.
fn close_implied(doc: &Document, stack: &mut Vec<NodeId>, name: &str) {
    if stack.len() < 2 {
        return;
    }
    let Some(top) = stack.last().and_then(|id| doc.tag_name(*id)) else {
        return;
    };
    let closes = match top {
        "p" => matches!(
            name,
            "p" | "div" | "ul" | "ol" | "section" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        ),
        "li" => name == "li",
        "option" => name == "option",
        _ => false,
    };
    if closes {
        stack.pop();
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];

        if let Some(body) = rest.strip_prefix("<!--") {
            let (comment, consumed) = match body.find("-->") {
                Some(end) => (&body[..end], 4 + end + 3),
                None => (body, rest.len()),
            };
            tokens.push(Token::Comment(comment.to_string()));
            pos += consumed;
            continue;
        }

        if let Some(body) = rest.strip_prefix("<!") {
            let end = body.find('>').unwrap_or(body.len());
            let inner = body[..end].trim();
            let token = match strip_prefix_ignore_case(inner, "doctype") {
                Some(doctype) => Token::Doctype(doctype.trim().to_string()),
                None => Token::Comment(inner.to_string()),
            };
            tokens.push(token);
            pos += (2 + end + 1).min(rest.len());
            continue;
        }

        if let Some(body) = rest.strip_prefix("</") {
            if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let end = body.find('>').unwrap_or(body.len());
                let name = body[..end]
                    .split(|c: char| c.is_ascii_whitespace())
                    .next()
                    .unwrap_or("")
                    .to_ascii_lowercase();
                tokens.push(Token::EndTag(name));
                pos += (2 + end + 1).min(rest.len());
                continue;
            }
        }

        if let Some(body) = rest.strip_prefix('<') {
            if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
                let (token, consumed) = start_tag(body);
                pos += 1 + consumed;
                if let Token::StartTag { name, .. } = &token {
                    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                        let name = name.clone();
                        tokens.push(token);
                        pos += raw_text(&input[pos..], &name, &mut tokens);
                        continue;
                    }
                }
                tokens.push(token);
                continue;
            }
        }

        // Plain text up to the next tag opener. A stray '<' is kept as text.
        let skip = if rest.starts_with('<') { 1 } else { 0 };
        let end = rest[skip..].find('<').map(|i| i + skip).unwrap_or(rest.len());
        push_text(&mut tokens, decode_entities(&rest[..end]));
        pos += end;
    }

    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: String) {
    if let Some(Token::Text(prev)) = tokens.last_mut() {
        prev.push_str(&text);
    } else {
        tokens.push(Token::Text(text));
    }
}

/// Consume raw text up to the matching end tag. Returns bytes consumed,
/// including the end tag.
fn raw_text(input: &str, name: &str, tokens: &mut Vec<Token>) -> usize {
    let closing = format!("</{}", name);
    let lower = input.to_ascii_lowercase();
    let end = lower.find(&closing).unwrap_or(input.len());
    if end > 0 {
        tokens.push(Token::Text(input[..end].to_string()));
    }
    if end == input.len() {
        return end;
    }
    let after = input[end..].find('>').map(|i| end + i + 1).unwrap_or(input.len());
    tokens.push(Token::EndTag(name.to_string()));
    after
}

/// Parse a start tag whose leading '<' has been stripped. Returns the token
/// and the number of bytes consumed.
fn start_tag(input: &str) -> (Token, usize) {
    let bytes = input.as_bytes();
    let name_end = input
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(input.len());
    let name = input[..name_end].to_ascii_lowercase();
    let mut pos = name_end;

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        match bytes[pos] {
            b'>' => {
                pos += 1;
                break;
            }
            b'/' => {
                pos += 1;
                if bytes.get(pos) == Some(&b'>') {
                    self_closing = true;
                    pos += 1;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let rest = &input[pos..];
        let attr_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        // A lone '=' is not a valid name start; consume it so the loop advances.
        let attr_end = attr_end.max(1).min(rest.len());
        let attr_name = rest[..attr_end].to_string();
        pos += attr_end;

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let mut value = String::new();
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let body = &input[pos + 1..];
                    let end = body.find(quote as char).unwrap_or(body.len());
                    value = decode_entities(&body[..end]);
                    pos = (pos + 1 + end + 1).min(input.len());
                }
                Some(_) => {
                    let body = &input[pos..];
                    let end = body
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .unwrap_or(body.len());
                    value = decode_entities(&body[..end]);
                    pos += end;
                }
                None => {}
            }
        }

        if attr_name != "=" && !attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(&attr_name)) {
            attrs.push((attr_name, value));
        }
    }

    (
        Token::StartTag {
            name,
            attrs,
            self_closing,
        },
        pos,
    )
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s.is_char_boundary(prefix.len()) {
        let (head, tail) = s.split_at(prefix.len());
        if head.eq_ignore_ascii_case(prefix) {
            return Some(tail);
        }
    }
    None
}

/// Decode named and numeric character references. Unknown references are
/// kept literally.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail[1..]
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_reference(&tail[1..1 + end]).map(|c| (c, end + 2)))
            .or_else(|| decode_legacy(&tail[1..]));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(num) = reference.strip_prefix('#') {
        let (digits, radix) = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => (hex, 16),
            None => (num, 10),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        // NUL, surrogates and out-of-range code points become U+FFFD
        let c = u32::from_str_radix(digits, radix)
            .ok()
            .filter(|code| *code != 0)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some(c);
    }
    let c = match reference {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "middot" => '·',
        "bull" => '•',
        "rarr" => '→',
        "larr" => '←',
        _ => return None,
    };
    Some(c)
}

/// Named references browsers still accept without the trailing `;`.
const LEGACY_REFERENCES: [(&str, char); 7] = [
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("nbsp", '\u{a0}'),
    ("copy", '©'),
    ("reg", '®'),
];

/// `after_amp` is the text following a `&` that had no `;`-terminated match.
/// Returns the character and the bytes consumed, including the `&`.
fn decode_legacy(after_amp: &str) -> Option<(char, usize)> {
    LEGACY_REFERENCES.iter().find_map(|(name, c)| {
        let rest = after_amp.strip_prefix(name)?;
        match rest.chars().next() {
            Some(next) if next.is_ascii_alphanumeric() || next == '=' => None,
            _ => Some((*c, name.len() + 1)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn test_tokenize_simple_element() {
        let tokens = tokenize(r#"<a href="/x" class='btn'>Go</a>"#);
        assert_eq!(
            tokens,
            vec![
                start("a", &[("href", "/x"), ("class", "btn")], false),
                Token::Text("Go".to_string()),
                Token::EndTag("a".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_unquoted_and_boolean_attributes() {
        let tokens = tokenize("<input id=name required>");
        assert_eq!(
            tokens,
            vec![start("input", &[("id", "name"), ("required", "")], false)]
        );
    }

    #[test]
    fn test_tokenize_self_closing() {
        let tokens = tokenize(r#"<path d="M0 0"/>"#);
        assert_eq!(tokens, vec![start("path", &[("d", "M0 0")], true)]);
    }

    #[test]
    fn test_tokenize_doctype_and_comment() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -->");
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("html".to_string()),
                Token::Comment(" note ".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_script_is_raw() {
        let tokens = tokenize("<script>if (a < b && c) {}</script>");
        assert_eq!(
            tokens,
            vec![
                start("script", &[], false),
                Token::Text("if (a < b && c) {}".to_string()),
                Token::EndTag("script".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_stray_angle_bracket_is_text() {
        let tokens = tokenize("1 < 2");
        assert_eq!(tokens, vec![Token::Text("1 < 2".to_string())]);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("caf&eacute;"), "caf&eacute;");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_decode_invalid_numeric_references() {
        assert_eq!(decode_entities("&#0;"), "\u{fffd}");
        assert_eq!(decode_entities("&#x0;"), "\u{fffd}");
        assert_eq!(decode_entities("&#xD800;"), "\u{fffd}");
        assert_eq!(decode_entities("&#x110000;"), "\u{fffd}");
        assert_eq!(decode_entities("&#999999999;"), "\u{fffd}");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_decode_legacy_references_without_semicolon() {
        assert_eq!(decode_entities("a &amp b"), "a & b");
        assert_eq!(decode_entities("&lt3"), "&lt3");
        assert_eq!(decode_entities("x &gt y &copy 2024"), "x > y © 2024");
        assert_eq!(decode_entities("?a=1&ampb=2"), "?a=1&ampb=2");
        assert_eq!(decode_entities("&amp"), "&");
        assert_eq!(decode_entities("&ampere;"), "&ampere;");

        let doc = crate::dom::Document::parse("<p>a &amp b &#0;</p>");
        let p = doc.select("p").unwrap();
        assert_eq!(doc.outer_html(p), "<p>a &amp; b \u{fffd}</p>");
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let tokens = tokenize(r#"<a title="Tom &amp; Jerry">"#);
        assert_eq!(tokens, vec![start("a", &[("title", "Tom & Jerry")], false)]);
    }

    #[test]
    fn test_unclosed_li_closed_by_sibling() {
        let doc = Document::parse("<ul><li>one<li>two</ul>");
        let items = doc.select_all("ul > li");
        assert_eq!(items.len(), 2);
        assert_eq!(doc.text_content(items[1]), "two");
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let doc = Document::parse("<div>a</span>b</div>");
        let div = doc.select("div").unwrap();
        assert_eq!(doc.text_content(div), "ab");
    }

    #[test]
    fn test_void_elements_take_no_children() {
        let doc = Document::parse("<p><img src=\"a.png\">text</p>");
        let img = doc.select("img").unwrap();
        assert!(doc.children(img).is_empty());
        let p = doc.select("p").unwrap();
        assert_eq!(doc.text_content(p), "text");
    }
}
