//! A tiny XML tree; text is escaped only when the tree is written out

use std::borrow::Cow;

/// One node of the output document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Raw comment text, neutralized on output
    Comment(String),
}

/// An element with attributes in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serialize this element and everything below it
    pub fn write(&self, out: &mut String, pretty: bool) {
        self.write_at(out, pretty, 0);
    }

    fn write_at(&self, out: &mut String, pretty: bool, depth: usize) {
        indent(out, pretty, depth);
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            newline(out, pretty);
            return;
        }
        out.push('>');
        newline(out, pretty);
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_at(out, pretty, depth + 1),
                Node::Comment(text) => {
                    indent(out, pretty, depth + 1);
                    out.push_str("<!-- ");
                    out.push_str(&neutralize_comment(text));
                    out.push_str(" -->");
                    newline(out, pretty);
                },
            }
        }
        indent(out, pretty, depth);
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
        newline(out, pretty);
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn indent(out: &mut String, pretty: bool, depth: usize) {
    if pretty {
        out.extend(std::iter::repeat("  ").take(depth));
    }
}

fn newline(out: &mut String, pretty: bool) {
    if pretty {
        out.push('\n');
    }
}

/// Characters XML 1.0 does not allow anywhere in a document
fn is_forbidden(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    if !value
        .chars()
        .any(|ch| matches!(ch, '&' | '<' | '>' | '"' | '\n' | '\r' | '\t') || is_forbidden(ch))
    {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            ch if is_forbidden(ch) => escaped.push('\u{FFFD}'),
            ch => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Make arbitrary text safe inside `<!-- ... -->`
///
/// Comments cannot contain `--` or end in `-`, and entities are not
/// expanded there, so offending sequences are broken up instead.
pub fn neutralize_comment(text: &str) -> String {
    let mut safe: String = text
        .chars()
        .map(|ch| if is_forbidden(ch) { '\u{FFFD}' } else { ch })
        .collect();
    while safe.contains("--") {
        safe = safe.replace("--", "- -");
    }
    if safe.ends_with('-') {
        safe.push(' ');
    }
    safe
}

/// Shortest decimal form with at most three fractional digits
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut text = format!("{:.3}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_compact_and_pretty() {
        let tree = Element::new("g")
            .attr("id", "a")
            .child(Element::new("use").attr("href", "#x"));

        let mut compact = String::new();
        tree.write(&mut compact, false);
        assert_eq!(compact, r##"<g id="a"><use href="#x"/></g>"##);

        let mut pretty = String::new();
        tree.write(&mut pretty, true);
        assert_eq!(pretty, "<g id=\"a\">\n  <use href=\"#x\"/>\n</g>\n");
    }

    #[test]
    fn test_attributes_escaped_once() {
        let tree = Element::new("path").attr("title", r#"a<b & "c""#);
        let mut out = String::new();
        tree.write(&mut out, false);
        assert_eq!(out, r#"<path title="a&lt;b &amp; &quot;c&quot;"/>"#);
        assert!(matches!(escape_attribute("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_comment_neutralized() {
        assert_eq!(neutralize_comment("a -- b"), "a - - b");
        assert_eq!(neutralize_comment("---->"), "- - - ->");
        assert_eq!(neutralize_comment("end-"), "end- ");
        assert_eq!(neutralize_comment("nul\u{0}"), "nul\u{FFFD}");

        let tree = Element::new("svg").child(Node::Comment("--><script>".into()));
        let mut out = String::new();
        tree.write(&mut out, false);
        assert_eq!(out.matches("-->").count(), 1);
        assert!(out.ends_with(" --></svg>"));
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(-1.25), "-1.25");
        assert_eq!(format_number(1286.0004), "1286");
        assert_eq!(format_number(f64::NAN), "0");
    }
}
