// HTML serialization (innerHTML)

use super::{Dom, NodeData, NodeId, is_void_tag};

impl Dom {
    /// Serialize the children of the root
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(Dom::ROOT) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (key, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&el.tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

/// Escape text content the way innerHTML does
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_markup_survives_reparse() {
        let html = r#"<p>Hello <b>bold</b> and <span style="color: red">red</span><br></p>"#;
        assert_eq!(Dom::parse(html).inner_html(), html);
    }

    #[test]
    fn test_text_is_escaped() {
        let dom = Dom::parse("a &amp; b &lt;tag&gt;");
        assert_eq!(dom.inner_html(), "a &amp; b &lt;tag&gt;");
        assert_eq!(escape_text("x\u{a0}y"), "x&nbsp;y");
    }

    #[test]
    fn test_attr_quotes_are_escaped() {
        assert_eq!(escape_attr(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_unclosed_elements_are_closed() {
        assert_eq!(Dom::parse("<i>open").inner_html(), "<i>open</i>");
    }
}
