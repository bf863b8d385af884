// Lenient HTML fragment parser
// Accepts the markup an editing surface produces; never fails.

use super::{Dom, NodeId, is_void_tag};

impl Dom {
    /// Parse an HTML fragment into a fresh tree
    pub fn parse(html: &str) -> Self {
        let mut dom = Dom::new();
        dom.append_parsed(Dom::ROOT, html);
        dom
    }

    /// Replace every child of the root with the parsed fragment
    pub fn set_inner_html(&mut self, html: &str) {
        *self = Dom::parse(html);
    }

    fn append_parsed(&mut self, root: NodeId, html: &str) {
        let mut stack: Vec<NodeId> = vec![root];
        let mut rest = html;

        while !rest.is_empty() {
            let parent = *stack.last().unwrap_or(&root);

            if let Some(after) = rest.strip_prefix("<!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }

            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let name = after[..end].trim().to_ascii_lowercase();
                rest = after.get(end + 1..).unwrap_or("");
                if let Some(pos) = stack
                    .iter()
                    .rposition(|id| *id != root && self.tag(*id) == Some(name.as_str()))
                {
                    stack.truncate(pos);
                }
                continue;
            }

            if rest.starts_with("<!") || rest.starts_with("<?") {
                rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
                continue;
            }

            if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (tag, attrs, self_closing, remaining) = parse_start_tag(&rest[1..]);
                rest = remaining;
                let element = self.create_element(&tag, attrs);
                self.append(parent, element);
                if !self_closing && !is_void_tag(&tag) {
                    stack.push(element);
                }
                continue;
            }

            // Text runs up to the next tag-like '<'
            let end = find_markup_start(rest);
            let text = decode_entities(&rest[..end]);
            rest = &rest[end..];
            if !text.is_empty() {
                self.append_text(parent, &text);
            }
        }
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.children(parent).last()
            && let Some(existing) = self.text_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text);
        self.append(parent, node);
    }
}

/// Byte index of the first '<' that opens markup, or the input length
fn find_markup_start(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            match bytes.get(i + 1) {
                Some(b'/') | Some(b'!') | Some(b'?') => return i,
                Some(c) if c.is_ascii_alphabetic() => return i,
                _ => {}
            }
        }
        i += 1;
    }
    bytes.len()
}

type StartTag<'a> = (String, Vec<(String, String)>, bool, &'a str);

/// Parse `name attr="v" ...>` (the leading '<' already consumed)
fn parse_start_tag(s: &str) -> StartTag<'_> {
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(s.len());
    let tag = s[..name_end].to_ascii_lowercase();
    let mut rest = &s[name_end..];
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix("/>") {
            self_closing = true;
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_ascii_lowercase();
        rest = rest[key_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let body = &after[1..];
                let close = body.find(quote).unwrap_or(body.len());
                value = decode_entities(&body[..close]);
                rest = body.get(close + 1..).unwrap_or("");
            } else {
                let end = after
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(after.len());
                value = decode_entities(&after[..end]);
                rest = &after[end..];
            }
        }

        if !key.is_empty() {
            attrs.push((key, value));
        }
    }

    (tag, attrs, self_closing, rest)
}

/// Decode the character references an editing surface emits
pub(crate) fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_reference(&candidate[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
