// HTML fragment tree
// A small arena-backed DOM standing in for the live editable region.
// Positions handed out by this module are byte offsets into the
// concatenated text content, which stay stable while markup changes.

mod edit;
mod parse;
mod serialize;
mod style;

pub use serialize::{escape_attr, escape_text};
pub use style::{ComputedStyle, parse_inline_style};

/// Index of a node inside a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Tags serialized without a closing tag and never given children
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Inline wrappers that may be merged with an identical neighbour
pub(crate) const MERGEABLE_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "s", "strike", "del", "span",
];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Which text node a position on a node boundary belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// End of the preceding text node
    Backward,
    /// Start of the following text node
    Forward,
}

/// Arena of nodes under a synthetic root element.
///
/// Detached nodes stay in the arena until the tree is replaced.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree with an empty root
    pub fn new() -> Self {
        Dom {
            nodes: vec![Node {
                data: NodeData::Element(ElementData {
                    tag: "div".to_string(),
                    attrs: Vec::new(),
                }),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el.tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => el
                .attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element(_) => None,
        }
    }

    /// Ancestors of `id`, nearest first, stopping before the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: self.parent(id),
        }
    }

    /// Text nodes attached under `id` in document order
    pub fn text_nodes_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_text_nodes(id, &mut out);
        out
    }

    /// Text nodes of the whole tree in document order
    pub fn text_nodes(&self) -> Vec<NodeId> {
        self.text_nodes_under(Self::ROOT)
    }

    fn collect_text_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            match self.data(child) {
                NodeData::Text(_) => out.push(child),
                NodeData::Element(_) => self.collect_text_nodes(child, out),
            }
        }
    }

    /// Text nodes paired with their `[start, end)` span in the text content
    pub fn text_spans(&self) -> Vec<(NodeId, usize, usize)> {
        let mut offset = 0;
        self.text_nodes()
            .into_iter()
            .map(|id| {
                let len = self.text(id).map_or(0, str::len);
                let span = (id, offset, offset + len);
                offset += len;
                span
            })
            .collect()
    }

    /// Concatenated text of every text node
    pub fn text_content(&self) -> String {
        self.text_nodes()
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    pub fn text_len(&self) -> usize {
        self.text_nodes()
            .into_iter()
            .filter_map(|id| self.text(id))
            .map(str::len)
            .sum()
    }

    /// Text between two content offsets
    pub fn text_slice(&self, start: usize, end: usize) -> String {
        let content = self.text_content();
        let end = end.min(content.len());
        let start = start.min(end);
        content.get(start..end).unwrap_or_default().to_string()
    }

    /// Resolve a content offset to a text node and the byte offset inside it
    pub fn locate(&self, offset: usize, affinity: Affinity) -> Option<(NodeId, usize)> {
        let spans = self.text_spans();
        let backward = || {
            spans
                .iter()
                .find(|(_, start, end)| {
                    (*start < offset && offset <= *end) || (offset == 0 && *start == 0)
                })
                .map(|(id, start, _)| (*id, offset - start))
        };
        let forward = || {
            spans
                .iter()
                .find(|(_, start, end)| *start <= offset && offset < *end)
                .map(|(id, start, _)| (*id, offset - start))
        };
        match affinity {
            Affinity::Backward => backward().or_else(forward),
            Affinity::Forward => forward().or_else(backward),
        }
    }

    pub(crate) fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs,
        }))
    }

    pub(crate) fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    pub(crate) fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let index = index.min(self.nodes[parent.0].children.len());
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `id` from its parent; the subtree stays intact
    pub(crate) fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    pub(crate) fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub(crate) fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match &mut self.nodes[id.0].data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Deep-copy `id` from another tree into this one, returning the detached copy
    pub(crate) fn adopt(&mut self, other: &Dom, id: NodeId) -> NodeId {
        let copy = self.push_node(other.data(id).clone());
        for &child in other.children(id) {
            let child_copy = self.adopt(other, child);
            self.append(copy, child_copy);
        }
        copy
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Dom::ancestors`]
pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        if current == Dom::ROOT {
            self.next = None;
            return None;
        }
        self.next = self.dom.parent(current);
        Some(current)
    }
}
