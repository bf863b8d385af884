// Range editing primitives
// Everything here addresses the tree through text content offsets.

use super::{Affinity, Dom, MERGEABLE_TAGS, NodeData, NodeId};

enum Merge {
    DropEmpty,
    Texts,
    Elements,
    Keep,
}

impl Dom {
    /// Split text node `id` at byte `at`; the tail moves into a new sibling
    pub(crate) fn split_text(&mut self, id: NodeId, at: usize) -> NodeId {
        let tail = match self.text_mut(id) {
            Some(text) if at < text.len() => text.split_off(at),
            _ => String::new(),
        };
        let right = self.create_text(&tail);
        if let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) {
            self.insert_child(parent, index + 1, right);
        }
        right
    }

    /// Split text nodes so that `[start, end)` is covered exactly by whole nodes
    pub(crate) fn isolate_range(&mut self, start: usize, end: usize) -> Vec<NodeId> {
        let mut out = Vec::new();
        if start >= end {
            return out;
        }

        for (id, node_start, node_end) in self.text_spans() {
            if node_end <= start || node_start >= end {
                continue;
            }
            let mut node = id;
            let mut node_start = node_start;
            if start > node_start {
                node = self.split_text(node, start - node_start);
                node_start = start;
            }
            if end < node_end {
                self.split_text(node, end - node_start);
            }
            out.push(node);
        }
        out
    }

    /// Delete `[start, end)` the way a DOM range deletes its contents.
    ///
    /// Returns the parent and child index the range collapsed to. A range
    /// that starts and ends in one text node collapses inside it; otherwise
    /// it collapses to just after the start node's highest ancestor that
    /// does not also hold the end, so a range starting inside `<b>` lands
    /// after `</b>`. Emptied boundary nodes are left in place.
    pub(crate) fn delete_range(&mut self, start: usize, end: usize) -> (NodeId, usize) {
        let Some(((first, first_local), (last, last_local))) = self.range_boundaries(start, end)
        else {
            return self.insertion_point(start);
        };

        if first == last {
            if let Some(text) = self.text_mut(first) {
                text.replace_range(first_local..last_local, "");
            }
            return self.point_in_text(first, first_local);
        }

        let mut reference = first;
        while let Some(parent) = self.parent(reference) {
            if self.contains(parent, last) {
                break;
            }
            reference = parent;
        }

        for node in self.contained_between(first, last) {
            self.detach(node);
        }
        if let Some(text) = self.text_mut(first) {
            text.truncate(first_local);
        }
        if let Some(text) = self.text_mut(last) {
            text.replace_range(..last_local, "");
        }

        let parent = self.parent(reference).unwrap_or(Dom::ROOT);
        let index = self.index_in_parent(reference).map_or(0, |i| i + 1);
        (parent, index)
    }

    /// Replace `[start, end)` with the children of `fragment`; returns the inserted text length.
    ///
    /// Boundary nodes the deletion emptied are dropped afterwards, unless
    /// the fragment went into them.
    pub(crate) fn replace_range(&mut self, start: usize, end: usize, fragment: &Dom) -> usize {
        let boundaries = self.range_boundaries(start, end);
        let (parent, mut index) = self.delete_range(start, end);
        for &child in fragment.children(Dom::ROOT) {
            let copy = self.adopt(fragment, child);
            self.insert_child(parent, index, copy);
            index += 1;
        }

        if let Some(((first, _), (last, _))) = boundaries {
            self.prune_emptied(first);
            self.prune_emptied(last);
        }
        fragment.text_len()
    }

    /// Replace `[start, end)` with plain text; returns its length
    pub(crate) fn replace_text(&mut self, start: usize, end: usize, text: &str) -> usize {
        let mut fragment = Dom::new();
        if !text.is_empty() {
            let node = fragment.create_text(text);
            fragment.append(Dom::ROOT, node);
        }
        self.replace_range(start, end, &fragment)
    }

    /// Text nodes and local offsets holding the first and last character of a non-empty range
    fn range_boundaries(
        &self,
        start: usize,
        end: usize,
    ) -> Option<((NodeId, usize), (NodeId, usize))> {
        if start >= end {
            return None;
        }
        let first = self.locate(start, Affinity::Forward)?;
        let last = self.locate(end, Affinity::Backward)?;
        Some((first, last))
    }

    /// Parent and child index where content inserted at `offset` lands
    fn insertion_point(&mut self, offset: usize) -> (NodeId, usize) {
        match self.locate(offset, Affinity::Backward) {
            Some((node, local)) => self.point_in_text(node, local),
            None => (Dom::ROOT, self.children(Dom::ROOT).len()),
        }
    }

    /// Child position at byte `local` of text node `node`, splitting it if needed.
    /// An empty text node is dropped and its slot returned.
    fn point_in_text(&mut self, node: NodeId, local: usize) -> (NodeId, usize) {
        let parent = self.parent(node).unwrap_or(Dom::ROOT);
        let index = self.index_in_parent(node).unwrap_or(0);
        let len = self.text(node).map_or(0, str::len);

        if len == 0 {
            self.detach(node);
            (parent, index)
        } else if local == 0 {
            (parent, index)
        } else if local >= len {
            (parent, index + 1)
        } else {
            self.split_text(node, local);
            (parent, index + 1)
        }
    }

    /// Whether `node` is `ancestor` or lies below it
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == Dom::ROOT || node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Outermost nodes lying wholly between text nodes `first` and `last`
    fn contained_between(&self, first: NodeId, last: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.collect_preorder(Dom::ROOT, &mut order);
        let from = order.iter().position(|&n| n == first);
        let to = order.iter().position(|&n| n == last);
        let (Some(from), Some(to)) = (from, to) else {
            return Vec::new();
        };

        let contained: Vec<NodeId> = order[from + 1..to]
            .iter()
            .copied()
            .filter(|&n| !self.contains(n, last))
            .collect();
        contained
            .iter()
            .copied()
            .filter(|&n| self.parent(n).is_none_or(|p| !contained.contains(&p)))
            .collect()
    }

    fn collect_preorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            out.push(child);
            self.collect_preorder(child, out);
        }
    }

    /// Detach `node` and then each ancestor left without children
    fn prune_emptied(&mut self, node: NodeId) {
        let mut current = node;
        loop {
            let empty = match self.data(current) {
                NodeData::Text(text) => text.is_empty(),
                NodeData::Element(_) => self.children(current).is_empty(),
            };
            let Some(parent) = self.parent(current) else {
                break;
            };
            if current == Dom::ROOT || !empty {
                break;
            }
            self.detach(current);
            current = parent;
        }
    }

    /// Put `node` inside a new element that takes its place
    pub(crate) fn wrap(
        &mut self,
        node: NodeId,
        tag: &str,
        attrs: Vec<(String, String)>,
    ) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        let wrapper = self.create_element(tag, attrs);
        self.insert_child(parent, index, wrapper);
        self.append(wrapper, node);
        Some(wrapper)
    }

    /// Replace element `el` with its children
    pub(crate) fn unwrap(&mut self, el: NodeId) {
        let (Some(parent), Some(index)) = (self.parent(el), self.index_in_parent(el)) else {
            return;
        };
        let children = self.children(el).to_vec();
        for (offset, child) in children.into_iter().enumerate() {
            self.insert_child(parent, index + offset, child);
        }
        self.detach(el);
    }

    /// Unwrap `wrapper`, re-wrapping the text it held that is not in `released`
    fn unwrap_releasing(&mut self, wrapper: NodeId, released: &[NodeId]) {
        let NodeData::Element(el) = self.data(wrapper).clone() else {
            return;
        };
        let kept: Vec<NodeId> = self
            .text_nodes_under(wrapper)
            .into_iter()
            .filter(|t| !released.contains(t))
            .collect();
        self.unwrap(wrapper);
        for text in kept {
            self.wrap(text, &el.tag, el.attrs.clone());
        }
    }

    /// Toggle an inline format over `[start, end)`.
    ///
    /// When every selected run is already active, wrappers matching
    /// `is_wrapper` are removed from the selected runs only. Otherwise the
    /// inactive runs are wrapped in `tag`.
    pub(crate) fn toggle_inline_format<W, A>(
        &mut self,
        start: usize,
        end: usize,
        tag: &str,
        is_wrapper: W,
        is_active: A,
    ) where
        W: Fn(&str) -> bool,
        A: Fn(&Dom, NodeId) -> bool,
    {
        let segments = self.isolate_range(start, end);
        if segments.is_empty() {
            return;
        }

        if segments.iter().all(|s| is_active(self, *s)) {
            for &segment in &segments {
                while let Some(wrapper) = self
                    .ancestors(segment)
                    .find(|a| self.tag(*a).is_some_and(&is_wrapper))
                {
                    self.unwrap_releasing(wrapper, &segments);
                }
            }
        } else {
            for &segment in &segments {
                if !is_active(self, segment) {
                    self.wrap(segment, tag, Vec::new());
                }
            }
        }

        self.normalize(Dom::ROOT);
    }

    /// Merge adjacent text nodes and identical adjacent inline wrappers
    pub(crate) fn normalize(&mut self, id: NodeId) {
        let mut i = 0;
        loop {
            let children = self.children(id).to_vec();
            let Some(&current) = children.get(i) else {
                break;
            };
            let next = children.get(i + 1).copied();

            let action = match (self.data(current), next.map(|n| self.data(n))) {
                (NodeData::Text(text), _) if text.is_empty() => Merge::DropEmpty,
                (NodeData::Text(_), Some(NodeData::Text(_))) => Merge::Texts,
                (NodeData::Element(a), Some(NodeData::Element(b)))
                    if a == b && MERGEABLE_TAGS.contains(&a.tag.as_str()) =>
                {
                    Merge::Elements
                }
                _ => Merge::Keep,
            };

            match (action, next) {
                (Merge::DropEmpty, _) => self.detach(current),
                (Merge::Texts, Some(next)) => {
                    let tail = self.text(next).unwrap_or_default().to_string();
                    if let Some(text) = self.text_mut(current) {
                        text.push_str(&tail);
                    }
                    self.detach(next);
                }
                (Merge::Elements, Some(next)) => {
                    for child in self.children(next).to_vec() {
                        self.append(current, child);
                    }
                    self.detach(next);
                }
                _ => i += 1,
            }
        }

        for child in self.children(id).to_vec() {
            if self.tag(child).is_some() {
                self.normalize(child);
            }
        }
    }
}
