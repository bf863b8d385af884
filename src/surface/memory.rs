// In-memory editing surface
// Headless stand-in for a browser contenteditable region. Every surface of a
// host shares one MemoryEnvironment, which owns the singleton selection and
// the focus, like a document does.

use super::{ElementSnapshot, NativeCommands, Surface, SurfaceError};
use crate::dom::{Affinity, Dom, NodeId};
use crate::format::{ActiveFormatSet, FormatCommand};
use crate::richtext::detector::formats_in_ancestry;
use std::cell::RefCell;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// Which native primitives the emulated environment offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSupport {
    /// execCommand for the four formats
    pub commands: bool,
    /// queryCommandState
    pub state_queries: bool,
    /// insertText
    pub insert_text: bool,
    /// Every format command errors out
    pub failing_commands: bool,
}

impl NativeSupport {
    pub const FULL: NativeSupport = NativeSupport {
        commands: true,
        state_queries: true,
        insert_text: true,
        failing_commands: false,
    };

    /// Neither format commands nor state queries; text insertion still works
    pub const NO_FORMATTING: NativeSupport = NativeSupport {
        commands: false,
        state_queries: false,
        insert_text: true,
        failing_commands: false,
    };
}

impl Default for NativeSupport {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SelectionState {
    owner: usize,
    start: usize,
    end: usize,
}

#[derive(Debug, Default)]
struct EnvState {
    next_surface: usize,
    focused: Option<usize>,
    selection: Option<SelectionState>,
    // Formats toggled at a collapsed caret, applied to the next inserted text
    typing_style: ActiveFormatSet,
}

/// Document-wide state shared by all surfaces
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    state: RefCell<EnvState>,
}

impl MemoryEnvironment {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Id of the surface holding the selection
    pub fn selection_owner(&self) -> Option<usize> {
        self.state.borrow().selection.map(|s| s.owner)
    }

    /// Id of the focused surface
    pub fn focused(&self) -> Option<usize> {
        self.state.borrow().focused
    }

    fn register(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.next_surface += 1;
        state.next_surface
    }
}

/// A contenteditable region backed by a [`Dom`]
pub struct MemorySurface {
    env: Rc<MemoryEnvironment>,
    id: usize,
    dom: Dom,
    editable: bool,
    placeholder: String,
    attached: bool,
    native: NativeSupport,
}

impl MemorySurface {
    pub fn new(env: &Rc<MemoryEnvironment>) -> Self {
        MemorySurface {
            env: Rc::clone(env),
            id: env.register(),
            dom: Dom::new(),
            editable: true,
            placeholder: String::new(),
            attached: true,
            native: NativeSupport::FULL,
        }
    }

    pub fn with_native_support(mut self, native: NativeSupport) -> Self {
        self.native = native;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn text_content(&self) -> String {
        self.dom.text_content()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Tear the region down; releases focus and selection held here
    pub fn detach(&mut self) {
        self.attached = false;
        let mut state = self.env.state.borrow_mut();
        if state.focused == Some(self.id) {
            state.focused = None;
        }
        if state.selection.is_some_and(|s| s.owner == self.id) {
            state.selection = None;
        }
    }

    /// Selection as text content offsets, if it lies in this surface
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.env
            .state
            .borrow()
            .selection
            .filter(|s| s.owner == self.id)
            .map(|s| (s.start, s.end))
    }

    /// Select `[start, end)`, snapped to grapheme boundaries
    pub fn select(&mut self, start: usize, end: usize) {
        let text = self.dom.text_content();
        let (a, b) = (snap_to_grapheme(&text, start), snap_to_grapheme(&text, end));
        self.set_selection(a.min(b), a.max(b));
        self.env.state.borrow_mut().typing_style = ActiveFormatSet::new();
    }

    pub fn place_caret(&mut self, offset: usize) {
        self.select(offset, offset);
    }

    pub fn select_all(&mut self) {
        self.select(0, self.dom.text_len());
    }

    /// Select the first occurrence of `needle` in the text content
    pub fn select_text(&mut self, needle: &str) -> bool {
        let Some(start) = self.dom.text_content().find(needle) else {
            return false;
        };
        self.select(start, start + needle.len());
        true
    }

    /// Simulate typing at the selection. Carries any pending typing style.
    pub fn type_text(&mut self, text: &str) -> bool {
        if !self.attached || !self.editable {
            return false;
        }
        self.insert_at_selection(text).is_ok()
    }

    fn set_selection(&self, start: usize, end: usize) {
        self.env.state.borrow_mut().selection = Some(SelectionState {
            owner: self.id,
            start,
            end,
        });
    }

    fn owned_selection(&self) -> Result<(usize, usize), SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        self.selection().ok_or(SurfaceError::NoSelection)
    }

    fn insert_at_selection(&mut self, text: &str) -> Result<(), SurfaceError> {
        let (start, end) = self.owned_selection()?;
        let inserted = self.dom.replace_text(start, end, text);

        let typing_style = std::mem::take(&mut self.env.state.borrow_mut().typing_style);
        for command in typing_style.iter() {
            self.toggle_native(command, start, start + inserted);
        }

        self.set_selection(start + inserted, start + inserted);
        Ok(())
    }

    fn toggle_native(&mut self, command: FormatCommand, start: usize, end: usize) {
        self.dom.toggle_inline_format(
            start,
            end,
            native_tag(command),
            |tag| command.matches_tag(tag),
            |dom, node| format_active(dom, node, command),
        );
    }
}

impl NativeCommands for MemorySurface {
    fn supports_native_command(&self, _command: FormatCommand) -> bool {
        self.native.commands
    }

    fn query_native_state(&self, command: FormatCommand) -> Result<bool, SurfaceError> {
        if !self.native.state_queries {
            return Err(SurfaceError::Unsupported {
                operation: "queryCommandState",
            });
        }
        if !self.attached {
            return Err(SurfaceError::Detached);
        }
        let Some((start, end)) = self.selection() else {
            return Ok(false);
        };

        if start == end {
            let at_caret = self
                .dom
                .locate(start, Affinity::Backward)
                .is_some_and(|(node, _)| format_active(&self.dom, node, command));
            let pending = self.env.state.borrow().typing_style.contains(command);
            return Ok(at_caret != pending);
        }

        let mut covered = self
            .dom
            .text_spans()
            .into_iter()
            .filter(|(_, s, e)| *s < end && *e > start)
            .peekable();
        if covered.peek().is_none() {
            return Ok(false);
        }
        Ok(covered.all(|(node, _, _)| format_active(&self.dom, node, command)))
    }

    fn apply_native_command(&mut self, command: FormatCommand) -> Result<(), SurfaceError> {
        if !self.native.commands {
            return Err(SurfaceError::Unsupported {
                operation: "execCommand",
            });
        }
        if self.native.failing_commands {
            return Err(SurfaceError::CommandFailed(format!(
                "{command} was rejected"
            )));
        }
        let (start, end) = self.owned_selection()?;
        if start == end {
            self.env.state.borrow_mut().typing_style.toggle(command);
        } else {
            self.toggle_native(command, start, end);
        }
        Ok(())
    }

    fn insert_plain_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        if !self.native.insert_text {
            return Err(SurfaceError::Unsupported {
                operation: "insertText",
            });
        }
        self.insert_at_selection(text)
    }
}

impl Surface for MemorySurface {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn inner_html(&self) -> String {
        self.dom.inner_html()
    }

    fn set_inner_html(&mut self, html: &str) {
        self.dom.set_inner_html(html);
        if self.selection().is_some() {
            self.set_selection(0, 0);
            self.env.state.borrow_mut().typing_style = ActiveFormatSet::new();
        }
    }

    fn focus(&mut self) {
        if !self.attached {
            return;
        }
        self.env.state.borrow_mut().focused = Some(self.id);
        if self.selection().is_none() {
            self.place_caret(0);
        }
    }

    fn blur(&mut self) {
        let mut state = self.env.state.borrow_mut();
        if state.focused == Some(self.id) {
            state.focused = None;
        }
    }

    fn has_focus(&self) -> bool {
        self.attached && self.env.focused() == Some(self.id)
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn set_placeholder(&mut self, placeholder: &str) {
        self.placeholder = placeholder.to_string();
    }

    fn contains_selection(&self) -> bool {
        self.attached && self.selection().is_some()
    }

    fn selected_text(&self) -> Option<String> {
        let (start, end) = self.owned_selection().ok()?;
        Some(self.dom.text_slice(start, end))
    }

    fn replace_selection_with_html(&mut self, html: &str) -> Result<(), SurfaceError> {
        let (start, end) = self.owned_selection()?;
        let inserted = self.dom.replace_range(start, end, &Dom::parse(html));
        self.set_selection(start, start + inserted);
        self.env.state.borrow_mut().typing_style = ActiveFormatSet::new();
        Ok(())
    }

    fn selection_ancestry(&self) -> Option<Vec<ElementSnapshot>> {
        let (start, end) = self.owned_selection().ok()?;
        let affinity = if start == end {
            Affinity::Backward
        } else {
            Affinity::Forward
        };
        Some(
            self.dom
                .locate(start, affinity)
                .map(|(node, _)| ancestry(&self.dom, node))
                .unwrap_or_default(),
        )
    }
}

/// Tag the emulated engine writes for a format
fn native_tag(command: FormatCommand) -> &'static str {
    match command {
        FormatCommand::Bold => "b",
        FormatCommand::Italic => "i",
        FormatCommand::Underline => "u",
        FormatCommand::StrikeThrough => "strike",
    }
}

fn ancestry(dom: &Dom, node: NodeId) -> Vec<ElementSnapshot> {
    dom.ancestors(node)
        .filter_map(|id| {
            dom.tag(id)
                .map(|tag| ElementSnapshot::new(tag, dom.computed_style(id)))
        })
        .collect()
}

fn format_active(dom: &Dom, node: NodeId, command: FormatCommand) -> bool {
    formats_in_ancestry(&ancestry(dom, node)).contains(command)
}

fn snap_to_grapheme(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    text.grapheme_indices(true)
        .map(|(i, _)| i)
        .take_while(|i| *i <= offset)
        .last()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_with(html: &str) -> (Rc<MemoryEnvironment>, MemorySurface) {
        let env = MemoryEnvironment::new();
        let mut surface = MemorySurface::new(&env);
        surface.set_inner_html(html);
        (env, surface)
    }

    #[test]
    fn test_selection_is_shared_between_surfaces() {
        let env = MemoryEnvironment::new();
        let mut first = MemorySurface::new(&env);
        let mut second = MemorySurface::new(&env);
        first.set_inner_html("one");
        second.set_inner_html("two");

        first.select_all();
        assert!(first.contains_selection());
        second.place_caret(1);
        assert!(!first.contains_selection());
        assert_eq!(env.selection_owner(), Some(second.id()));
    }

    #[test]
    fn test_selection_snaps_to_graphemes() {
        let (_env, mut surface) = surface_with("e\u{301}x");
        // 'e' + combining acute is one cluster spanning bytes 0..3
        surface.select(1, 3);
        assert_eq!(surface.selection(), Some((0, 3)));
    }

    #[test]
    fn test_native_bold_toggles() {
        let (_env, mut surface) = surface_with("say hello world");
        surface.select_text("hello");
        surface.apply_native_command(FormatCommand::Bold).unwrap();
        assert_eq!(surface.inner_html(), "say <b>hello</b> world");
        assert_eq!(surface.query_native_state(FormatCommand::Bold), Ok(true));

        surface.apply_native_command(FormatCommand::Bold).unwrap();
        assert_eq!(surface.inner_html(), "say hello world");
        assert_eq!(surface.query_native_state(FormatCommand::Bold), Ok(false));
    }

    #[test]
    fn test_typing_style_applies_to_next_text() {
        let (_env, mut surface) = surface_with("ab");
        surface.place_caret(1);
        surface.apply_native_command(FormatCommand::Italic).unwrap();
        assert_eq!(surface.query_native_state(FormatCommand::Italic), Ok(true));

        assert!(surface.type_text("X"));
        assert_eq!(surface.inner_html(), "a<i>X</i>b");
        assert_eq!(surface.selection(), Some((2, 2)));
    }

    #[test]
    fn test_moving_caret_clears_typing_style() {
        let (_env, mut surface) = surface_with("ab");
        surface.place_caret(1);
        surface.apply_native_command(FormatCommand::Bold).unwrap();
        surface.place_caret(2);
        assert_eq!(surface.query_native_state(FormatCommand::Bold), Ok(false));
    }

    #[test]
    fn test_replace_selection_selects_inserted_span() {
        let (_env, mut surface) = surface_with("say hello world");
        surface.select_text("hello");
        surface
            .replace_selection_with_html("<strong>hello</strong>")
            .unwrap();
        assert_eq!(surface.inner_html(), "say <strong>hello</strong> world");
        assert_eq!(surface.selection(), Some((4, 9)));
    }

    #[test]
    fn test_plain_text_replaces_whole_paragraph() {
        let (_env, mut surface) = surface_with("<p>ab</p><p>cd</p>");
        surface.select_text("cd");
        surface.insert_plain_text("x").unwrap();
        assert_eq!(surface.inner_html(), "<p>ab</p><p>x</p>");
        assert_eq!(surface.selection(), Some((3, 3)));
    }

    #[test]
    fn test_unsupported_primitives_report_errors() {
        let env = MemoryEnvironment::new();
        let mut surface = MemorySurface::new(&env).with_native_support(NativeSupport::NO_FORMATTING);
        surface.place_caret(0);
        assert!(!surface.supports_native_command(FormatCommand::Bold));
        assert!(matches!(
            surface.query_native_state(FormatCommand::Bold),
            Err(SurfaceError::Unsupported { .. })
        ));
        assert!(surface.apply_native_command(FormatCommand::Bold).is_err());
    }

    #[test]
    fn test_ancestry_of_collapsed_caret() {
        let (_env, mut surface) = surface_with("<b><i>x</i></b>y");
        surface.place_caret(1);
        let tags: Vec<_> = surface
            .selection_ancestry()
            .unwrap()
            .into_iter()
            .map(|e| e.tag_name)
            .collect();
        assert_eq!(tags, vec!["i", "b"]);
    }

    #[test]
    fn test_detach_releases_selection_and_focus() {
        let (env, mut surface) = surface_with("x");
        surface.focus();
        assert!(surface.has_focus());
        surface.detach();
        assert_eq!(env.focused(), None);
        assert_eq!(env.selection_owner(), None);
        assert!(surface.selected_text().is_none());
    }
}
