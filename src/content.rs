// Host-facing content access
// The small capability surface a host holds on to without owning the editor.

use crate::richtext::RichTextEditor;
use crate::surface::Surface;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Provides read access to the current content as an HTML fragment.
pub trait ContentProvider {
    fn get_content(&self) -> String;
}

/// Replaces the content programmatically.
///
/// Implementations must not report this as a user edit.
pub trait ContentLoader {
    fn set_content(&mut self, html: &str);
}

impl<S: Surface> ContentProvider for RichTextEditor<S> {
    fn get_content(&self) -> String {
        self.content().to_string()
    }
}

impl<S: Surface> ContentLoader for RichTextEditor<S> {
    fn set_content(&mut self, html: &str) {
        RichTextEditor::set_content(self, html);
    }
}

/// Imperative handle: content access plus focus control.
///
/// Holds the editor weakly; once the component is gone every call is a
/// no-op and [`EditorHandle::get_content`] returns an empty string.
pub struct EditorHandle<S: Surface> {
    editor: Weak<RefCell<RichTextEditor<S>>>,
}

impl<S: Surface> Clone for EditorHandle<S> {
    fn clone(&self) -> Self {
        EditorHandle {
            editor: self.editor.clone(),
        }
    }
}

impl<S: Surface> EditorHandle<S> {
    pub(crate) fn new(editor: &Rc<RefCell<RichTextEditor<S>>>) -> Self {
        EditorHandle {
            editor: Rc::downgrade(editor),
        }
    }

    fn with_editor<R>(&self, f: impl FnOnce(&mut RichTextEditor<S>) -> R) -> Option<R> {
        let editor = self.editor.upgrade()?;
        let mut editor = editor.try_borrow_mut().ok()?;
        Some(f(&mut editor))
    }

    /// Current content; readable while the editor is busy notifying the host
    pub fn get_content(&self) -> String {
        let Some(editor) = self.editor.upgrade() else {
            return String::new();
        };
        match editor.try_borrow() {
            Ok(editor) => editor.content().to_string(),
            Err(_) => String::new(),
        }
    }

    pub fn set_content(&self, html: &str) {
        self.with_editor(|e| e.set_content(html));
    }

    pub fn focus(&self) {
        self.with_editor(|e| e.focus());
    }

    pub fn blur(&self) {
        self.with_editor(|e| e.blur());
    }

    /// Whether the editor behind the handle still exists
    pub fn is_alive(&self) -> bool {
        self.editor.strong_count() > 0
    }
}

impl<S: Surface> ContentProvider for EditorHandle<S> {
    fn get_content(&self) -> String {
        EditorHandle::get_content(self)
    }
}

impl<S: Surface> ContentLoader for EditorHandle<S> {
    fn set_content(&mut self, html: &str) {
        EditorHandle::set_content(self, html);
    }
}
