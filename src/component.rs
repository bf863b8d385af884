// WeeRichText component
// Ties an editor, its toolbar state and the selection-change subscription
// together for the lifetime of one mounted instance.

use crate::content::EditorHandle;
use crate::format::{ActiveFormatSet, FormatCommand};
use crate::options::EditorOptions;
use crate::richtext::{
    ContentChange, PasteOutcome, RichTextEditor, SelectionDispatcher, SelectionListener,
    Subscription,
};
use crate::surface::{ClipboardData, Surface};
use crate::tools::{ToolbarButton, toolbar_buttons, visible_tools};
use std::cell::RefCell;
use std::rc::Rc;

/// A mounted rich text field.
///
/// Event handlers mirror what a host forwards from its UI: input, paste,
/// key and pointer release, shortcuts and toolbar clicks. Call
/// [`WeeRichText::tick`] once the current event has been handled so
/// deferred work runs.
///
/// The change callback runs after the editor is released, so it may use an
/// [`EditorHandle`] freely.
pub struct WeeRichText<S: Surface + 'static> {
    editor: Rc<RefCell<RichTextEditor<S>>>,
    options: EditorOptions,
    on_change: RefCell<Option<ChangeCallback>>,
    subscription: Option<Subscription>,
}

type ChangeCallback = Box<dyn FnMut(&str)>;

impl<S: Surface + 'static> WeeRichText<S> {
    pub fn mount(surface: S, options: EditorOptions, dispatcher: &SelectionDispatcher) -> Self {
        let editor = Rc::new(RefCell::new(RichTextEditor::new(surface, &options)));
        let listener: Rc<RefCell<dyn SelectionListener>> = editor.clone();
        let subscription = dispatcher.subscribe(listener);
        WeeRichText {
            editor,
            options,
            on_change: RefCell::new(None),
            subscription: Some(subscription),
        }
    }

    pub fn on_change(&self, callback: impl FnMut(&str) + 'static) {
        *self.on_change.borrow_mut() = Some(Box::new(callback));
    }

    pub fn handle(&self) -> EditorHandle<S> {
        EditorHandle::new(&self.editor)
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn content(&self) -> String {
        self.editor.borrow().content().to_string()
    }

    pub fn active_formats(&self) -> ActiveFormatSet {
        self.editor.borrow().active_formats()
    }

    pub fn is_disabled(&self) -> bool {
        self.editor.borrow().is_disabled()
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.options.disabled = disabled;
        self.editor.borrow_mut().set_disabled(disabled);
    }

    /// Run `f` against the surface, e.g. to move the selection or type
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(self.editor.borrow_mut().surface_mut())
    }

    /// Buttons to render; empty when the toolbar is hidden
    pub fn toolbar(&self) -> Vec<ToolbarButton> {
        let editor = self.editor.borrow();
        toolbar_buttons(&self.options, editor.active_formats(), editor.is_disabled())
    }

    /// Press the toolbar button for `command`; false if it is not shown
    pub fn click_tool(&self, command: FormatCommand) -> bool {
        if !visible_tools(&self.options).iter().any(|t| t.name == command) {
            return false;
        }
        self.apply_format(command);
        true
    }

    pub fn apply_format(&self, command: FormatCommand) {
        let change = self.editor.borrow_mut().apply_format(command);
        self.deliver(change);
    }

    pub fn input(&self) {
        let change = self.editor.borrow_mut().handle_input();
        self.deliver(change);
    }

    pub fn paste(&self, clipboard: &ClipboardData) -> PasteOutcome {
        let (outcome, change) = self.editor.borrow_mut().handle_paste(clipboard);
        self.deliver(change);
        outcome
    }

    pub fn key_up(&self) {
        self.editor.borrow_mut().handle_key_up();
    }

    pub fn mouse_up(&self) {
        self.editor.borrow_mut().handle_mouse_up();
    }

    /// Route Ctrl/Cmd + `key`; returns whether it was a format shortcut
    pub fn shortcut(&self, key: char) -> bool {
        let Some(command) = FormatCommand::from_shortcut(key) else {
            return false;
        };
        self.apply_format(command);
        true
    }

    /// Detect active formats now
    pub fn refresh_formats(&self) -> ActiveFormatSet {
        self.editor.borrow_mut().detect_active_formats()
    }

    /// Drain deferred work; returns the number of tasks run
    pub fn tick(&self) -> usize {
        self.editor.borrow_mut().run_deferred()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop listening for selection changes and drop the editor.
    /// Outstanding handles turn into no-ops.
    pub fn unmount(mut self) {
        self.subscription.take();
    }

    fn deliver(&self, change: Option<ContentChange>) {
        let Some(change) = change else {
            return;
        };
        // Taken out while it runs; a callback installed meanwhile wins
        let mut callback = self.on_change.borrow_mut().take();
        if let Some(callback) = callback.as_mut() {
            callback(change.html());
        }
        let mut slot = self.on_change.borrow_mut();
        if slot.is_none() {
            *slot = callback;
        }
    }
}
