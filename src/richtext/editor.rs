// Rich text editor core
// Keeps the content string, the live surface and the active-format set in
// step with each other and with the host's change callback.

use super::applicator::{self, Applied};
use super::detector::FormatDetector;
use super::selection_events::SelectionListener;
use crate::format::{ActiveFormatSet, FormatCommand};
use crate::options::EditorOptions;
use crate::surface::{ClipboardData, Surface};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Work scheduled to run after the current event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    DetectFormats,
}

/// How a paste event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Default paste suppressed; plain text inserted
    Inserted,
    /// Default paste suppressed; the native insertion failed
    Failed,
    /// Editor disabled; the event was left alone
    Ignored,
}

impl PasteOutcome {
    /// Whether the host must cancel the environment's default paste
    pub fn prevents_default(self) -> bool {
        !matches!(self, PasteOutcome::Ignored)
    }
}

/// New content the host's change callback must hear about.
///
/// Editor operations hand this back instead of calling out themselves, so
/// the host runs its callback once it no longer holds the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange(String);

impl ContentChange {
    pub fn html(&self) -> &str {
        &self.0
    }
}

/// State-synchronization engine for one editing surface
pub struct RichTextEditor<S: Surface> {
    surface: S,
    content: String,
    active: ActiveFormatSet,
    disabled: bool,
    detector: Option<FormatDetector>,
    deferred: VecDeque<Deferred>,
}

impl<S: Surface> RichTextEditor<S> {
    /// Mount the editor on `surface`.
    ///
    /// The surface is made editable unless disabled, gets the placeholder,
    /// and receives non-empty initial content once.
    pub fn new(mut surface: S, options: &EditorOptions) -> Self {
        surface.set_editable(!options.disabled);
        surface.set_placeholder(&options.placeholder);

        let content = options.initial_content.clone();
        if !content.is_empty() && surface.is_attached() {
            surface.set_inner_html(&content);
        }

        RichTextEditor {
            surface,
            content,
            active: ActiveFormatSet::new(),
            disabled: options.disabled,
            detector: options.detect_formats.then(FormatDetector::new),
            deferred: VecDeque::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for the host's own event plumbing
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn active_formats(&self) -> ActiveFormatSet {
        self.active
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.surface.set_editable(!disabled);
    }

    fn can_edit(&self) -> bool {
        !self.disabled && self.surface.is_attached()
    }

    /// Apply `command` to the current selection. Never fails; problems are logged.
    ///
    /// Returns the new content when formatting changed it.
    pub fn apply_format(&mut self, command: FormatCommand) -> Option<ContentChange> {
        if !self.can_edit() {
            return None;
        }

        match applicator::apply_format(&mut self.surface, command) {
            Ok(applied) => {
                if applied == Applied::Skipped {
                    debug!(%command, "empty selection, nothing to format");
                }
                let changed = self.sync_from_surface();
                self.schedule(Deferred::DetectFormats);
                changed.then(|| self.change())
            }
            Err(err) => {
                warn!(%command, error = %err, "format command failed");
                None
            }
        }
    }

    /// Recompute the active formats at the selection.
    ///
    /// Leaves the previous set untouched when disabled, detached, or
    /// configured without a detector.
    pub fn detect_active_formats(&mut self) -> ActiveFormatSet {
        if !self.can_edit() {
            return self.active;
        }
        if let Some(detector) = &self.detector {
            self.active = detector.detect(&self.surface);
        }
        self.active
    }

    /// The surface content changed through user input
    pub fn handle_input(&mut self) -> Option<ContentChange> {
        if !self.surface.is_attached() {
            return None;
        }
        self.sync_from_surface();
        self.schedule(Deferred::DetectFormats);
        Some(self.change())
    }

    /// Insert the clipboard's plain text at the selection, dropping any markup
    pub fn handle_paste(
        &mut self,
        clipboard: &ClipboardData,
    ) -> (PasteOutcome, Option<ContentChange>) {
        if !self.can_edit() {
            debug!("paste ignored while disabled");
            return (PasteOutcome::Ignored, None);
        }

        let text = clipboard.plain_text.as_deref().unwrap_or_default();
        match self.surface.insert_plain_text(text) {
            Ok(()) => (PasteOutcome::Inserted, self.handle_input()),
            Err(err) => {
                warn!(error = %err, "plain text paste failed");
                (PasteOutcome::Failed, None)
            }
        }
    }

    /// The environment-wide selection moved
    pub fn handle_selection_change(&mut self) {
        if !self.can_edit() || !self.surface.contains_selection() {
            return;
        }
        self.detect_active_formats();
    }

    pub fn handle_key_up(&mut self) {
        self.detect_active_formats();
    }

    pub fn handle_mouse_up(&mut self) {
        self.detect_active_formats();
    }

    /// Host-driven overwrite: no change notification, no detection
    pub fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
        if self.surface.is_attached() {
            self.surface.set_inner_html(html);
        }
    }

    pub fn focus(&mut self) {
        self.surface.focus();
    }

    pub fn blur(&mut self) {
        self.surface.blur();
    }

    pub fn has_pending_work(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Run every deferred task queued so far, oldest first
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.deferred.pop_front() {
            trace!(?task, "running deferred task");
            match task {
                Deferred::DetectFormats => {
                    self.detect_active_formats();
                }
            }
            ran += 1;
        }
        ran
    }

    fn schedule(&mut self, task: Deferred) {
        self.deferred.push_back(task);
    }

    /// Mirror the surface into `content`; returns whether it changed
    fn sync_from_surface(&mut self) -> bool {
        let html = self.surface.inner_html();
        let changed = html != self.content;
        self.content = html;
        changed
    }

    fn change(&self) -> ContentChange {
        ContentChange(self.content.clone())
    }
}

impl<S: Surface> SelectionListener for RichTextEditor<S> {
    fn selection_changed(&mut self) {
        self.handle_selection_change();
    }
}
