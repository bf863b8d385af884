// Editable surface abstraction
// The core reads and mutates the live editing region only through these
// traits, so a browser binding and the in-memory surface are interchangeable.

pub mod memory;

use crate::dom::ComputedStyle;
use crate::format::FormatCommand;
use thiserror::Error;

pub use memory::{MemoryEnvironment, MemorySurface, NativeSupport};

/// Errors a surface may report. The editor absorbs all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("{operation} is not supported by this surface")]
    Unsupported { operation: &'static str },
    #[error("no selection inside the surface")]
    NoSelection,
    #[error("surface is detached")]
    Detached,
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// One element on the path from the selection start up to the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag_name: String,
    pub computed_style: ComputedStyle,
}

impl ElementSnapshot {
    pub fn new(tag_name: impl Into<String>, computed_style: ComputedStyle) -> Self {
        ElementSnapshot {
            tag_name: tag_name.into(),
            computed_style,
        }
    }

    /// Snapshot with browser default style
    pub fn plain(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, ComputedStyle::default())
    }
}

/// Payloads offered by a paste event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub plain_text: Option<String>,
    pub html: Option<String>,
}

impl ClipboardData {
    pub fn plain(text: impl Into<String>) -> Self {
        ClipboardData {
            plain_text: Some(text.into()),
            html: None,
        }
    }

    pub fn rich(text: impl Into<String>, html: impl Into<String>) -> Self {
        ClipboardData {
            plain_text: Some(text.into()),
            html: Some(html.into()),
        }
    }
}

/// Native formatting primitives of the host environment
pub trait NativeCommands {
    /// Whether the environment can run `command` natively
    fn supports_native_command(&self, command: FormatCommand) -> bool;

    /// Whether `command` is in effect at the current selection.
    /// Errors when the query mechanism is missing or throws.
    fn query_native_state(&self, command: FormatCommand) -> Result<bool, SurfaceError>;

    /// Run `command` against the current selection
    fn apply_native_command(&mut self, command: FormatCommand) -> Result<(), SurfaceError>;

    /// Native plain-text insertion at the selection
    fn insert_plain_text(&mut self, text: &str) -> Result<(), SurfaceError>;
}

/// A focusable, directly mutable text region owned by the host
pub trait Surface: NativeCommands {
    /// False once the host has torn the region down
    fn is_attached(&self) -> bool;

    /// Serialized content (innerHTML)
    fn inner_html(&self) -> String;

    /// Overwrite the content verbatim
    fn set_inner_html(&mut self, html: &str);

    fn focus(&mut self);
    fn blur(&mut self);
    fn has_focus(&self) -> bool;

    fn set_editable(&mut self, editable: bool);
    fn set_placeholder(&mut self, placeholder: &str);

    /// Whether the environment's selection lies inside this surface
    fn contains_selection(&self) -> bool;

    /// Text of the current selection, `None` if there is no selection here
    fn selected_text(&self) -> Option<String>;

    /// Replace the selected content with parsed markup
    fn replace_selection_with_html(&mut self, html: &str) -> Result<(), SurfaceError>;

    /// Elements from the selection's start container upward, nearest first,
    /// excluding the surface element itself. `None` without a selection here.
    fn selection_ancestry(&self) -> Option<Vec<ElementSnapshot>>;
}
