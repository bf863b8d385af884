// Command application
// Applies a format to the current selection, natively when the environment
// can, otherwise by wrapping the selected text in markup.

use crate::dom::escape_text;
use crate::format::FormatCommand;
use crate::surface::{Surface, SurfaceError};
use tracing::debug;

/// Which path a format request took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Native,
    Wrapped,
    /// Fallback path with nothing selected
    Skipped,
}

/// Apply `command` to the surface's selection.
///
/// Focuses the surface first. Errors come from the native operation or the
/// markup replacement and are the caller's to absorb.
pub fn apply_format<S: Surface + ?Sized>(
    surface: &mut S,
    command: FormatCommand,
) -> Result<Applied, SurfaceError> {
    surface.focus();

    if surface.supports_native_command(command) {
        surface.apply_native_command(command)?;
        return Ok(Applied::Native);
    }

    debug!(%command, "native command unsupported, wrapping selection");
    let selected = surface.selected_text().unwrap_or_default();
    if selected.is_empty() {
        return Ok(Applied::Skipped);
    }
    surface.replace_selection_with_html(&wrap_markup(command, &selected))?;
    Ok(Applied::Wrapped)
}

/// `text` escaped and wrapped in the command's fallback tag
pub fn wrap_markup(command: FormatCommand, text: &str) -> String {
    let tag = command.wrap_tag();
    format!("<{tag}>{}</{tag}>", escape_text(text))
}
