// Active-format detection
// Works out which formats are in effect at the selection so toolbar
// buttons can show their state.

use crate::dom::ComputedStyle;
use crate::format::{ActiveFormatSet, FormatCommand};
use crate::surface::{ElementSnapshot, Surface};
use tracing::debug;

/// Computes the [`ActiveFormatSet`] for a surface.
///
/// Native state queries are tried first; when the environment lacks them or
/// they fail, the selection's ancestry is inspected for formatting tags and
/// computed style.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDetector;

impl FormatDetector {
    pub fn new() -> Self {
        FormatDetector
    }

    pub fn detect<S: Surface + ?Sized>(&self, surface: &S) -> ActiveFormatSet {
        let mut active = ActiveFormatSet::new();
        for command in FormatCommand::ALL {
            match surface.query_native_state(command) {
                Ok(true) => active.insert(command),
                Ok(false) => {}
                Err(err) => {
                    debug!(%command, %err, "native state query failed, inspecting selection ancestry");
                    return self.detect_structural(surface);
                }
            }
        }
        active
    }

    /// Ancestry-based fallback; empty without a selection in the surface
    pub fn detect_structural<S: Surface + ?Sized>(&self, surface: &S) -> ActiveFormatSet {
        surface
            .selection_ancestry()
            .map(|ancestry| formats_in_ancestry(&ancestry))
            .unwrap_or_default()
    }
}

/// Union of tag and style signals over every element in `ancestry`
pub fn formats_in_ancestry(ancestry: &[ElementSnapshot]) -> ActiveFormatSet {
    let mut active = ActiveFormatSet::new();
    for element in ancestry {
        active.extend(
            FormatCommand::ALL
                .into_iter()
                .filter(|c| c.matches_tag(&element.tag_name)),
        );
        active = active.union(formats_from_style(&element.computed_style));
    }
    active
}

/// Formats implied by a computed style
pub fn formats_from_style(style: &ComputedStyle) -> ActiveFormatSet {
    let mut active = ActiveFormatSet::new();

    let weight = style.font_weight.trim();
    if weight.eq_ignore_ascii_case("bold") || weight.parse::<u32>().is_ok_and(|w| w >= 600) {
        active.insert(FormatCommand::Bold);
    }
    if style.font_style.trim().eq_ignore_ascii_case("italic") {
        active.insert(FormatCommand::Italic);
    }
    if style.text_decoration.contains("underline") {
        active.insert(FormatCommand::Underline);
    }
    if style.text_decoration.contains("line-through") {
        active.insert(FormatCommand::StrikeThrough);
    }
    active
}
