// Toolbar definitions and filtering

use crate::format::{ActiveFormatSet, FormatCommand};
use crate::options::EditorOptions;

/// Static display metadata for a toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: FormatCommand,
    pub title: &'static str,
    /// Markup rendered inside the button
    pub icon: &'static str,
}

impl ToolDefinition {
    /// Native command the button triggers
    pub fn command(&self) -> &'static str {
        self.name.native_name()
    }
}

pub static DEFAULT_TOOLS: [ToolDefinition; 4] = [
    ToolDefinition {
        name: FormatCommand::Bold,
        title: "Bold (Ctrl+B)",
        icon: "<strong>B</strong>",
    },
    ToolDefinition {
        name: FormatCommand::Italic,
        title: "Italic (Ctrl+I)",
        icon: "<em>I</em>",
    },
    ToolDefinition {
        name: FormatCommand::Underline,
        title: "Underline (Ctrl+U)",
        icon: "<u>U</u>",
    },
    ToolDefinition {
        name: FormatCommand::StrikeThrough,
        title: "Strikethrough",
        icon: "<s>S</s>",
    },
];

/// Tools to render, in canonical order.
///
/// Empty when the toolbar is switched off or no requested tool matches.
pub fn visible_tools(options: &EditorOptions) -> Vec<&'static ToolDefinition> {
    if !options.toolbar {
        return Vec::new();
    }
    DEFAULT_TOOLS
        .iter()
        .filter(|tool| options.tools.contains(&tool.name))
        .collect()
}

/// Render state of one toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarButton {
    pub tool: &'static ToolDefinition,
    pub active: bool,
    pub disabled: bool,
}

pub fn toolbar_buttons(
    options: &EditorOptions,
    active: ActiveFormatSet,
    disabled: bool,
) -> Vec<ToolbarButton> {
    visible_tools(options)
        .into_iter()
        .map(|tool| ToolbarButton {
            tool,
            active: active.contains(tool.name),
            disabled,
        })
        .collect()
}
