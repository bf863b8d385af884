// Formatting commands
// The closed set of inline formats the editor can apply and detect

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four inline formatting operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
}

impl FormatCommand {
    /// All commands in canonical toolbar order
    pub const ALL: [FormatCommand; 4] = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::StrikeThrough,
    ];

    /// Name of the native editing command
    pub fn native_name(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::StrikeThrough => "strikeThrough",
        }
    }

    /// Tag used when the markup has to be wrapped manually
    pub fn wrap_tag(self) -> &'static str {
        match self {
            FormatCommand::Bold => "strong",
            FormatCommand::Italic => "em",
            FormatCommand::Underline => "u",
            FormatCommand::StrikeThrough => "s",
        }
    }

    /// Tags that carry this format when found in the selection ancestry
    pub fn equivalent_tags(self) -> &'static [&'static str] {
        match self {
            FormatCommand::Bold => &["strong", "b"],
            FormatCommand::Italic => &["em", "i"],
            FormatCommand::Underline => &["u"],
            FormatCommand::StrikeThrough => &["s", "strike", "del"],
        }
    }

    /// Case-insensitive check against [`FormatCommand::equivalent_tags`]
    pub fn matches_tag(self, tag: &str) -> bool {
        self.equivalent_tags()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Look up a command by its native name
    pub fn from_native_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.native_name() == name)
    }

    /// Command bound to Ctrl/Cmd + key, if any
    pub fn from_shortcut(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'b' => Some(FormatCommand::Bold),
            'i' => Some(FormatCommand::Italic),
            'u' => Some(FormatCommand::Underline),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            FormatCommand::Bold => 1,
            FormatCommand::Italic => 1 << 1,
            FormatCommand::Underline => 1 << 2,
            FormatCommand::StrikeThrough => 1 << 3,
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown format command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for FormatCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_native_name(s).ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// The set of commands in effect at the current selection.
///
/// Always recomputed as a whole; never patched incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActiveFormatSet(u8);

impl ActiveFormatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, command: FormatCommand) {
        self.0 |= command.bit();
    }

    /// Flip membership of `command`
    pub fn toggle(&mut self, command: FormatCommand) {
        self.0 ^= command.bit();
    }

    pub fn contains(&self, command: FormatCommand) -> bool {
        self.0 & command.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: Self) -> Self {
        ActiveFormatSet(self.0 | other.0)
    }

    /// Members in canonical order
    pub fn iter(&self) -> impl Iterator<Item = FormatCommand> + '_ {
        FormatCommand::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<FormatCommand> for ActiveFormatSet {
    fn from_iter<T: IntoIterator<Item = FormatCommand>>(iter: T) -> Self {
        let mut set = ActiveFormatSet::new();
        for command in iter {
            set.insert(command);
        }
        set
    }
}

impl Extend<FormatCommand> for ActiveFormatSet {
    fn extend<T: IntoIterator<Item = FormatCommand>>(&mut self, iter: T) {
        for command in iter {
            self.insert(command);
        }
    }
}
