// Construction options
// Everything a host can configure on an editor instance, loadable from TOML.

use crate::format::FormatCommand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid editor options: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize editor options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Minimum height of the editing area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Height {
    Pixels(u32),
    Css(String),
}

impl Height {
    /// Value usable as a CSS length
    pub fn css_value(&self) -> String {
        match self {
            Height::Pixels(px) => format!("{px}px"),
            Height::Css(value) => value.clone(),
        }
    }
}

impl Default for Height {
    fn default() -> Self {
        Height::Css("200px".to_string())
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_value())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorOptions {
    pub initial_content: String,
    pub placeholder: String,
    pub disabled: bool,
    /// Show the toolbar at all
    pub toolbar: bool,
    /// Formats offered on the toolbar
    pub tools: Vec<FormatCommand>,
    pub height: Height,
    /// Track active formats for toolbar state
    pub detect_formats: bool,
    // Presentation pass-through, not read by the editor core
    pub class_name: String,
    pub style: BTreeMap<String, String>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        EditorOptions {
            initial_content: String::new(),
            placeholder: "Start typing...".to_string(),
            disabled: false,
            toolbar: true,
            tools: FormatCommand::ALL.to_vec(),
            height: Height::default(),
            detect_formats: true,
            class_name: String::new(),
            style: BTreeMap::new(),
        }
    }
}

impl EditorOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let contents = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// CSS class list for the container element
    pub fn container_class(&self) -> String {
        if self.class_name.is_empty() {
            "wee-rich-text".to_string()
        } else {
            format!("wee-rich-text {}", self.class_name)
        }
    }
}
