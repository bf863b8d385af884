// Computed style inference
// Resolves the three properties format detection cares about from tag
// defaults and inline `style` declarations.

use super::{Dom, NodeData, NodeId};
use regex::Regex;
use std::sync::LazyLock;

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]+)").expect("declaration pattern is valid")
});

/// Resolved style of an element, in the shape a browser reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Numeric weight such as `"400"` or `"700"`
    pub font_weight: String,
    pub font_style: String,
    /// Space separated decoration lines, or `"none"`
    pub text_decoration: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            font_weight: "400".to_string(),
            font_style: "normal".to_string(),
            text_decoration: "none".to_string(),
        }
    }
}

/// Split a `style` attribute into lowercase `(property, value)` pairs
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    DECLARATION_RE
        .captures_iter(style)
        .map(|cap| {
            (
                cap[1].to_ascii_lowercase(),
                cap[2].trim().to_ascii_lowercase(),
            )
        })
        .collect()
}

impl Dom {
    /// Style of element `id` with inheritance applied from the root down
    pub fn computed_style(&self, id: NodeId) -> ComputedStyle {
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        if id != Dom::ROOT {
            chain.push(id);
        }

        let mut weight: u32 = 400;
        let mut italic = false;
        let mut decoration: Vec<&'static str> = Vec::new();

        for node in chain {
            let NodeData::Element(el) = self.data(node) else {
                continue;
            };
            // text-decoration does not inherit
            decoration.clear();

            match el.tag.as_str() {
                "b" | "strong" | "th" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    weight = 700;
                }
                "em" | "i" | "cite" | "var" | "dfn" => italic = true,
                "u" | "ins" => decoration.push("underline"),
                "s" | "strike" | "del" => decoration.push("line-through"),
                _ => {}
            }

            let Some(style) = self.attr(node, "style") else {
                continue;
            };
            for (property, value) in parse_inline_style(style) {
                match property.as_str() {
                    "font-weight" => weight = resolve_weight(&value, weight),
                    "font-style" => italic = value == "italic" || value == "oblique",
                    "text-decoration" | "text-decoration-line" => {
                        decoration.clear();
                        if value.contains("underline") {
                            decoration.push("underline");
                        }
                        if value.contains("line-through") {
                            decoration.push("line-through");
                        }
                    }
                    _ => {}
                }
            }
        }

        ComputedStyle {
            font_weight: weight.to_string(),
            font_style: if italic { "italic" } else { "normal" }.to_string(),
            text_decoration: if decoration.is_empty() {
                "none".to_string()
            } else {
                decoration.join(" ")
            },
        }
    }
}

fn resolve_weight(value: &str, inherited: u32) -> u32 {
    match value {
        "normal" => 400,
        "bold" => 700,
        "bolder" => match inherited {
            0..400 => 400,
            400..600 => 700,
            _ => 900,
        },
        "lighter" => match inherited {
            0..600 => 100,
            600..800 => 400,
            _ => 700,
        },
        other => other.parse().unwrap_or(inherited),
    }
}
