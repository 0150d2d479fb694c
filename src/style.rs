//! Presentation settings a manifest may override. The engine never interprets them beyond
//! passing them to prompters and to custom generation logic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromptStyle {
    pub prefix: String,
    pub help_separator: String,
}

impl Default for PromptStyle {
    fn default() -> Self {
        Self { prefix: "? ".to_string(), help_separator: " - ".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryStyle {
    pub prefix: String,
}

impl Default for SummaryStyle {
    fn default() -> Self {
        Self { prefix: "  → ".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorStyle {
    pub label: String,
}

impl Default for ErrorStyle {
    fn default() -> Self {
        Self { label: "Error:".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Style {
    pub prompt: PromptStyle,
    pub summary: SummaryStyle,
    pub error: ErrorStyle,
    pub input_prefix: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            prompt: PromptStyle::default(),
            summary: SummaryStyle::default(),
            error: ErrorStyle::default(),
            input_prefix: "›".to_string(),
        }
    }
}
