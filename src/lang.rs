use serde::{Serialize, Deserialize};
use std::fmt;

/// Supported locale tags for generated content and user-facing strings.
/// The preference is persisted independently of the plan and survives a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    /// Parse a stored tag, falling back to the default for unknown values
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "zh" => Language::Chinese,
            _ => Language::English,
        }
    }

    /// Fallback text substituted when an explanation fetch fails.
    /// Never written into the knowledge-point record, so the fetch stays retryable.
    pub fn explanation_fallback(&self) -> &'static str {
        match self {
            Language::English => "Failed to load explanation. Please try again.",
            Language::Chinese => "加载解释失败，请重试。",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
