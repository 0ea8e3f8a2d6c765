use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub facts: FactsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Fact service and fetch timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsConfig {
    /// Endpoint the count is appended to (e.g., "http://numberapi.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Artificial latency before each request in milliseconds (default: 1000).
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,
    /// Clear a loaded fact after this many milliseconds (default: never).
    #[serde(default)]
    pub auto_dismiss_ms: Option<u64>,
    /// Total request timeout in seconds (default: HTTP client default).
    #[serde(default)]
    pub request_timeout_seconds: Option<u32>,
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Screen shown at startup.
    #[serde(default)]
    pub start_screen: ScreenKind,
    /// Duration of animated transitions in milliseconds (default: 300).
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    /// Redraw tick in milliseconds (default: 33).
    #[serde(default = "default_frame_rate_ms")]
    pub frame_rate_ms: u64,
    /// How the imperative screen shows a loaded fact.
    #[serde(default)]
    pub fact_presentation: FactPresentation,
}

/// The two renditions of the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenKind {
    Declarative,
    #[default]
    Imperative,
}

/// Where the imperative screen puts a loaded fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactPresentation {
    /// In a label inside the counter stack.
    #[default]
    Inline,
    /// In a sheet presented over the counter.
    Sheet,
}

fn default_base_url() -> String {
    "http://numberapi.com".to_string()
}

fn default_fetch_delay_ms() -> u64 {
    1000
}

fn default_animation_ms() -> u64 {
    300
}

fn default_frame_rate_ms() -> u64 {
    33
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_delay_ms: default_fetch_delay_ms(),
            auto_dismiss_ms: None,
            request_timeout_seconds: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_screen: ScreenKind::default(),
            animation_ms: default_animation_ms(),
            frame_rate_ms: default_frame_rate_ms(),
            fact_presentation: FactPresentation::default(),
        }
    }
}
