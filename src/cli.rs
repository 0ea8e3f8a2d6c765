use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ScreenKind};

/// A counter that fetches trivia about its value, drawn two ways.
#[derive(Debug, Parser)]
#[command(name = "counterfact", version, about)]
pub struct Cli {
    /// Config file (default: ~/.config/counterfact/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Screen to open first
    #[arg(long, value_enum)]
    pub screen: Option<ScreenArg>,

    /// Fact endpoint; the count is appended as a path segment
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Clear a loaded fact after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub auto_dismiss: Option<u64>,

    /// Write logs to PATH.<timestamp>.<pid> (overrides COUNTERFACT_LOG)
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenArg {
    Declarative,
    Imperative,
}

impl From<ScreenArg> for ScreenKind {
    fn from(arg: ScreenArg) -> Self {
        match arg {
            ScreenArg::Declarative => ScreenKind::Declarative,
            ScreenArg::Imperative => ScreenKind::Imperative,
        }
    }
}

impl Cli {
    /// Apply command-line overrides on top of the file config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(screen) = self.screen {
            config.ui.start_screen = screen.into();
        }
        if let Some(base_url) = &self.base_url {
            config.facts.base_url = base_url.clone();
        }
        if let Some(ms) = self.auto_dismiss {
            config.facts.auto_dismiss_ms = Some(ms);
        }
    }
}
