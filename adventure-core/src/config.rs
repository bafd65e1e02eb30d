//! Application configuration.

use std::path::PathBuf;
use thiserror::Error;

use crate::tree_view::LineBudget;

/// Environment variable naming the story library directory.
pub const LIBRARY_DIR_VAR: &str = "ADVENTURE_LIBRARY_DIR";
/// Environment variable overriding the first preview line budget.
pub const FIRST_LINE_VAR: &str = "ADVENTURE_FIRST_LINE";
/// Environment variable overriding the second preview line budget.
pub const SECOND_LINE_VAR: &str = "ADVENTURE_SECOND_LINE";

/// Variables consulted for the user's display name, in order.
pub const DEFAULT_PROFILE_VARS: [&str; 3] = ["ADVENTURE_USER_NAME", "USER", "USERNAME"];

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Configuration for the adventure application.
#[derive(Debug, Clone)]
pub struct AdventureConfig {
    /// Directory holding saved stories.
    pub library_dir: PathBuf,
    /// Character budget for fragment node previews.
    pub line_budget: LineBudget,
    /// Environment variables that may hold the user's display name.
    pub profile_env_vars: Vec<String>,
}

impl Default for AdventureConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("stories"),
            line_budget: LineBudget::default(),
            profile_env_vars: DEFAULT_PROFILE_VARS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl AdventureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the defaults and apply any `ADVENTURE_*` environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup(LIBRARY_DIR_VAR).filter(|d| !d.is_empty()) {
            config.library_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(FIRST_LINE_VAR) {
            config.line_budget.first_line = parse_budget(FIRST_LINE_VAR, &value)?;
        }
        if let Some(value) = lookup(SECOND_LINE_VAR) {
            config.line_budget.second_line = parse_budget(SECOND_LINE_VAR, &value)?;
        }

        Ok(config)
    }

    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = dir.into();
        self
    }

    pub fn with_line_budget(mut self, budget: LineBudget) -> Self {
        self.line_budget = budget;
        self
    }

    pub fn with_profile_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile_env_vars = vars.into_iter().map(Into::into).collect();
        self
    }
}

fn parse_budget(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}
