/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Engine configuration.
//!
//! Options can be built in code or loaded from a JSON/YAML document:
//!
//! ```yaml
//! auto-close: true
//! auto-drop: false
//! ```
//!
//! The camelCase spellings (`autoClose`, `autoDrop`) are accepted as aliases.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IceError, IceResult};

/// Configuration recognized by [`TemplateEngine`](crate::TemplateEngine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct EngineOptions {
    /// Reading output through `output()` finalizes the engine.
    #[serde(alias = "autoClose")]
    pub auto_close: bool,

    /// Writing a blank value removes the marker node instead of emptying it.
    #[serde(alias = "autoDrop")]
    pub auto_drop: bool,
}

impl EngineOptions {
    /// Create options with every flag disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable `auto_close`.
    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }

    /// Enable or disable `auto_drop`.
    pub fn with_auto_drop(mut self, auto_drop: bool) -> Self {
        self.auto_drop = auto_drop;
        self
    }

    /// Parse options from a JSON document.
    pub fn from_json(source: &str) -> IceResult<Self> {
        serde_json::from_str(source)
            .map_err(|e| IceError::config(format!("invalid engine options: {e}")))
    }

    /// Parse options from a YAML document.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(source: &str) -> IceResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source)
            .map_err(|e| IceError::config(format!("invalid engine options: {e}")))
    }

    /// Load options from a file, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON; everything else as YAML (which also
    /// accepts JSON syntax).
    pub fn from_file(path: &Path) -> IceResult<Self> {
        let source = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&source)
        } else {
            Self::from_yaml(&source)
        }
    }
}
