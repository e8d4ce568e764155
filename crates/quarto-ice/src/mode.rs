/*
 * mode.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Write modes shared by `text`, `attr` and `load`.
//!
//! | Mode | Result |
//! |---|---|
//! | `write` | new value replaces the current value |
//! | `append` | current value followed by new value |
//! | `prepend` | new value followed by current value |
//! | `remove` | current value with every match of the new value, read as a regular expression, removed |

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{IceError, IceResult};

/// How a new value combines with a node's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    Write,
    #[default]
    Append,
    Prepend,
    Remove,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Write => "write",
            WriteMode::Append => "append",
            WriteMode::Prepend => "prepend",
            WriteMode::Remove => "remove",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = IceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "write" => Ok(WriteMode::Write),
            "append" => Ok(WriteMode::Append),
            "prepend" => Ok(WriteMode::Prepend),
            "remove" => Ok(WriteMode::Remove),
            other => Err(IceError::invalid_argument(format!(
                "unknown write mode '{other}' (expected write, append, prepend or remove)"
            ))),
        }
    }
}

/// A write mode bound to its value, ready to apply to any number of nodes.
///
/// Compiling happens once per operation, before any node is touched, so an
/// invalid `remove` pattern fails the whole call rather than part of it.
#[derive(Debug, Clone)]
pub(crate) enum Transform {
    Write(String),
    Append(String),
    Prepend(String),
    Remove(Regex),
}

impl Transform {
    pub(crate) fn compile(mode: WriteMode, value: String) -> IceResult<Self> {
        Ok(match mode {
            WriteMode::Write => Transform::Write(value),
            WriteMode::Append => Transform::Append(value),
            WriteMode::Prepend => Transform::Prepend(value),
            WriteMode::Remove => Transform::Remove(Regex::new(&value).map_err(|e| {
                IceError::invalid_argument(format!("invalid remove pattern '{value}': {e}"))
            })?),
        })
    }

    /// Whether applying this transform reads the current value at all.
    pub(crate) fn reads_current(&self) -> bool {
        !matches!(self, Transform::Write(_))
    }

    pub(crate) fn apply(&self, current: &str) -> String {
        match self {
            Transform::Write(value) => value.clone(),
            Transform::Append(value) => format!("{current}{value}"),
            Transform::Prepend(value) => format!("{value}{current}"),
            Transform::Remove(pattern) => pattern.replace_all(current, "").into_owned(),
        }
    }
}
