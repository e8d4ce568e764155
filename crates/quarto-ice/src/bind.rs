/*
 * bind.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Applying a data document to a template.
//!
//! A data document is a map from marker id to value. Each entry becomes one
//! engine call, chosen by the shape of the value:
//!
//! | Value | Call |
//! |---|---|
//! | `null`, `false` | `discard(id, true)` |
//! | `true` | nothing; the marker is kept as-is |
//! | string, number | `text(id, value, write)` |
//! | list | `repeat(id, list)`; map items are bound into each clone |
//! | map | `within(id, map)`, bound recursively |
//!
//! Entries are applied in key order.

use std::path::Path;

use crate::engine::TemplateEngine;
use crate::error::{IceError, IceResult};
use crate::mode::WriteMode;
use crate::value::IceValue;

/// Apply a data document to `engine`.
///
/// # Errors
///
/// `InvalidArgument` if `data` is not a map; otherwise whatever the
/// individual engine calls return.
pub fn bind(engine: &mut TemplateEngine, data: &IceValue) -> IceResult<()> {
    let Some(entries) = data.as_map() else {
        return Err(IceError::invalid_argument(format!(
            "data document must be a map, got {}",
            data.kind()
        )));
    };

    for (id, value) in entries {
        tracing::trace!(id = %id, kind = value.kind(), "binding");
        match value {
            IceValue::Null | IceValue::Bool(false) => engine.discard(id, true)?,
            IceValue::Bool(true) => {}
            IceValue::List(_) => {
                engine.repeat_with(id, value.clone(), |_, item, clone| {
                    bind_item(clone, id, item)
                })?;
            }
            IceValue::Map(_) => {
                engine.within(id, value.clone(), |scope, child| bind(child, scope))?;
            }
            _ => engine.text(id, value.clone(), WriteMode::Write)?,
        }
    }
    Ok(())
}

fn bind_item(clone: &mut TemplateEngine, id: &str, item: &IceValue) -> IceResult<()> {
    if item.as_map().is_some() {
        bind(clone, item)
    } else {
        clone.text(id, item.clone(), WriteMode::Write)
    }
}

/// Parse a JSON data document.
pub fn data_from_json(source: &str) -> IceResult<IceValue> {
    let value: serde_json::Value = serde_json::from_str(source)
        .map_err(|e| IceError::config(format!("invalid data document: {e}")))?;
    Ok(value.into())
}

/// Parse a YAML data document. An empty document is an empty map.
pub fn data_from_yaml(source: &str) -> IceResult<IceValue> {
    if source.trim().is_empty() {
        return Ok(IceValue::Map(Default::default()));
    }
    let value: serde_json::Value = serde_yaml::from_str(source)
        .map_err(|e| IceError::config(format!("invalid data document: {e}")))?;
    Ok(value.into())
}

/// Load a data document from a file, choosing the format by extension
/// (`.json` as JSON, anything else as YAML).
pub fn load_data_file(path: &Path) -> IceResult<IceValue> {
    let source = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        data_from_json(&source)
    } else {
        data_from_yaml(&source)
    }
}
