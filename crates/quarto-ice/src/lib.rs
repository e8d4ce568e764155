/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Marker-driven HTML template mutation.
//!
//! Templates are plain HTML. Elements carrying `data-ice="<id>"` are markers,
//! and a [`TemplateEngine`] mutates them by id:
//!
//! - Text: [`text`](TemplateEngine::text) with a [`WriteMode`]
//! - Attributes: [`attr`](TemplateEngine::attr)
//! - Inner HTML or another template: [`load`](TemplateEngine::load)
//! - List expansion: [`repeat`](TemplateEngine::repeat)
//! - Sub-scopes: [`within`](TemplateEngine::within)
//! - Removal: [`discard`](TemplateEngine::discard)
//!
//! Output is read with [`output`](TemplateEngine::output), which also closes
//! the engine when [`EngineOptions::auto_close`] is set. Regions filled by
//! `load` are fenced off from later lookups; the bookkeeping attribute that
//! fences them never reaches the output.
//!
//! Whole data documents can be applied at once with [`bind`].
//!
//! # Example
//!
//! ```ignore
//! use quarto_ice::{RepeatCallback, TemplateEngine, WriteMode};
//!
//! let mut page = TemplateEngine::parse(r#"<h1 data-ice="title"></h1><ul><li data-ice="item"></li></ul>"#)?;
//! page.text("title", "Groceries", WriteMode::Write)?;
//! page.repeat("item", vec!["eggs", "milk"], RepeatCallback::Text)?;
//!
//! let html = page.finalize()?;
//! ```

pub mod adapter;
pub mod bind;
pub mod diagnostics;
pub mod dom;
pub mod engine;
pub mod error;
pub mod expand;
pub mod marker;
pub mod mode;
pub mod options;
pub mod value;

// Re-export main types at crate root
pub use adapter::{CREATE_ACTION, DEBUG_ACTION, IceAdapter, Reply, Request};
pub use bind::{bind, load_data_file};
pub use diagnostics::{
    Diagnostic, DiagnosticCollector, LogSink, TracingSink, debug_enabled, set_debug,
};
pub use engine::{LoadContent, Source, TemplateEngine};
pub use error::{IceError, IceResult};
pub use expand::{ItemCallback, RepeatCallback};
pub use marker::{LOADED_ATTR, MARKER_ATTR};
pub use mode::WriteMode;
pub use options::EngineOptions;
pub use value::IceValue;
