/*
 * adapter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Glue between the engine and a publish/subscribe bus.
//!
//! The bus addresses actions by name. This adapter answers two of them:
//!
//! - `ice:create` builds a [`TemplateEngine`]
//! - `ice:debug` toggles process-wide diagnostics
//!
//! Decoding bus payloads into [`Request`]s is left to the bus binding, except
//! for the debug flag, whose payload is a bare JSON boolean.

use std::fmt;
use std::rc::Weak;

use crate::diagnostics::{self, LogSink};
use crate::engine::{Source, TemplateEngine};
use crate::error::{IceError, IceResult};
use crate::options::EngineOptions;

/// Action name for creating an engine.
pub const CREATE_ACTION: &str = "ice:create";

/// Action name for toggling debug diagnostics.
pub const DEBUG_ACTION: &str = "ice:debug";

/// A decoded bus request.
pub enum Request {
    Create {
        source: Source,
        options: EngineOptions,
        log_sink: Option<Weak<dyn LogSink>>,
    },
    SetDebug(bool),
}

impl Request {
    /// The action name this request answers to.
    pub fn action(&self) -> &'static str {
        match self {
            Request::Create { .. } => CREATE_ACTION,
            Request::SetDebug(_) => DEBUG_ACTION,
        }
    }

    /// Decode an `ice:debug` payload.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` unless the payload is a JSON boolean.
    pub fn set_debug_from_payload(payload: &serde_json::Value) -> IceResult<Self> {
        payload.as_bool().map(Request::SetDebug).ok_or_else(|| {
            IceError::invalid_argument(format!(
                "{DEBUG_ACTION} expects a boolean payload, got {payload}"
            ))
        })
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Create {
                source,
                options,
                log_sink,
            } => f
                .debug_struct("Create")
                .field("source", source)
                .field("options", options)
                .field("has_log_sink", &log_sink.is_some())
                .finish(),
            Request::SetDebug(enabled) => f.debug_tuple("SetDebug").field(enabled).finish(),
        }
    }
}

/// The result of a handled request.
#[derive(Debug)]
pub enum Reply {
    Created(TemplateEngine),
    /// Carries the previous debug setting.
    DebugSet(bool),
}

/// Handles the engine's bus actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IceAdapter;

impl IceAdapter {
    /// Every action name the adapter answers to.
    pub const ACTIONS: [&'static str; 2] = [CREATE_ACTION, DEBUG_ACTION];

    pub fn new() -> Self {
        Self
    }

    /// Whether `name` is one of this adapter's actions.
    pub fn handles(&self, name: &str) -> bool {
        Self::ACTIONS.contains(&name)
    }

    /// Carry out a request.
    pub fn dispatch(&self, request: Request) -> IceResult<Reply> {
        tracing::debug!(action = request.action(), "dispatching bus request");
        match request {
            Request::Create {
                source,
                options,
                log_sink,
            } => {
                let mut engine = TemplateEngine::new(source, options)?;
                engine.set_log_sink(log_sink);
                Ok(Reply::Created(engine))
            }
            Request::SetDebug(enabled) => Ok(Reply::DebugSet(diagnostics::set_debug(enabled))),
        }
    }
}
