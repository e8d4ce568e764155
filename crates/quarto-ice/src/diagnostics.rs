/*
 * diagnostics.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Debug diagnostics emitted by the engine.
//!
//! The engine reports a single kind of diagnostic, [`Diagnostic::MarkerNotFound`],
//! and only when two conditions hold:
//!
//! 1. Debug mode is enabled process-wide ([`set_debug`]).
//! 2. The engine was given a [`LogSink`] that is still alive.
//!
//! Sinks are held weakly: the engine never keeps a sink alive on its own.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable diagnostic emission for every engine in the process.
///
/// Returns the previous setting.
pub fn set_debug(enabled: bool) -> bool {
    DEBUG.swap(enabled, Ordering::SeqCst)
}

/// Check whether diagnostic emission is enabled.
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::SeqCst)
}

/// A diagnostic event emitted to a [`LogSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A marker lookup matched no node.
    MarkerNotFound { id: String },
}

impl Diagnostic {
    /// Stable identifier for the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MarkerNotFound { .. } => "marker-not-found",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MarkerNotFound { id } => write!(f, "marker not found: {id}"),
        }
    }
}

/// Receiver for engine diagnostics, usually backed by an event bus.
pub trait LogSink {
    /// Deliver one diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that records diagnostics in memory.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Consume the collector and return the diagnostics in emission order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl LogSink for DiagnosticCollector {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}

/// Sink that forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!(kind = diagnostic.kind(), "{}", diagnostic);
    }
}

/// Serializes tests that flip the process-wide debug flag.
#[cfg(test)]
pub(crate) fn debug_flag_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
