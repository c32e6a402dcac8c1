//! Error types for LESS compilation.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors that can occur while compiling LESS source.
///
/// Note that an unresolvable `@import` is NOT an error at this layer: the
/// directive is left in place and the downstream engine reports it.
#[derive(Debug, Error)]
pub enum LessError {
    /// No LESS engine binary could be located.
    #[error("no LESS engine found (set {var} or install `lessc` on PATH)", var = crate::engine::LESSC_ENV_VAR)]
    EngineNotFound,

    /// The engine ran and failed.
    #[error("LESS engine `{name}` exited with status {status}: {stderr}")]
    Engine {
        name: &'static str,
        status: i32,
        stderr: String,
    },

    /// A compile request carried neither source text nor a source path.
    #[error("compile request carries neither source text nor a source path")]
    EmptyRequest,

    /// File I/O error reading compile input or talking to the engine.
    #[error("failed to read LESS source: {0}")]
    Io(#[from] std::io::Error),
}
