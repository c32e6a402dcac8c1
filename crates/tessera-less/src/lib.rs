//! LESS import resolution and compilation for Tessera.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - `ImportResolver`: recursive `@import` expansion over a library path set
//! - `LessEngine`: the external-compiler seam, with a `lessc` subprocess
//!   implementation
//! - `LessCompiler`: the resolve-then-compile entry points used by the
//!   render pipeline

mod compiler;
mod engine;
mod error;
mod resolve;

pub use compiler::{CompileRequest, LessCompiler};
pub use engine::{CompileOptions, LESSC_ENV_VAR, LessEngine, LesscEngine};
pub use error::LessError;
pub use resolve::ImportResolver;
