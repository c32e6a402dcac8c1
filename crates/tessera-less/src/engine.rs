//! The LESS-to-CSS engine seam.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The transformation itself is delegated to an external engine; this
//! module only defines the trait and a native implementation that drives
//! the `lessc` reference compiler as a subprocess. Hosts embedding a
//! different engine implement [`LessEngine`] themselves.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::LessError;

/// Environment variable overriding the `lessc` binary location.
pub const LESSC_ENV_VAR: &str = "TESSERA_LESSC";

/// Options passed through to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Whether to produce compressed output.
    pub minified: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { minified: true }
    }
}

/// An external LESS-to-CSS compiler.
pub trait LessEngine: Send + Sync {
    /// Engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Transform flattened LESS source to CSS.
    ///
    /// `base_path` is the absolute compilation context directory, handed to
    /// the engine for any import resolution it performs on its own.
    fn compile(
        &self,
        less: &str,
        base_path: &Path,
        options: &CompileOptions,
    ) -> Result<String, LessError>;
}

/// Native engine backed by the `lessc` reference compiler.
///
/// The binary is located from the [`LESSC_ENV_VAR`] environment variable
/// when set, falling back to a PATH lookup. Source is fed on stdin;
/// failures surface the engine's exit status and stderr.
#[derive(Debug, Clone)]
pub struct LesscEngine {
    binary: PathBuf,
}

impl LesscEngine {
    /// Locate `lessc` via the environment override, then PATH.
    pub fn locate() -> Result<Self, LessError> {
        if let Ok(path) = env::var(LESSC_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Ok(Self { binary: path });
            }
        }
        which::which("lessc")
            .map(|binary| Self { binary })
            .map_err(|_| LessError::EngineNotFound)
    }

    /// Use a known binary without any lookup.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl LessEngine for LesscEngine {
    fn name(&self) -> &'static str {
        "lessc"
    }

    fn compile(
        &self,
        less: &str,
        base_path: &Path,
        options: &CompileOptions,
    ) -> Result<String, LessError> {
        let mut command = Command::new(&self.binary);
        command
            .arg(format!("--include-path={}", base_path.display()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if options.minified {
            command.arg("--compress");
        }
        // "-" reads the source from stdin
        command.arg("-");

        let mut child = command.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(less.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(LessError::Engine {
                name: self.name(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_to_minified() {
        assert!(CompileOptions::default().minified);
    }

    #[test]
    fn test_with_binary_skips_lookup() {
        let engine = LesscEngine::with_binary("/opt/less/bin/lessc");
        assert_eq!(engine.name(), "lessc");
        assert_eq!(engine.binary, PathBuf::from("/opt/less/bin/lessc"));
    }
}
