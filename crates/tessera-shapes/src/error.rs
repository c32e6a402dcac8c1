//! Error types for shape rendering.
//!
//! Copyright (c) 2025 Posit, PBC

use thiserror::Error;

/// Errors that can occur rendering a stylesheet shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The display value carried no resource definition.
    #[error("display value carries no resource definition")]
    MissingResource,

    /// Writing to the output stream failed.
    #[error("failed to write resource reference: {0}")]
    Io(#[from] std::io::Error),
}
