//! Stylesheet shape discovery and binding for Tessera.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Shape-name derivation from stylesheet file names
//! - The shape table builder and stylesheet bindings
//! - `StylesheetBindingStrategy`: discovery over active extensions' `Styles`
//!   folders

mod binder;
mod error;
mod naming;

pub use binder::{
    ALWAYS_ON_THEMES, ShapeAlteration, ShapeBinding, ShapeRenderer, ShapeTable, ShapeTableBuilder,
    StylesheetBindingStrategy,
};
pub use error::ShapeError;
pub use naming::shape_name_from_file_name;
