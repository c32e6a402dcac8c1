//! Host-framework contracts for the Tessera styling subsystem.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate defines the seams between the styling subsystem and its host:
//! - Extension/feature/shell descriptors (read-only host metadata)
//! - The `VirtualPathProvider` trait and a native `SiteHost` implementation
//! - Resource-definition types and the `<link>` tag writer used at render time

mod descriptors;
mod resource;
mod vfs;

pub use descriptors::{
    ExtensionDescriptor, ExtensionKind, ExtensionRegistry, FeatureDescriptor, FeatureRef,
    ShellDescriptor, StaticRegistry,
};
pub use resource::{ResourceDefinition, StyleResource, write_resource};
pub use vfs::{SiteHost, VirtualPathProvider};
