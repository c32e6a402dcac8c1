//! Extension, feature, and shell descriptors.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! These types mirror the host framework's deployment metadata. They are
//! read-only to the styling subsystem: the host discovers and enables
//! extensions; this crate only describes them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Kind of deployable extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionKind {
    /// A theme: presentation-only, switchable per site.
    Theme,
    /// A module: functional extension.
    Module,
}

/// A single independently enableable feature of an extension.
///
/// Every extension carries at least one feature whose id equals the
/// extension id (its "main" feature).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    pub id: String,
}

impl FeatureDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A deployable unit (theme or module) known to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// Unique extension identifier, also its directory name.
    pub id: String,
    /// Virtual path of the directory containing the extension
    /// (e.g. `Themes` or `Modules`).
    pub location: String,
    pub kind: ExtensionKind,
    #[serde(default)]
    pub features: Vec<FeatureDescriptor>,
}

impl ExtensionDescriptor {
    /// Create a descriptor with the conventional main feature (same id).
    pub fn new(id: impl Into<String>, location: impl Into<String>, kind: ExtensionKind) -> Self {
        let id = id.into();
        let features = vec![FeatureDescriptor::new(id.clone())];
        Self {
            id,
            location: location.into(),
            kind,
            features,
        }
    }
}

/// The set of feature names enabled for the current deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellDescriptor {
    features: BTreeSet<String>,
}

impl ShellDescriptor {
    pub fn new(features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            features: features.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the named feature is enabled for this deployment.
    pub fn is_enabled(&self, feature_id: &str) -> bool {
        self.features.contains(feature_id)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }
}

/// A feature together with the extension that owns it.
#[derive(Debug, Clone, Copy)]
pub struct FeatureRef<'a> {
    pub feature: &'a FeatureDescriptor,
    pub extension: &'a ExtensionDescriptor,
}

/// Host contract: enumeration of installed extensions and their features.
///
/// Implementations provide the full installed set; callers apply their own
/// enablement filtering against a [`ShellDescriptor`].
pub trait ExtensionRegistry: Send + Sync {
    /// All installed extensions, enabled or not.
    fn extensions(&self) -> &[ExtensionDescriptor];

    /// Every feature of every installed extension, paired with its owner.
    fn available_features(&self) -> Vec<FeatureRef<'_>> {
        self.extensions()
            .iter()
            .flat_map(|extension| {
                extension
                    .features
                    .iter()
                    .map(move |feature| FeatureRef { feature, extension })
            })
            .collect()
    }
}

/// In-memory registry backed by a plain descriptor list.
///
/// Suitable for hosts that load extension manifests from configuration,
/// and for tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticRegistry {
    extensions: Vec<ExtensionDescriptor>,
}

impl StaticRegistry {
    pub fn new(extensions: Vec<ExtensionDescriptor>) -> Self {
        Self { extensions }
    }
}

impl ExtensionRegistry for StaticRegistry {
    fn extensions(&self) -> &[ExtensionDescriptor] {
        &self.extensions
    }
}
