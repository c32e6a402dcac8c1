//! Stylesheet shape discovery and the shape table.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Discovery walks every active extension's `Styles` folder, derives a
//! shape type per `.css`/`.less` file, and registers a binding whose
//! renderer writes a `<link>` reference for that file. The host invokes
//! the binding with the ambient [`StyleResource`] at display time.

use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tessera_runtime::{
    ExtensionDescriptor, ExtensionKind, ExtensionRegistry, FeatureRef, ShellDescriptor,
    StyleResource, VirtualPathProvider, write_resource,
};

use crate::error::ShapeError;
use crate::naming::shape_name_from_file_name;

/// Administrative themes that are active regardless of the shell's
/// enabled-feature list, so the admin and recovery surfaces always style.
pub const ALWAYS_ON_THEMES: [&str; 2] = ["TheAdmin", "SafeMode"];

/// Render callback bound to a stylesheet shape.
pub type ShapeRenderer =
    Box<dyn Fn(&StyleResource, &mut dyn Write) -> Result<(), ShapeError> + Send + Sync>;

/// A shape type bound to a stylesheet file and its render callback.
pub struct ShapeBinding {
    shape_type: String,
    virtual_path: PathBuf,
    feature_id: String,
    renderer: ShapeRenderer,
}

impl ShapeBinding {
    pub fn shape_type(&self) -> &str {
        &self.shape_type
    }

    pub fn virtual_path(&self) -> &Path {
        &self.virtual_path
    }

    /// The feature this binding is keyed to.
    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    /// Invoke the bound renderer against the ambient display value.
    pub fn render(&self, display: &StyleResource, out: &mut dyn Write) -> Result<(), ShapeError> {
        (self.renderer)(display, out)
    }
}

impl fmt::Debug for ShapeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeBinding")
            .field("shape_type", &self.shape_type)
            .field("virtual_path", &self.virtual_path)
            .field("feature_id", &self.feature_id)
            .finish_non_exhaustive()
    }
}

/// Accumulates shape bindings during discovery.
#[derive(Debug, Default)]
pub struct ShapeTableBuilder {
    bindings: Vec<ShapeBinding>,
}

impl ShapeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start describing a binding for the given shape type.
    pub fn describe(&mut self, shape_type: impl Into<String>) -> ShapeAlteration<'_> {
        ShapeAlteration {
            builder: self,
            shape_type: shape_type.into(),
            feature_id: String::new(),
        }
    }

    pub fn build(self) -> ShapeTable {
        ShapeTable {
            bindings: self.bindings,
        }
    }
}

/// In-progress binding description.
pub struct ShapeAlteration<'a> {
    builder: &'a mut ShapeTableBuilder,
    shape_type: String,
    feature_id: String,
}

impl ShapeAlteration<'_> {
    /// Key the binding to the feature that owns it.
    pub fn from_feature(mut self, feature_id: impl Into<String>) -> Self {
        self.feature_id = feature_id.into();
        self
    }

    /// Finish the description with the file's virtual path and a renderer.
    pub fn bound_as(self, virtual_path: impl Into<PathBuf>, renderer: ShapeRenderer) {
        self.builder.bindings.push(ShapeBinding {
            shape_type: self.shape_type,
            virtual_path: virtual_path.into(),
            feature_id: self.feature_id,
            renderer,
        });
    }
}

/// The finished shape table.
#[derive(Debug, Default)]
pub struct ShapeTable {
    bindings: Vec<ShapeBinding>,
}

impl ShapeTable {
    pub fn bindings(&self) -> &[ShapeBinding] {
        &self.bindings
    }

    /// First binding registered for a shape type, if any.
    pub fn get(&self, shape_type: &str) -> Option<&ShapeBinding> {
        self.bindings.iter().find(|b| b.shape_type == shape_type)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Translates filesystem-discoverable style files into shape bindings.
pub struct StylesheetBindingStrategy<'a> {
    registry: &'a dyn ExtensionRegistry,
    shell: &'a ShellDescriptor,
    files: &'a dyn VirtualPathProvider,
}

impl<'a> StylesheetBindingStrategy<'a> {
    pub fn new(
        registry: &'a dyn ExtensionRegistry,
        shell: &'a ShellDescriptor,
        files: &'a dyn VirtualPathProvider,
    ) -> Self {
        Self {
            registry,
            shell,
            files,
        }
    }

    /// Register a binding for every `.css`/`.less` file under each active
    /// extension's `Styles` folder.
    pub fn discover(&self, builder: &mut ShapeTableBuilder) {
        let mut bound = 0usize;
        for extension in self.active_extensions() {
            let styles_path = Path::new(&extension.location)
                .join(&extension.id)
                .join("Styles");
            for file in self.files.list_files(&styles_path) {
                if !is_stylesheet(&file) {
                    continue;
                }
                let Some(file_name) = file.file_name() else {
                    continue;
                };
                let shape_type = format!(
                    "Style__{}",
                    shape_name_from_file_name(&file_name.to_string_lossy())
                );
                // Keyed to the extension's main feature.
                for feature in extension.features.iter().filter(|fd| fd.id == extension.id) {
                    builder
                        .describe(shape_type.clone())
                        .from_feature(feature.id.clone())
                        .bound_as(file.clone(), style_renderer(file.clone()));
                    bound += 1;
                }
            }
        }
        tracing::debug!(bindings = bound, "stylesheet shape discovery complete");
    }

    /// A feature is active when it is an always-on administrative theme or
    /// the shell descriptor names it.
    fn feature_is_enabled(&self, candidate: &FeatureRef<'_>) -> bool {
        (candidate.extension.kind == ExtensionKind::Theme
            && ALWAYS_ON_THEMES.contains(&candidate.feature.id.as_str()))
            || self.shell.is_enabled(&candidate.feature.id)
    }

    /// Extensions owning at least one active feature, first-seen-deduplicated.
    fn active_extensions(&self) -> Vec<&'a ExtensionDescriptor> {
        let mut once = HashSet::new();
        self.registry
            .available_features()
            .into_iter()
            .filter(|candidate| self.feature_is_enabled(candidate))
            .map(|candidate| candidate.extension)
            .filter(|extension| once.insert(extension.id.clone()))
            .collect()
    }
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("css") || ext.eq_ignore_ascii_case("less"))
        .unwrap_or(false)
}

/// Renderer writing a `<link>` reference for the bound file.
fn style_renderer(virtual_path: PathBuf) -> ShapeRenderer {
    Box::new(move |display, out| {
        let resource = display
            .resource
            .as_ref()
            .ok_or(ShapeError::MissingResource)?;
        let href = format!("/{}", virtual_path.to_string_lossy().replace('\\', "/"));
        write_resource(
            out,
            resource,
            &href,
            display.condition.as_deref(),
            &display.attributes,
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_runtime::ResourceDefinition;

    fn noop_renderer() -> ShapeRenderer {
        Box::new(|_, _| Ok(()))
    }

    #[test]
    fn test_builder_collects_bindings() {
        let mut builder = ShapeTableBuilder::new();
        builder
            .describe("Style__site")
            .from_feature("Bramble")
            .bound_as("Themes/Bramble/Styles/site.css", noop_renderer());
        builder
            .describe("Style__admin")
            .from_feature("TheAdmin")
            .bound_as("Themes/TheAdmin/Styles/admin.less", noop_renderer());

        let table = builder.build();
        assert_eq!(table.len(), 2);
        let binding = table.get("Style__site").unwrap();
        assert_eq!(binding.feature_id(), "Bramble");
        assert_eq!(
            binding.virtual_path(),
            Path::new("Themes/Bramble/Styles/site.css")
        );
        assert!(table.get("Style__missing").is_none());
    }

    #[test]
    fn test_style_renderer_writes_link() {
        let renderer = style_renderer(PathBuf::from("Themes/Bramble/Styles/site.css"));
        let display =
            StyleResource::new(ResourceDefinition::new("site", "")).with_attribute("media", "all");

        let mut out = Vec::new();
        renderer(&display, &mut out).unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("href=\"/Themes/Bramble/Styles/site.css\""));
        assert!(html.contains("media=\"all\""));
    }

    #[test]
    fn test_style_renderer_requires_resource() {
        let renderer = style_renderer(PathBuf::from("Themes/Bramble/Styles/site.css"));
        let display = StyleResource::default();

        let mut out = Vec::new();
        let err = renderer(&display, &mut out).unwrap_err();
        assert!(matches!(err, ShapeError::MissingResource));
        assert!(out.is_empty());
    }

    #[test]
    fn test_is_stylesheet_case_insensitive() {
        assert!(is_stylesheet(Path::new("a/Site.CSS")));
        assert!(is_stylesheet(Path::new("a/site.Less")));
        assert!(!is_stylesheet(Path::new("a/site.scss")));
        assert!(!is_stylesheet(Path::new("a/readme")));
    }
}
