//! The compile entry points: resolve imports, then hand off to the engine.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! `LessCompiler` ties the pieces together for the render pipeline. Its
//! theme style folders come from the deployment's enabled features, so an
//! extension's stylesheet can import from any enabled theme by bare name.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_runtime::{ExtensionRegistry, ShellDescriptor};

use crate::engine::{CompileOptions, LessEngine};
use crate::error::LessError;
use crate::resolve::ImportResolver;

/// Parameter-object form of a compile call.
///
/// Exactly one of `source` and `path` should be set; `source` wins when
/// both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileRequest {
    /// Raw LESS source text.
    pub source: Option<String>,
    /// Virtual path of a LESS file to read instead.
    pub path: Option<PathBuf>,
    /// Directory context for relative imports.
    pub base_path: PathBuf,
    /// Additional library directories for this call.
    pub lib_paths: Vec<PathBuf>,
}

impl CompileRequest {
    pub fn from_source(source: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: impl Into<PathBuf>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    pub fn with_lib_paths(mut self, lib_paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.lib_paths = lib_paths.into_iter().collect();
        self
    }
}

/// Compiles LESS sources for the render pipeline.
pub struct LessCompiler<E> {
    engine: E,
    options: CompileOptions,
    resolver: ImportResolver,
}

impl<E: LessEngine> LessCompiler<E> {
    /// Create a compiler with an explicit theme folder list.
    pub fn new(root: impl Into<PathBuf>, theme_folders: Vec<PathBuf>, engine: E) -> Self {
        Self {
            engine,
            options: CompileOptions::default(),
            resolver: ImportResolver::new(root, theme_folders),
        }
    }

    /// Create a compiler whose theme folders are the `Styles` directories of
    /// every feature enabled in the current deployment.
    pub fn from_registry(
        root: impl Into<PathBuf>,
        registry: &dyn ExtensionRegistry,
        shell: &ShellDescriptor,
        engine: E,
    ) -> Self {
        let theme_folders = registry
            .available_features()
            .into_iter()
            .filter(|f| shell.is_enabled(&f.feature.id))
            .map(|f| {
                Path::new(&f.extension.location)
                    .join(&f.extension.id)
                    .join("Styles")
            })
            .collect();
        Self::new(root, theme_folders, engine)
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// The theme style folders searched when resolving imports.
    pub fn theme_folders(&self) -> &[PathBuf] {
        self.resolver.theme_folders()
    }

    /// The engine this compiler hands flattened source to.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Resolve imports in `less`, then compile with the engine.
    pub fn compile_string(
        &mut self,
        less: &str,
        base_path: &Path,
        lib_paths: &[PathBuf],
    ) -> Result<String, LessError> {
        let flattened = self.resolver.resolve(less, base_path, lib_paths);
        let base = self.resolver.map_path(base_path);
        tracing::debug!(
            engine = self.engine.name(),
            base = %base.display(),
            "compiling LESS source"
        );
        self.engine.compile(&flattened, &base, &self.options)
    }

    /// Read the file at `path` (virtual or rooted) and compile it.
    pub fn compile_from(
        &mut self,
        path: &Path,
        base_path: &Path,
        lib_paths: &[PathBuf],
    ) -> Result<String, LessError> {
        let source = std::fs::read_to_string(self.resolver.map_path(path))?;
        self.compile_string(&source, base_path, lib_paths)
    }

    /// Parameter-object entry point.
    pub fn compile(&mut self, request: &CompileRequest) -> Result<String, LessError> {
        if let Some(source) = &request.source {
            self.compile_string(source, &request.base_path, &request.lib_paths)
        } else if let Some(path) = &request.path {
            self.compile_from(path, &request.base_path, &request.lib_paths)
        } else {
            Err(LessError::EmptyRequest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tessera_runtime::{ExtensionDescriptor, ExtensionKind, StaticRegistry};

    /// Records what reaches the engine instead of compiling anything.
    struct RecordingEngine {
        calls: Mutex<Vec<(String, PathBuf, bool)>>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl LessEngine for RecordingEngine {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn compile(
            &self,
            less: &str,
            base_path: &Path,
            options: &CompileOptions,
        ) -> Result<String, LessError> {
            self.calls.lock().unwrap().push((
                less.to_string(),
                base_path.to_path_buf(),
                options.minified,
            ));
            Ok(format!("/* css */ {}", less))
        }
    }

    #[test]
    fn test_engine_receives_flattened_source_and_absolute_base() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("Styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(styles.join("colors.less"), "@red: #f00;").unwrap();

        let mut compiler = LessCompiler::new(dir.path(), Vec::new(), RecordingEngine::new());
        let css = compiler
            .compile_string("@import \"colors.less\";\n.a { color: @red; }", Path::new("Styles"), &[])
            .unwrap();
        assert!(css.starts_with("/* css */"));

        let calls = compiler.engine.calls.lock().unwrap();
        let (less, base, minified) = &calls[0];
        assert_eq!(less, "@red: #f00;\n.a { color: @red; }");
        assert_eq!(base, &styles);
        assert!(*minified, "default options compile minified");
    }

    #[test]
    fn test_options_flow_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = LessCompiler::new(dir.path(), Vec::new(), RecordingEngine::new())
            .with_options(CompileOptions { minified: false });
        compiler
            .compile_string(".a {}", Path::new("Styles"), &[])
            .unwrap();

        let calls = compiler.engine.calls.lock().unwrap();
        assert!(!calls[0].2);
    }

    #[test]
    fn test_compile_from_reads_mapped_path() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("Styles");
        std::fs::create_dir_all(&styles).unwrap();
        std::fs::write(styles.join("site.less"), ".site { margin: 0; }").unwrap();

        let mut compiler = LessCompiler::new(dir.path(), Vec::new(), RecordingEngine::new());
        compiler
            .compile_from(Path::new("Styles/site.less"), Path::new("Styles"), &[])
            .unwrap();

        let calls = compiler.engine.calls.lock().unwrap();
        assert_eq!(calls[0].0, ".site { margin: 0; }");
    }

    #[test]
    fn test_compile_request_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut compiler = LessCompiler::new(dir.path(), Vec::new(), RecordingEngine::new());

        let request = CompileRequest::from_source(".a {}", "Styles");
        assert!(compiler.compile(&request).is_ok());

        let empty = CompileRequest::default();
        assert!(matches!(
            compiler.compile(&empty),
            Err(LessError::EmptyRequest)
        ));
    }

    #[test]
    fn test_theme_folders_from_enabled_features() {
        let registry = StaticRegistry::new(vec![
            ExtensionDescriptor::new("Bramble", "Themes", ExtensionKind::Theme),
            ExtensionDescriptor::new("Gallery", "Modules", ExtensionKind::Module),
            ExtensionDescriptor::new("Forum", "Modules", ExtensionKind::Module),
        ]);
        let shell = ShellDescriptor::new(["Bramble", "Gallery"]);

        let compiler =
            LessCompiler::from_registry("/srv/site", &registry, &shell, RecordingEngine::new());
        assert_eq!(
            compiler.theme_folders(),
            &[
                PathBuf::from("Themes/Bramble/Styles"),
                PathBuf::from("Modules/Gallery/Styles"),
            ]
        );
    }
}
