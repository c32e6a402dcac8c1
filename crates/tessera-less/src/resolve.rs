//! Recursive `@import` expansion over a library path set.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Before source reaches the LESS engine, every `@import "x.less";`
//! statement is textually replaced with the referenced file's contents,
//! itself expanded the same way. Lookup order for a relative name:
//! the current base directory, then every directory in the library path
//! set. A name found in several library directories is inlined once per
//! match, concatenated in path order. A name found nowhere is left as the
//! literal `@import` statement so the engine reports the failure.
//!
//! The library path set is computed once per top-level [`ImportResolver::resolve`]
//! call and held fixed for the whole recursive expansion. A later call
//! reuses the previously computed set unless it supplies extra library
//! paths; see `resolve` for the exact rule.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Matches `@import "<name>.less";` and captures the name.
///
/// Only this exact form is expanded: double quotes, a `.less` suffix, and a
/// trailing semicolon. LESS's other import syntaxes (unquoted, `(reference)`,
/// `.css`, media-qualified) pass through to the engine untouched.
static IMPORT_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@import\s*"(?P<file>[^"]*\.less)";"#).unwrap());

/// Expands nested stylesheet imports into a single flattened source string.
///
/// The resolver owns the site root (for absolutizing site-relative paths),
/// the configured theme style folders, and the memoized library path set.
/// Create one resolver per compilation context; a fresh resolver always
/// computes a fresh path set.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    root: PathBuf,
    theme_folders: Vec<PathBuf>,
    lib_paths: Option<Vec<PathBuf>>,
}

impl ImportResolver {
    pub fn new(root: impl Into<PathBuf>, theme_folders: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            theme_folders,
            lib_paths: None,
        }
    }

    /// The configured theme style folders searched on every resolution.
    pub fn theme_folders(&self) -> &[PathBuf] {
        &self.theme_folders
    }

    /// The library path set in effect, if one has been computed.
    pub fn lib_paths(&self) -> Option<&[PathBuf]> {
        self.lib_paths.as_deref()
    }

    /// Absolutize a site-relative path against the site root. Rooted paths
    /// are returned unchanged.
    pub fn map_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Replace every `@import "x.less";` in `source` with the recursively
    /// expanded contents of `x.less`.
    ///
    /// The library path set is rebuilt — as the ordered, deduplicated union
    /// of theme folders, `extra_lib_paths`, and `base_path` — only when no
    /// set has been computed yet or `extra_lib_paths` is non-empty.
    /// Otherwise the previously computed set is reused, even when
    /// `base_path` differs from the call that built it. Callers that need a
    /// fresh set per compilation use a fresh resolver.
    pub fn resolve(&mut self, source: &str, base_path: &Path, extra_lib_paths: &[PathBuf]) -> String {
        if self.lib_paths.is_none() || !extra_lib_paths.is_empty() {
            let mut paths: Vec<PathBuf> = Vec::new();
            for folder in &self.theme_folders {
                push_unique(&mut paths, folder);
            }
            for extra in extra_lib_paths {
                push_unique(&mut paths, extra);
            }
            push_unique(&mut paths, base_path);
            self.lib_paths = Some(paths);
        }

        self.expand(source, base_path)
    }

    fn expand(&self, source: &str, base_path: &Path) -> String {
        IMPORT_STATEMENT
            .replace_all(source, |caps: &Captures<'_>| {
                self.find_import(&caps["file"], base_path)
            })
            .into_owned()
    }

    /// Locate `file_name` and return its recursively expanded contents, or
    /// the literal `@import` statement when it cannot be found anywhere.
    fn find_import(&self, file_name: &str, base_path: &Path) -> String {
        let base = self.map_path(base_path);
        let named = Path::new(file_name);

        // Rooted import names resolve directly.
        if named.is_absolute() && named.is_file() {
            if let Ok(contents) = fs::read_to_string(named) {
                let parent = named.parent().unwrap_or(Path::new(""));
                return self.expand(&contents, parent);
            }
        }

        // Relative to the current base directory.
        let combined = base.join(named);
        if combined.is_file() {
            if let Ok(contents) = fs::read_to_string(&combined) {
                let parent = combined.parent().unwrap_or(Path::new(""));
                return self.expand(&contents, parent);
            }
        }

        // Every library directory that carries the file contributes a copy,
        // concatenated in path order.
        let lib_paths = self.lib_paths.as_deref().unwrap_or_default();
        let hits: Vec<PathBuf> = lib_paths
            .iter()
            .map(|dir| self.map_path(dir))
            .filter(|dir| dir.join(named).is_file())
            .collect();

        if !hits.is_empty() {
            let mut merged = String::new();
            for dir in &hits {
                if let Ok(contents) = fs::read_to_string(dir.join(named)) {
                    merged.push_str(&self.expand(&contents, dir));
                }
            }
            return merged;
        }

        // Defer to the engine for a definitive failure.
        tracing::debug!(file = file_name, base = %base.display(), "import not found");
        format!("@import \"{}\";", file_name)
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, candidate: &Path) {
    if !paths.iter().any(|p| p == candidate) {
        paths.push(candidate.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_pattern_matches_quoted_less_only() {
        assert!(IMPORT_STATEMENT.is_match("@import \"mixins.less\";"));
        assert!(IMPORT_STATEMENT.is_match("@import\"mixins.less\";"));
        // Everything else passes through to the engine.
        assert!(!IMPORT_STATEMENT.is_match("@import \"reset.css\";"));
        assert!(!IMPORT_STATEMENT.is_match("@import mixins.less;"));
        assert!(!IMPORT_STATEMENT.is_match("@import \"mixins.less\""));
        assert!(!IMPORT_STATEMENT.is_match("@import (reference) \"mixins.less\";"));
    }

    #[test]
    fn test_source_without_imports_is_unchanged() {
        let mut resolver = ImportResolver::new("/srv/site", Vec::new());
        let source = ".a { color: red; }";
        assert_eq!(resolver.resolve(source, Path::new("Styles"), &[]), source);
    }

    #[test]
    fn test_lib_paths_dedup_and_order() {
        let mut resolver = ImportResolver::new(
            "/srv/site",
            vec![PathBuf::from("Themes/A/Styles"), PathBuf::from("Themes/B/Styles")],
        );
        resolver.resolve(
            "",
            Path::new("Modules/M/Styles"),
            &[PathBuf::from("Themes/A/Styles"), PathBuf::from("Extra")],
        );

        assert_eq!(
            resolver.lib_paths().unwrap(),
            &[
                PathBuf::from("Themes/A/Styles"),
                PathBuf::from("Themes/B/Styles"),
                PathBuf::from("Extra"),
                PathBuf::from("Modules/M/Styles"),
            ]
        );
    }

    #[test]
    fn test_map_path() {
        let resolver = ImportResolver::new("/srv/site", Vec::new());
        assert_eq!(
            resolver.map_path(Path::new("Themes/A/Styles")),
            PathBuf::from("/srv/site/Themes/A/Styles")
        );
        assert_eq!(resolver.map_path(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
