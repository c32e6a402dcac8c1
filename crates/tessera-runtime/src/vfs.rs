//! Virtual path mapping and file listing.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The host frameworks this subsystem targets address extension content by
//! virtual path (a site-relative path like `Themes/Bramble/Styles`). The
//! `VirtualPathProvider` trait is the seam: the native `SiteHost` maps
//! virtual paths onto a physical site root, while hosts with their own
//! storage (or tests) supply alternative implementations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Host contract for virtual-path access.
pub trait VirtualPathProvider: Send + Sync {
    /// Map a virtual path onto the physical filesystem.
    ///
    /// Rooted paths are returned unchanged; site-relative paths are resolved
    /// against the provider's root.
    fn map_path(&self, virtual_path: &Path) -> PathBuf;

    /// List the plain files directly under a virtual directory, as virtual
    /// paths. A missing or unreadable directory yields an empty list.
    fn list_files(&self, virtual_path: &Path) -> Vec<PathBuf>;

    /// Read a whole file addressed by virtual path.
    fn read_to_string(&self, virtual_path: &Path) -> io::Result<String> {
        fs::read_to_string(self.map_path(virtual_path))
    }
}

/// Native provider rooted at a physical site directory.
#[derive(Debug, Clone)]
pub struct SiteHost {
    root: PathBuf,
}

impl SiteHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl VirtualPathProvider for SiteHost {
    fn map_path(&self, virtual_path: &Path) -> PathBuf {
        if virtual_path.is_absolute() {
            virtual_path.to_path_buf()
        } else {
            self.root.join(virtual_path)
        }
    }

    fn list_files(&self, virtual_path: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.map_path(virtual_path)) else {
            return Vec::new();
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| virtual_path.join(entry.file_name()))
            .collect();
        // read_dir order is platform-dependent
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_path_joins_relative() {
        let host = SiteHost::new("/srv/site");
        assert_eq!(
            host.map_path(Path::new("Themes/Bramble")),
            PathBuf::from("/srv/site/Themes/Bramble")
        );
    }

    #[test]
    fn test_map_path_keeps_rooted() {
        let host = SiteHost::new("/srv/site");
        assert_eq!(
            host.map_path(Path::new("/etc/styles")),
            PathBuf::from("/etc/styles")
        );
    }

    #[test]
    fn test_list_files_returns_sorted_virtual_paths() {
        let dir = tempfile::tempdir().unwrap();
        let styles = dir.path().join("Themes/Bramble/Styles");
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("site.css"), "body {}").unwrap();
        fs::write(styles.join("admin.less"), "@import \"x.less\";").unwrap();
        fs::create_dir(styles.join("nested")).unwrap();

        let host = SiteHost::new(dir.path());
        let files = host.list_files(Path::new("Themes/Bramble/Styles"));

        assert_eq!(
            files,
            vec![
                PathBuf::from("Themes/Bramble/Styles/admin.less"),
                PathBuf::from("Themes/Bramble/Styles/site.css"),
            ]
        );
    }

    #[test]
    fn test_list_files_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let host = SiteHost::new(dir.path());
        assert!(host.list_files(Path::new("Themes/Nope/Styles")).is_empty());
    }

    #[test]
    fn test_read_to_string_via_virtual_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.less"), ".a { color: red; }").unwrap();

        let host = SiteHost::new(dir.path());
        let text = host.read_to_string(Path::new("a.less")).unwrap();
        assert_eq!(text, ".a { color: red; }");
    }
}
