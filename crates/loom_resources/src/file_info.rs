//! Classification of discovered resource files.

use std::path::{Path, PathBuf};

/// What a resource file contains, which decides how it is packaged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ResourceKind {
    /// A compiled `.resources` file, embedded as-is.
    Resource,
    /// Any other binary payload (images, fonts, ...), embedded as-is.
    Binary,
    /// An XML `.resx` file, compiled before embedding.
    ResX,
    /// Not a resource at all.
    NotResource,
}

impl ResourceKind {
    /// Classifies `path` by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("resx") => ResourceKind::ResX,
            Some(ext) if ext.eq_ignore_ascii_case("resources") => ResourceKind::Resource,
            Some(_) => ResourceKind::Binary,
            None => ResourceKind::NotResource,
        }
    }

    /// Returns `true` for kinds that carry named resource entries.
    pub fn is_keyed(self) -> bool {
        matches!(self, ResourceKind::Resource | ResourceKind::ResX)
    }
}

/// A resource file found in a resource directory.
///
/// `embeddable` and `compilable` are fixed by the kind at construction.
/// `seen` is bookkeeping for scanning passes that must not register a file
/// twice; it has no other meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFileInfo {
    path: PathBuf,
    kind: ResourceKind,
    embeddable: bool,
    compilable: bool,
    seen: bool,
}

impl ResourceFileInfo {
    /// Creates a file of the given kind.
    pub fn new(path: impl Into<PathBuf>, kind: ResourceKind) -> Self {
        Self {
            path: path.into(),
            kind,
            embeddable: matches!(kind, ResourceKind::Resource | ResourceKind::Binary),
            compilable: kind == ResourceKind::ResX,
            seen: false,
        }
    }

    /// Creates a file classified by its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = ResourceKind::from_path(&path);
        Self::new(path, kind)
    }

    /// Full path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// The file's kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether the file is embedded without compilation.
    pub fn embeddable(&self) -> bool {
        self.embeddable
    }

    /// Whether the file must be compiled before embedding.
    pub fn compilable(&self) -> bool {
        self.compilable
    }

    /// Whether a scanning pass has already processed the file.
    pub fn is_seen(&self) -> bool {
        self.seen
    }

    /// Marks the file as processed.
    pub fn mark_seen(&mut self) {
        self.seen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_kind() {
        let res = ResourceFileInfo::new("a.resources", ResourceKind::Resource);
        assert!(res.embeddable());
        assert!(!res.compilable());

        let resx = ResourceFileInfo::new("a.resx", ResourceKind::ResX);
        assert!(!resx.embeddable());
        assert!(resx.compilable());

        let bin = ResourceFileInfo::new("logo.png", ResourceKind::Binary);
        assert!(bin.embeddable());
        assert!(!bin.compilable());

        let other = ResourceFileInfo::new("README", ResourceKind::NotResource);
        assert!(!other.embeddable());
        assert!(!other.compilable());
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(ResourceKind::from_path(Path::new("S.fr.RESX")), ResourceKind::ResX);
        assert_eq!(ResourceKind::from_path(Path::new("S.resources")), ResourceKind::Resource);
        assert_eq!(ResourceKind::from_path(Path::new("logo.png")), ResourceKind::Binary);
        assert_eq!(ResourceKind::from_path(Path::new("LICENSE")), ResourceKind::NotResource);
    }

    #[test]
    fn seen_flag_is_plain_bookkeeping() {
        let mut file = ResourceFileInfo::from_path("dir/Strings.resx");
        assert!(!file.is_seen());
        file.mark_seen();
        assert!(file.is_seen());
        assert!(file.compilable());
        assert_eq!(file.file_name(), "Strings.resx");
        assert_eq!(file.stem(), "Strings");
    }
}
