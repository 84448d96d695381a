//! Strategies for locating an external assembly by name.

use crate::error::LoadError;
use std::path::{Path, PathBuf};

/// An assembly located by an [`AssemblyLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAssembly {
    /// The assembly's simple name.
    pub name: String,
    /// Where the assembly was loaded from, usually a `file://` URI.
    pub origin: String,
}

impl LoadedAssembly {
    /// The local file path derived from [`origin`](Self::origin).
    pub fn local_path(&self) -> PathBuf {
        local_path_from_origin(&self.origin)
    }
}

/// Loads assemblies for the [`AssemblyPathResolver`](crate::AssemblyPathResolver).
///
/// Implementations must be shareable across threads: one resolver serves all
/// concurrent builds.
pub trait AssemblyLoader: Send + Sync {
    /// Loads by full display name (`Name, Version=..., Culture=...`). Only
    /// tried for names that contain a comma.
    fn load_strict(&self, full_name: &str) -> Result<LoadedAssembly, LoadError>;

    /// Best-effort load by simple or partial name.
    fn load_partial(&self, name: &str) -> Result<LoadedAssembly, LoadError>;
}

/// Converts a loaded module's origin into a local path.
///
/// `file://` URIs lose their scheme and have `%XX` escapes decoded; anything
/// else is taken as a path already.
pub fn local_path_from_origin(origin: &str) -> PathBuf {
    let Some(rest) = origin.strip_prefix("file://") else {
        return PathBuf::from(origin);
    };
    // file:///C:/dir -> C:/dir
    let rest = match rest.as_bytes() {
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &rest[1..],
        _ => rest,
    };
    PathBuf::from(percent_decode(rest))
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a display name into its simple name and `key=value` properties.
fn parse_display_name(full_name: &str) -> (&str, Vec<(&str, &str)>) {
    let mut parts = full_name.split(',');
    let simple = parts.next().unwrap_or_default().trim();
    let props = parts
        .filter_map(|p| p.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect();
    (simple, props)
}

/// Probes a list of directories for `<Name>.dll`.
///
/// Strict loads require the versioned layout `<dir>/<Name>/<Version>/<Name>.dll`
/// when the display name carries a version; partial loads take the first
/// `<dir>/<Name>.dll` in probe order.
#[derive(Debug, Clone, Default)]
pub struct ProbingLoader {
    probe_paths: Vec<PathBuf>,
}

impl ProbingLoader {
    /// Creates a loader over `probe_paths`, searched in order.
    pub fn new(probe_paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            probe_paths: probe_paths.into_iter().map(Into::into).collect(),
        }
    }

    fn found(name: &str, path: &Path) -> LoadedAssembly {
        LoadedAssembly {
            name: name.to_string(),
            origin: format!("file://{}", path.display()),
        }
    }
}

impl AssemblyLoader for ProbingLoader {
    fn load_strict(&self, full_name: &str) -> Result<LoadedAssembly, LoadError> {
        let (simple, props) = parse_display_name(full_name);
        if simple.is_empty() {
            return Err(LoadError::new("empty assembly name"));
        }
        let file_name = format!("{simple}.dll");
        let version = props
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("version"))
            .map(|(_, v)| *v);
        for dir in &self.probe_paths {
            let candidate = match version {
                Some(version) => dir.join(simple).join(version).join(&file_name),
                None => dir.join(&file_name),
            };
            if candidate.is_file() {
                return Ok(Self::found(simple, &candidate));
            }
        }
        Err(LoadError::new(match version {
            Some(version) => format!("no {file_name} with version {version} in probe paths"),
            None => format!("no {file_name} in probe paths"),
        }))
    }

    fn load_partial(&self, name: &str) -> Result<LoadedAssembly, LoadError> {
        let (simple, _) = parse_display_name(name);
        if simple.is_empty() {
            return Err(LoadError::new("empty assembly name"));
        }
        let file_name = format!("{simple}.dll");
        self.probe_paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .map(|candidate| Self::found(simple, &candidate))
            .ok_or_else(|| LoadError::new(format!("no {file_name} in probe paths")))
    }
}
