//! Logical addresses of source artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an artifact's content comes from.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Backing {
    /// The artifact lives in durable storage at its path.
    Durable,
    /// The artifact is synthetic or in-memory. `hint` replaces the storage
    /// location when something needs to find the artifact again.
    Synthetic {
        /// Alternate resolution hint.
        hint: String,
    },
}

/// The logical address of a source artifact.
///
/// Identities are stable for the artifact's lifetime within one build and
/// are used as the key of the result cache.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ArtifactIdentity {
    path: String,
    backing: Backing,
}

impl ArtifactIdentity {
    /// Creates an identity for an artifact backed by durable storage.
    pub fn durable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            backing: Backing::Durable,
        }
    }

    /// Creates an identity for an in-memory artifact.
    pub fn synthetic(path: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            backing: Backing::Synthetic { hint: hint.into() },
        }
    }

    /// The path-like name of the artifact.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` for in-memory artifacts.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.backing, Backing::Synthetic { .. })
    }

    /// The resolution hint of a synthetic artifact.
    pub fn hint(&self) -> Option<&str> {
        match &self.backing {
            Backing::Synthetic { hint } => Some(hint),
            Backing::Durable => None,
        }
    }

    /// The file extension of the path including the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path);
        name.rfind('.').map(|idx| &name[idx..])
    }
}

impl fmt::Display for ArtifactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durable_has_no_hint() {
        let id = ArtifactIdentity::durable("~/Default.aspx");
        assert!(!id.is_synthetic());
        assert_eq!(id.hint(), None);
        assert_eq!(id.to_string(), "~/Default.aspx");
    }

    #[test]
    fn synthetic_carries_hint() {
        let id = ArtifactIdentity::synthetic("@@inner_string@@", "inline");
        assert!(id.is_synthetic());
        assert_eq!(id.hint(), Some("inline"));
    }

    #[test]
    fn extension_ignores_directory_dots() {
        assert_eq!(
            ArtifactIdentity::durable("site.v2/Default.aspx").extension(),
            Some(".aspx")
        );
        assert_eq!(ArtifactIdentity::durable("site.v2/README").extension(), None);
        assert_eq!(
            ArtifactIdentity::durable("App_Code\\Strings.fr.resx").extension(),
            Some(".resx")
        );
    }

    #[test]
    fn serde_roundtrip() {
        let id = ArtifactIdentity::synthetic("a.aspx", "memory");
        let json = serde_json::to_string(&id).unwrap();
        let back: ArtifactIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
