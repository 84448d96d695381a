//! The value stored in the build result cache.

use crate::compiler::CompiledAssembly;
use crate::provider::BuildProvider;
use loom_source::ArtifactIdentity;
use std::fmt;
use std::sync::Arc;

/// A finished build result, handed to the result cache.
///
/// Immutable once built. The [`Display`](fmt::Display) rendering is for logs
/// only and plays no part in equality.
#[derive(Debug, Clone)]
pub struct BuildManagerCacheItem {
    compiled: Option<Arc<CompiledAssembly>>,
    generated_type: Option<String>,
    custom_string: String,
    identity: ArtifactIdentity,
}

impl BuildManagerCacheItem {
    /// Wraps `provider`'s share of `compiled`.
    pub fn new(compiled: &Arc<CompiledAssembly>, provider: &BuildProvider) -> Self {
        Self {
            compiled: Some(Arc::clone(compiled)),
            generated_type: provider.generated_type(compiled),
            custom_string: provider.custom_string(compiled),
            identity: provider.identity().clone(),
        }
    }

    /// An item for an artifact that was acknowledged but produced no code.
    pub fn without_code(identity: ArtifactIdentity) -> Self {
        Self {
            compiled: None,
            generated_type: None,
            custom_string: String::new(),
            identity,
        }
    }

    /// The compiled assembly, absent for artifacts without code.
    pub fn compiled(&self) -> Option<&Arc<CompiledAssembly>> {
        self.compiled.as_ref()
    }

    /// The type generated for the artifact, if any.
    pub fn generated_type(&self) -> Option<&str> {
        self.generated_type.as_deref()
    }

    /// The revalidation string; empty when the provider has none.
    pub fn custom_string(&self) -> &str {
        &self.custom_string
    }

    /// The artifact this result belongs to.
    pub fn identity(&self) -> &ArtifactIdentity {
        &self.identity
    }
}

impl fmt::Display for BuildManagerCacheItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::with_capacity(3);
        if !self.custom_string.is_empty() {
            fields.push(format!("customString: {}", self.custom_string));
        }
        if let Some(compiled) = &self.compiled {
            fields.push(format!("assembly: {compiled}"));
        }
        if !self.identity.path().is_empty() {
            fields.push(format!("artifact: {}", self.identity));
        }
        write!(f, "BuildCacheItem [{}]", fields.join("; "))
    }
}
