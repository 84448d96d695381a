//! In-memory caches shared by builds.
//!
//! Two caches live here:
//!
//! - [`AssemblyPathResolver`]: external assembly names to local paths,
//!   resolved once through an injected [`AssemblyLoader`] and kept for the
//!   resolver's lifetime.
//! - [`ResultCache`]: build results keyed by [`ArtifactIdentity`](loom_source::ArtifactIdentity).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolver;
pub mod result_cache;

pub use error::{LoadError, ResolveError};
pub use loader::{local_path_from_origin, AssemblyLoader, LoadedAssembly, ProbingLoader};
pub use resolver::AssemblyPathResolver;
pub use result_cache::ResultCache;
