//! The build pipeline: artifacts in, cached build results out.
//!
//! Each artifact is handled by a [`BuildProvider`] chosen by extension. Loaded
//! providers are batched into [`BuildProviderGroup`]s sharing a compiler
//! backend; every group's code units are merged ([`merge_partial_types`]) and
//! compiled in one request, and each member's result is wrapped in a
//! [`BuildManagerCacheItem`]. [`BuildManager`] drives the whole flow.

#![warn(missing_docs)]

pub mod cache_item;
pub mod compiler;
pub mod error;
pub mod group;
pub mod handler;
pub mod manager;
pub mod partial_type;
pub mod provider;
pub mod schema;
pub mod template;

pub use cache_item::BuildManagerCacheItem;
pub use compiler::{
    BackendFailure, CompileRequest, CompiledAssembly, CompilerBackend, CompilerRegistry,
    RecordingBackend, RegisteredCompiler,
};
pub use error::BuildError;
pub use group::{BuildProviderGroup, GroupCategory};
pub use manager::BuildManager;
pub use partial_type::{merge_partial_types, CompileUnitPartialType};
pub use provider::BuildProvider;
