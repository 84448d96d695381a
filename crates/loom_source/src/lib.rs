//! Artifact identities, source storage, and location tracking for scanned artifacts.
//!
//! This crate provides the [`SourceDb`] holding artifact text, [`ArtifactIdentity`]
//! for addressing artifacts, and the immutable [`Location`] and [`TextBlock`]
//! values produced while scanning.

#![warn(missing_docs)]

pub mod file_id;
pub mod identity;
pub mod location;
pub mod source_db;
pub mod source_file;
pub mod text_block;

pub use file_id::FileId;
pub use identity::{ArtifactIdentity, Backing};
pub use location::Location;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use text_block::{BlockKind, TextBlock};
