//! Shared foundational types used across the loom build pipeline.
//!
//! This crate provides content fingerprints used for cheap revalidation of
//! build results, the language-neutral code-unit model that providers emit
//! and backends consume, and the internal-error result type.

#![warn(missing_docs)]

pub mod code_model;
pub mod hash;
pub mod result;

pub use code_model::{
    is_valid_identifier, qualified_name, CodeCompileUnit, CodeNamespace, MemberKind,
    TypeDeclaration, TypeMember,
};
pub use hash::{ContentHash, Fingerprinter};
pub use result::{InternalError, LoomResult};
