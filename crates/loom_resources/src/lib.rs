//! Application resource files: classification, ordering, grouping, and
//! strongly typed accessor generation.
//!
//! Resource files are classified by extension into a [`ResourceKind`], which
//! alone decides whether a file is embedded as-is or compiled first. Global
//! resources are grouped by neutral base name with their culture-specific
//! siblings ([`group_global_files`]); groups are ordered longest name first
//! by [`AppResourcesLengthComparer`] so specific names are matched before
//! general ones that prefix them.

#![warn(missing_docs)]

pub mod codegen;
pub mod comparer;
pub mod culture;
pub mod error;
pub mod file_info;
pub mod grouping;

pub use codegen::{append_resource_types, generate_resource_unit, read_resx_keys, sanitize_resource_name};
pub use comparer::{AppResourcesLengthComparer, ResourceKey};
pub use culture::culture_of;
pub use error::ResourceError;
pub use file_info::{ResourceFileInfo, ResourceKind};
pub use grouping::{discover_resource_files, group_global_files, ResourceGroup};
