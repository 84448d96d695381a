//! Longest-name-first ordering of resource identifiers.

use crate::file_info::ResourceFileInfo;
use std::cmp::Ordering;

/// Anything that names a resource for ordering purposes.
pub trait ResourceKey {
    /// The name compared by [`AppResourcesLengthComparer`].
    fn resource_key(&self) -> &str;
}

impl ResourceKey for str {
    fn resource_key(&self) -> &str {
        self
    }
}

impl ResourceKey for String {
    fn resource_key(&self) -> &str {
        self
    }
}

/// A grouped-name list is keyed by its first element; an empty list by `""`.
impl ResourceKey for [String] {
    fn resource_key(&self) -> &str {
        self.first().map(String::as_str).unwrap_or_default()
    }
}

impl ResourceKey for Vec<String> {
    fn resource_key(&self) -> &str {
        self.as_slice().resource_key()
    }
}

impl ResourceKey for ResourceFileInfo {
    fn resource_key(&self) -> &str {
        self.file_name()
    }
}

impl<T: ResourceKey + ?Sized> ResourceKey for &T {
    fn resource_key(&self) -> &str {
        (**self).resource_key()
    }
}

/// Orders resource identifiers by descending length, counted in UTF-16
/// code units so a character outside the BMP counts twice.
///
/// Equal lengths compare [`Ordering::Equal`] with no secondary key; use a
/// stable sort to keep insertion order among them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppResourcesLengthComparer;

impl AppResourcesLengthComparer {
    /// Compares `a` and `b`: the longer name sorts first.
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: ResourceKey + ?Sized,
        B: ResourceKey + ?Sized,
    {
        let a = a.resource_key().encode_utf16().count();
        let b = b.resource_key().encode_utf16().count();
        b.cmp(&a)
    }

    /// Stable-sorts `items` longest name first.
    pub fn sort<T: ResourceKey>(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}
