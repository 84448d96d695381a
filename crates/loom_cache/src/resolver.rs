//! Name-to-path cache for external assemblies.

use crate::error::{LoadError, ResolveError};
use crate::loader::AssemblyLoader;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument, warn};

/// Resolves assembly names to local file paths, loading each name at most
/// once per resolver.
///
/// Lookup and resolution of a name happen under one lock, so concurrent
/// callers asking for the same unresolved name trigger a single load.
/// Successful resolutions are kept for the resolver's lifetime and are never
/// evicted: an assembly replaced on disk keeps resolving to its first path.
/// Failures are not cached.
pub struct AssemblyPathResolver {
    loader: Box<dyn AssemblyLoader>,
    resolved: Mutex<HashMap<String, PathBuf>>,
}

impl AssemblyPathResolver {
    /// Creates a resolver loading through `loader`.
    pub fn new(loader: impl AssemblyLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the local path of the assembly called `name`.
    ///
    /// A name containing `,` is first loaded strictly as a full display name;
    /// if that fails, or the name has no comma, a partial-name load is tried.
    #[instrument(level = "debug", skip(self))]
    pub fn get_assembly_path(&self, name: &str) -> Result<PathBuf, ResolveError> {
        let mut resolved = self
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(path) = resolved.get(name) {
            debug!(path = %path.display(), "assembly path cache hit");
            return Ok(path.clone());
        }

        let mut failure: Option<LoadError> = None;
        let mut loaded = None;
        if name.contains(',') {
            match self.loader.load_strict(name) {
                Ok(assembly) => loaded = Some(assembly),
                Err(err) => {
                    debug!(error = %err, "strict load failed");
                    failure = Some(err);
                }
            }
        }
        if loaded.is_none() {
            match self.loader.load_partial(name) {
                Ok(assembly) => loaded = Some(assembly),
                Err(err) => failure = Some(err),
            }
        }

        match loaded {
            Some(assembly) => {
                let path = assembly.local_path();
                debug!(path = %path.display(), "resolved assembly");
                resolved.insert(name.to_string(), path.clone());
                Ok(path)
            }
            None => {
                let source = failure
                    .unwrap_or_else(|| LoadError::new("no load strategy produced an assembly"));
                warn!(error = %source, "assembly resolution failed");
                Err(ResolveError::AssemblyResolution {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    /// Returns `true` when `name` has already been resolved.
    pub fn is_cached(&self, name: &str) -> bool {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Number of names resolved so far.
    pub fn cached_len(&self) -> usize {
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl std::fmt::Debug for AssemblyPathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyPathResolver")
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadedAssembly;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counts {
        strict: AtomicUsize,
        partial: AtomicUsize,
    }

    /// Resolves `Known*` names under `/lib`, fails everything else.
    struct CountingLoader {
        counts: Arc<Counts>,
        strict_works: bool,
    }

    impl CountingLoader {
        fn new(strict_works: bool) -> (Self, Arc<Counts>) {
            let counts = Arc::new(Counts::default());
            (
                Self {
                    counts: Arc::clone(&counts),
                    strict_works,
                },
                counts,
            )
        }

        fn lookup(name: &str) -> Result<LoadedAssembly, LoadError> {
            let simple = name.split(',').next().unwrap_or_default().trim();
            if simple.starts_with("Known") {
                Ok(LoadedAssembly {
                    name: simple.to_string(),
                    origin: format!("file:///lib/{simple}.dll"),
                })
            } else {
                Err(LoadError::new(format!("{simple} not found")))
            }
        }
    }

    impl AssemblyLoader for CountingLoader {
        fn load_strict(&self, full_name: &str) -> Result<LoadedAssembly, LoadError> {
            self.counts.strict.fetch_add(1, Ordering::SeqCst);
            if self.strict_works {
                Self::lookup(full_name)
            } else {
                Err(LoadError::new("strict load unavailable"))
            }
        }

        fn load_partial(&self, name: &str) -> Result<LoadedAssembly, LoadError> {
            self.counts.partial.fetch_add(1, Ordering::SeqCst);
            Self::lookup(name)
        }
    }

    #[test]
    fn second_call_uses_cache() {
        let (loader, counts) = CountingLoader::new(true);
        let resolver = AssemblyPathResolver::new(loader);
        let first = resolver.get_assembly_path("KnownLib").unwrap();
        let second = resolver.get_assembly_path("KnownLib").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, PathBuf::from("/lib/KnownLib.dll"));
        assert_eq!(counts.partial.load(Ordering::SeqCst), 1);
        assert!(resolver.is_cached("KnownLib"));
    }

    #[test]
    fn simple_name_skips_strict_load() {
        let (loader, counts) = CountingLoader::new(true);
        let resolver = AssemblyPathResolver::new(loader);
        resolver.get_assembly_path("KnownLib").unwrap();
        assert_eq!(counts.strict.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn full_name_prefers_strict_load() {
        let (loader, counts) = CountingLoader::new(true);
        let resolver = AssemblyPathResolver::new(loader);
        resolver
            .get_assembly_path("KnownLib, Version=1.0.0.0")
            .unwrap();
        assert_eq!(counts.strict.load(Ordering::SeqCst), 1);
        assert_eq!(counts.partial.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_strict_load_falls_back_to_partial() {
        let (loader, counts) = CountingLoader::new(false);
        let resolver = AssemblyPathResolver::new(loader);
        let path = resolver
            .get_assembly_path("KnownLib, Version=1.0.0.0")
            .unwrap();
        assert_eq!(path, PathBuf::from("/lib/KnownLib.dll"));
        assert_eq!(counts.strict.load(Ordering::SeqCst), 1);
        assert_eq!(counts.partial.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let (loader, counts) = CountingLoader::new(true);
        let resolver = AssemblyPathResolver::new(loader);
        let err = resolver.get_assembly_path("Missing").unwrap_err();
        match &err {
            ResolveError::AssemblyResolution { name, source } => {
                assert_eq!(name, "Missing");
                assert_eq!(source.message, "Missing not found");
            }
        }
        assert!(resolver.get_assembly_path("Missing").is_err());
        assert_eq!(counts.partial.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached_len(), 0);
    }

    #[test]
    fn concurrent_requests_load_once() {
        let (loader, counts) = CountingLoader::new(true);
        let resolver = Arc::new(AssemblyPathResolver::new(loader));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || resolver.get_assembly_path("KnownShared").unwrap())
            })
            .collect();
        let paths: Vec<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(paths.iter().all(|p| p == &paths[0]));
        assert_eq!(counts.partial.load(Ordering::SeqCst), 1);
    }
}
