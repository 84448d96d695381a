//! Build orchestration.

use crate::cache_item::BuildManagerCacheItem;
use crate::compiler::{canonical_language, CompileRequest, CompiledAssembly, CompilerRegistry};
use crate::error::BuildError;
use crate::group::{BuildProviderGroup, GroupCategory};
use crate::merge_partial_types;
use crate::provider::BuildProvider;
use loom_cache::{AssemblyPathResolver, ResultCache};
use loom_common::{Fingerprinter, InternalError};
use loom_config::{LoomConfig, ProviderKind};
use loom_resources::{group_global_files, ResourceFileInfo, ResourceGroup};
use loom_source::{ArtifactIdentity, SourceDb};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Drives builds: selects providers, batches them, compiles each batch, and
/// caches the results.
///
/// The assembly resolver is shared and may outlive the manager; the result
/// cache belongs to the manager.
pub struct BuildManager {
    config: LoomConfig,
    compilers: CompilerRegistry,
    resolver: Arc<AssemblyPathResolver>,
    results: ResultCache<BuildManagerCacheItem>,
}

impl BuildManager {
    /// Creates a manager with an empty result cache.
    pub fn new(
        config: LoomConfig,
        compilers: CompilerRegistry,
        resolver: Arc<AssemblyPathResolver>,
    ) -> Self {
        Self {
            config,
            compilers,
            resolver,
            results: ResultCache::new(),
        }
    }

    /// The configuration builds run with.
    pub fn config(&self) -> &LoomConfig {
        &self.config
    }

    /// Results of earlier builds.
    pub fn results(&self) -> &ResultCache<BuildManagerCacheItem> {
        &self.results
    }

    /// The assembly resolver used for external references.
    pub fn resolver(&self) -> &AssemblyPathResolver {
        &self.resolver
    }

    /// Builds `artifacts`, returning one result per artifact in input order.
    ///
    /// A cached result is reused when its revalidation string is non-empty
    /// and matches the artifact's current fingerprint. Any failure aborts the
    /// whole build; batches compiled before the failure stay cached.
    #[instrument(skip_all, fields(artifacts = artifacts.len()))]
    pub fn build(
        &self,
        sources: &SourceDb,
        artifacts: &[ArtifactIdentity],
    ) -> Result<Vec<Arc<BuildManagerCacheItem>>, BuildError> {
        let mut done: HashMap<ArtifactIdentity, Arc<BuildManagerCacheItem>> = HashMap::new();
        let mut queued: HashSet<ArtifactIdentity> = HashSet::new();
        let mut groups: Vec<BuildProviderGroup> = Vec::new();
        let mut batches: HashMap<(String, GroupCategory), usize> = HashMap::new();

        for identity in artifacts {
            if done.contains_key(identity) || !queued.insert(identity.clone()) {
                continue;
            }
            let kind = self
                .config
                .provider_kind_for(identity.path())
                .ok_or_else(|| BuildError::NoProvider {
                    artifact: identity.clone(),
                })?;
            debug!(artifact = %identity, kind = %kind, "selected provider");

            let mut provider = BuildProvider::new(
                identity.clone(),
                kind,
                &self.config.compilation.default_language,
            );
            provider.load(sources)?;

            if let Some(cached) = self.cached(&provider) {
                debug!(artifact = %identity, "reusing cached result");
                done.insert(identity.clone(), cached);
                continue;
            }
            if kind == ProviderKind::Ignore {
                let item = BuildManagerCacheItem::without_code(identity.clone());
                done.insert(identity.clone(), self.results.insert(identity.clone(), item));
                continue;
            }

            let category = GroupCategory::of(kind);
            let index = if self.config.compilation.batch {
                let key = (canonical_language(provider.language_name()), category);
                *batches.entry(key).or_insert_with(|| {
                    groups.push(BuildProviderGroup::new());
                    groups.len() - 1
                })
            } else {
                let mut group = BuildProviderGroup::new();
                group.set_standalone(true);
                groups.push(group);
                groups.len() - 1
            };
            groups[index].add_provider(provider, &self.compilers);
        }

        for group in groups {
            for (identity, item) in self.compile_group(sources, group)? {
                done.insert(identity, item);
            }
        }

        artifacts
            .iter()
            .map(|identity| {
                done.get(identity).cloned().ok_or_else(|| {
                    BuildError::from(InternalError::new(format!(
                        "no result was produced for '{identity}'"
                    )))
                })
            })
            .collect()
    }

    fn cached(&self, provider: &BuildProvider) -> Option<Arc<BuildManagerCacheItem>> {
        let cached = self.results.get(provider.identity())?;
        let current = provider.fingerprint()?.to_string();
        (!cached.custom_string().is_empty() && cached.custom_string() == current).then_some(cached)
    }

    fn compile_group(
        &self,
        sources: &SourceDb,
        group: BuildProviderGroup,
    ) -> Result<Vec<(ArtifactIdentity, Arc<BuildManagerCacheItem>)>, BuildError> {
        for provider in group.providers() {
            provider.compiler_backend(&self.compilers)?;
        }
        let compiler = group.compiler().cloned().ok_or_else(|| {
            InternalError::new(format!(
                "group '{}' has members but no compiler",
                group.name_prefix()
            ))
        })?;

        let mut units = Vec::new();
        for provider in group.providers() {
            provider.generate_code(sources, &mut units)?;
        }
        merge_partial_types(&mut units);

        let mut names: Vec<String> = self.config.assemblies.references.clone();
        for unit in &units {
            for name in &unit.referenced_assemblies {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        let references = names
            .iter()
            .map(|name| self.resolver.get_assembly_path(name))
            .collect::<Result<Vec<PathBuf>, _>>()?;

        let resources = resource_families(group.providers());

        let mut fingerprint = Fingerprinter::new();
        for provider in group.providers() {
            fingerprint.update(provider.identity().path().as_bytes());
            if let Some(hash) = provider.fingerprint() {
                fingerprint.update(hash.to_string().as_bytes());
            }
        }
        let assembly_name = format!("{}_{}", group.name_prefix(), fingerprint.finish().short());

        info!(
            assembly = %assembly_name,
            backend = %compiler.info.backend,
            members = group.len(),
            units = units.len(),
            references = references.len(),
            resources = resources.len(),
            "compiling batch"
        );
        let request = CompileRequest {
            assembly_name: assembly_name.clone(),
            language: compiler.info.language.clone(),
            units,
            references,
            resources,
            debug: self.config.compilation.debug,
            options: compiler.info.options.clone(),
        };
        let compiled: Arc<CompiledAssembly> = Arc::new(compiler.backend.compile(&request).map_err(
            |failure| BuildError::Compilation {
                group: assembly_name,
                message: failure.message,
            },
        )?);

        Ok(group
            .into_providers()
            .into_iter()
            .map(|provider| {
                let identity = provider.identity().clone();
                let item = BuildManagerCacheItem::new(&compiled, &provider);
                (identity.clone(), self.results.insert(identity, item))
            })
            .collect())
    }
}

/// Families of the batch's resource files. Culture variants whose neutral
/// file is outside the batch still ship, each on its own.
fn resource_families(providers: &[BuildProvider]) -> Vec<ResourceGroup> {
    let mut files: Vec<ResourceFileInfo> = providers
        .iter()
        .filter(|p| p.kind() == ProviderKind::Resource)
        .map(|p| ResourceFileInfo::from_path(p.identity().path()))
        .collect();
    let mut families = group_global_files(&mut files);
    families.extend(
        files
            .iter()
            .filter(|f| !f.is_seen())
            .map(|f| vec![f.path().to_string_lossy().into_owned()]),
    );
    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RecordingBackend;
    use loom_cache::ProbingLoader;

    fn manager(config: LoomConfig, backend: Arc<RecordingBackend>) -> BuildManager {
        let compilers = CompilerRegistry::recording(&config, backend);
        let resolver = Arc::new(AssemblyPathResolver::new(ProbingLoader::new(Vec::<PathBuf>::new())));
        BuildManager::new(config, compilers, resolver)
    }

    fn sources(files: &[(&str, &str)]) -> SourceDb {
        let mut db = SourceDb::new();
        for (name, text) in files {
            db.add_source(*name, text.to_string());
        }
        db
    }

    fn ids(paths: &[&str]) -> Vec<ArtifactIdentity> {
        paths.iter().map(|p| ArtifactIdentity::durable(*p)).collect()
    }

    #[test]
    fn pages_share_one_batch() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager(LoomConfig::default(), Arc::clone(&backend));
        let db = sources(&[("a.aspx", "<p>a</p>"), ("b.aspx", "<p>b</p>")]);
        let items = manager.build(&db, &ids(&["a.aspx", "b.aspx"])).unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].assembly_name.starts_with("App_Web_"));
        assert_eq!(requests[0].units.len(), 2);
        assert_eq!(items[0].generated_type(), Some("ASP.a_aspx"));
        assert_eq!(items[1].generated_type(), Some("ASP.b_aspx"));
        assert_eq!(manager.results().len(), 2);
    }

    #[test]
    fn application_gets_its_own_batch() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager(LoomConfig::default(), Arc::clone(&backend));
        let db = sources(&[("a.aspx", ""), ("Global.asax", "<%@ Application %>")]);
        manager.build(&db, &ids(&["a.aspx", "Global.asax"])).unwrap();
        let names: Vec<_> = backend.requests().into_iter().map(|r| r.assembly_name).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("App_Web_"));
        assert!(names[1].starts_with("App_global.asax_"));
    }

    #[test]
    fn unbatched_builds_compile_each_artifact_alone() {
        let mut config = LoomConfig::default();
        config.compilation.batch = false;
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager(config, Arc::clone(&backend));
        let db = sources(&[("a.aspx", ""), ("b.aspx", "")]);
        manager.build(&db, &ids(&["a.aspx", "b.aspx"])).unwrap();
        assert_eq!(backend.requests().len(), 2);
    }

    #[test]
    fn unknown_extension_has_no_provider() {
        let manager = manager(LoomConfig::default(), Arc::new(RecordingBackend::new()));
        let err = manager.build(&SourceDb::new(), &ids(&["a.unknown"])).unwrap_err();
        assert!(matches!(err, BuildError::NoProvider { .. }));
    }

    #[test]
    fn ignored_files_produce_items_without_code() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager(LoomConfig::default(), Arc::clone(&backend));
        let items = manager.build(&SourceDb::new(), &ids(&["notes.txt"])).unwrap();
        assert!(items[0].compiled().is_none());
        assert!(backend.requests().is_empty());
    }

    #[test]
    fn resource_families_keep_orphan_variants() {
        let providers: Vec<BuildProvider> = [
            "R/Strings.resx",
            "R/Strings.de.resx",
            "R/Errors.fr.resx",
        ]
        .iter()
        .map(|p| BuildProvider::new(ArtifactIdentity::durable(*p), ProviderKind::Resource, "csharp"))
        .collect();
        let families = resource_families(&providers);
        assert_eq!(
            families,
            vec![
                vec!["R/Strings.resx".to_string(), "R/Strings.de.resx".to_string()],
                vec!["R/Errors.fr.resx".to_string()],
            ]
        );
    }

    #[test]
    fn duplicate_inputs_are_built_once() {
        let backend = Arc::new(RecordingBackend::new());
        let manager = manager(LoomConfig::default(), Arc::clone(&backend));
        let db = sources(&[("a.aspx", "")]);
        let items = manager.build(&db, &ids(&["a.aspx", "a.aspx"])).unwrap();
        assert_eq!(items.len(), 2);
        assert!(Arc::ptr_eq(&items[0], &items[1]));
        assert_eq!(backend.requests()[0].units.len(), 1);
    }
}
