//! Build providers: one artifact in, code units out.
//!
//! A [`BuildProvider`] is a closed set of variants selected by
//! [`ProviderKind`]. Every variant offers the same capabilities: identity,
//! language, compiler backend, code generation into a batch, and projections
//! of the generated type and revalidation string from a compiled result.

use crate::compiler::{CompiledAssembly, CompilerRegistry, RegisteredCompiler};
use crate::error::BuildError;
use crate::handler::HandlerInfo;
use crate::schema::parse_schema;
use crate::template::TemplateInfo;
use loom_common::{CodeCompileUnit, ContentHash};
use loom_config::ProviderKind;
use loom_parser::{ParseError, Scanner};
use loom_resources::{culture_of, generate_resource_unit, read_resx_keys, ResourceKind};
use loom_source::{ArtifactIdentity, Location, SourceDb, SourceFile};
use std::cell::OnceCell;
use std::path::Path;
use tracing::trace;

/// Variant state filled in by [`BuildProvider::load`].
#[derive(Debug)]
enum Variant {
    Unloaded,
    Template(Box<TemplateInfo>),
    Handler(HandlerInfo),
    Schema { class: String },
    /// Culture-specific files carry no unit; they ship with their neutral file.
    Resource { unit: Option<CodeCompileUnit> },
    Ignore,
}

/// Turns one artifact into code units for its batch.
#[derive(Debug)]
pub struct BuildProvider {
    identity: ArtifactIdentity,
    kind: ProviderKind,
    language: String,
    variant: Variant,
    compiler: OnceCell<Option<RegisteredCompiler>>,
}

impl BuildProvider {
    /// Creates a provider for `identity`. `default_language` applies unless
    /// the artifact names its own.
    pub fn new(identity: ArtifactIdentity, kind: ProviderKind, default_language: &str) -> Self {
        Self {
            identity,
            kind,
            language: default_language.to_string(),
            variant: Variant::Unloaded,
            compiler: OnceCell::new(),
        }
    }

    /// Reads the artifact: scans templates (expanding includes), reads
    /// handler directives and the keys of neutral resource files. Schema
    /// documents are read later, during [`generate_code`](Self::generate_code).
    pub fn load(&mut self, sources: &SourceDb) -> Result<(), BuildError> {
        self.variant = match self.kind {
            ProviderKind::Page
            | ProviderKind::UserControl
            | ProviderKind::MasterPage
            | ProviderKind::Application
            | ProviderKind::Theme => {
                let scan = Scanner::new(sources)
                    .scan(self.identity.path())
                    .map_err(|e| BuildError::from_parse(&self.identity, e))?;
                let info = TemplateInfo::from_scan(&self.identity, self.kind, scan, sources)?;
                if let Some(language) = &info.language {
                    self.language = language.clone();
                }
                Variant::Template(Box::new(info))
            }
            ProviderKind::Handler | ProviderKind::WebService => {
                let file = self.source(sources)?;
                let info = HandlerInfo::parse(&self.identity, self.kind, file)?;
                if let Some(language) = &info.language {
                    self.language = language.clone();
                }
                Variant::Handler(info)
            }
            ProviderKind::Schema => Variant::Schema {
                class: schema_class(self.identity.path()),
            },
            ProviderKind::Resource if culture_of(Path::new(self.identity.path())).is_some() => {
                Variant::Resource { unit: None }
            }
            ProviderKind::Resource => {
                let keys = match ResourceKind::from_path(Path::new(self.identity.path())) {
                    ResourceKind::ResX => read_resx_keys(self.source(sources)?).map_err(|source| {
                        BuildError::Resource {
                            artifact: self.identity.clone(),
                            source,
                        }
                    })?,
                    _ => Vec::new(),
                };
                let unit = generate_resource_unit(self.identity.path(), &keys).map_err(|source| {
                    BuildError::Resource {
                        artifact: self.identity.clone(),
                        source,
                    }
                })?;
                Variant::Resource { unit: Some(unit) }
            }
            ProviderKind::Ignore => Variant::Ignore,
        };
        trace!(artifact = %self.identity, kind = %self.kind, language = %self.language, "loaded provider");
        Ok(())
    }

    fn source<'s>(&self, sources: &'s SourceDb) -> Result<&'s SourceFile, BuildError> {
        sources.find(self.identity.path()).ok_or_else(|| {
            BuildError::from_parse(
                &self.identity,
                ParseError::IncludeNotFound {
                    location: Location::start_of(self.identity.path()),
                    filename: self.identity.path().to_string(),
                },
            )
        })
    }

    /// The artifact this provider builds.
    pub fn identity(&self) -> &ArtifactIdentity {
        &self.identity
    }

    /// The provider's variant.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The language the artifact's code is generated in.
    pub fn language_name(&self) -> &str {
        &self.language
    }

    /// The compiler backend for [`language_name`](Self::language_name).
    ///
    /// Looked up on first call and remembered; the registry passed on later
    /// calls is not consulted again.
    pub fn compiler_backend(
        &self,
        registry: &CompilerRegistry,
    ) -> Result<&RegisteredCompiler, BuildError> {
        self.compiler
            .get_or_init(|| registry.lookup(&self.language).cloned())
            .as_ref()
            .ok_or_else(|| BuildError::Configuration {
                language: self.language.clone(),
            })
    }

    /// Appends this artifact's code units to `sink`.
    ///
    /// Gives the same output for unchanged input. A malformed schema
    /// document is reported here and fails the whole batch.
    pub fn generate_code(
        &self,
        sources: &SourceDb,
        sink: &mut Vec<CodeCompileUnit>,
    ) -> Result<(), BuildError> {
        match &self.variant {
            Variant::Unloaded => Err(loom_common::InternalError::new(format!(
                "provider for '{}' generated code before loading",
                self.identity
            ))
            .into()),
            Variant::Template(info) => {
                sink.push(info.generate(&self.identity, sources)?);
                Ok(())
            }
            Variant::Handler(info) => {
                sink.push(info.generate());
                Ok(())
            }
            Variant::Schema { class } => {
                let document = parse_schema(&self.identity, self.source(sources)?)?;
                sink.push(document.generate(class));
                Ok(())
            }
            Variant::Resource { unit } => {
                sink.extend(unit.iter().cloned());
                Ok(())
            }
            Variant::Ignore => Ok(()),
        }
    }

    /// The type generated for this artifact, if `result` defines it.
    pub fn generated_type(&self, result: &CompiledAssembly) -> Option<String> {
        let expected = match &self.variant {
            Variant::Template(info) => info.qualified_class(),
            Variant::Handler(info) => info.class.clone(),
            Variant::Schema { class } => class.clone(),
            Variant::Resource { unit } => unit.as_ref()?.type_names().next()?,
            Variant::Unloaded | Variant::Ignore => return None,
        };
        result.contains_type(&expected).then_some(expected)
    }

    /// The revalidation string stored with the result: the content
    /// fingerprint for templates and handlers, empty otherwise.
    pub fn custom_string(&self, _result: &CompiledAssembly) -> String {
        self.fingerprint().map(|f| f.to_string()).unwrap_or_default()
    }

    /// The content fingerprint, for variants that have one.
    pub fn fingerprint(&self) -> Option<ContentHash> {
        match &self.variant {
            Variant::Template(info) => Some(info.fingerprint),
            Variant::Handler(info) => Some(info.fingerprint),
            _ => None,
        }
    }

    /// Files the artifact includes.
    pub fn dependencies(&self) -> &[String] {
        match &self.variant {
            Variant::Template(info) => &info.dependencies,
            _ => &[],
        }
    }
}

/// `App_Code/Orders.xsd` → `Orders`.
fn schema_class(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file.split('.').next().unwrap_or(file);
    stem.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
