//! Configuration types deserialized from `loom.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kind of build provider that handles an artifact.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ProviderKind {
    /// A templated page (`.aspx`).
    Page,
    /// A reusable user control (`.ascx`).
    UserControl,
    /// A master page (`.master`).
    MasterPage,
    /// The application-level descriptor (`.asax`).
    Application,
    /// A theme directory skin (`.skin`).
    Theme,
    /// A request handler stub (`.ashx`).
    Handler,
    /// A service stub (`.asmx`).
    WebService,
    /// A schema/contract document (`.xsd`).
    Schema,
    /// An embedded resource (`.resx`, `.resources`).
    Resource,
    /// An explicitly ignored file that produces no code.
    Ignore,
}

impl ProviderKind {
    /// All kinds, in declaration order.
    pub const ALL: [ProviderKind; 10] = [
        ProviderKind::Page,
        ProviderKind::UserControl,
        ProviderKind::MasterPage,
        ProviderKind::Application,
        ProviderKind::Theme,
        ProviderKind::Handler,
        ProviderKind::WebService,
        ProviderKind::Schema,
        ProviderKind::Resource,
        ProviderKind::Ignore,
    ];

    /// The name used for this kind in `loom.toml`.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Page => "page",
            ProviderKind::UserControl => "user-control",
            ProviderKind::MasterPage => "master-page",
            ProviderKind::Application => "application",
            ProviderKind::Theme => "theme",
            ProviderKind::Handler => "handler",
            ProviderKind::WebService => "web-service",
            ProviderKind::Schema => "schema",
            ProviderKind::Resource => "resource",
            ProviderKind::Ignore => "ignore",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extension map used when `[build_providers]` is absent.
pub const DEFAULT_PROVIDERS: [(&str, ProviderKind); 12] = [
    (".aspx", ProviderKind::Page),
    (".ascx", ProviderKind::UserControl),
    (".master", ProviderKind::MasterPage),
    (".asax", ProviderKind::Application),
    (".skin", ProviderKind::Theme),
    (".ashx", ProviderKind::Handler),
    (".asmx", ProviderKind::WebService),
    (".xsd", ProviderKind::Schema),
    (".resx", ProviderKind::Resource),
    (".resources", ProviderKind::Resource),
    (".txt", ProviderKind::Ignore),
    (".config", ProviderKind::Ignore),
];

/// The top-level configuration parsed from `loom.toml`.
#[derive(Debug, Deserialize)]
pub struct LoomConfig {
    /// Language defaults and batching behavior.
    #[serde(default)]
    pub compilation: CompilationSection,
    /// Registered compiler backends.
    #[serde(default)]
    pub compilers: Vec<CompilerInfo>,
    /// Extension → provider kind name, as written in the file.
    #[serde(default)]
    pub build_providers: BTreeMap<String, String>,
    /// External assembly lookup settings.
    #[serde(default)]
    pub assemblies: AssembliesConfig,
    /// Extension → kind after validation, keyed by lowercase extension.
    #[serde(skip)]
    pub(crate) providers: BTreeMap<String, ProviderKind>,
}

impl LoomConfig {
    /// Looks up the compiler registered for `language`, ignoring ASCII case.
    pub fn compiler_for_language(&self, language: &str) -> Option<&CompilerInfo> {
        self.compilers
            .iter()
            .find(|c| c.language.eq_ignore_ascii_case(language))
    }

    /// Maps an artifact path to its provider kind by extension, ignoring case.
    pub fn provider_kind_for(&self, path: &str) -> Option<ProviderKind> {
        let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let ext = &name[name.rfind('.')?..];
        self.providers.get(&ext.to_ascii_lowercase()).copied()
    }

    /// The validated extension map.
    pub fn providers(&self) -> &BTreeMap<String, ProviderKind> {
        &self.providers
    }
}

impl Default for LoomConfig {
    fn default() -> Self {
        Self {
            compilation: CompilationSection::default(),
            compilers: default_compilers(),
            build_providers: BTreeMap::new(),
            assemblies: AssembliesConfig::default(),
            providers: DEFAULT_PROVIDERS
                .iter()
                .map(|(ext, kind)| (ext.to_string(), *kind))
                .collect(),
        }
    }
}

/// Compilers registered when `[[compilers]]` is omitted.
pub fn default_compilers() -> Vec<CompilerInfo> {
    vec![
        CompilerInfo::new("csharp", &["cs"], "csc"),
        CompilerInfo::new("vb", &["vb"], "vbc"),
    ]
}

/// The `[compilation]` section.
#[derive(Debug, Deserialize)]
pub struct CompilationSection {
    /// Language used by artifacts that do not name one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Whether backends should emit debug information.
    #[serde(default)]
    pub debug: bool,
    /// When false, every artifact is compiled in its own standalone batch.
    #[serde(default = "default_batch")]
    pub batch: bool,
}

fn default_language() -> String {
    "csharp".to_string()
}

fn default_batch() -> bool {
    true
}

impl Default for CompilationSection {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            debug: false,
            batch: default_batch(),
        }
    }
}

/// A `[[compilers]]` entry describing one compiler backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompilerInfo {
    /// The language this backend compiles (e.g. "csharp").
    pub language: String,
    /// Source file extensions of the language, without dots.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Name of the backend implementation.
    pub backend: String,
    /// Extra options passed to the backend.
    #[serde(default)]
    pub options: String,
}

impl CompilerInfo {
    /// Creates a compiler entry with no extra options.
    pub fn new(language: &str, extensions: &[&str], backend: &str) -> Self {
        Self {
            language: language.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            backend: backend.to_string(),
            options: String::new(),
        }
    }
}

/// The `[assemblies]` section.
#[derive(Debug, Default, Deserialize)]
pub struct AssembliesConfig {
    /// Directories searched for external assemblies.
    #[serde(default)]
    pub probe_paths: Vec<String>,
    /// Assemblies referenced by every batch.
    #[serde(default)]
    pub references: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_roundtrip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.name().parse::<ProviderKind>(), Ok(kind));
        }
        assert_eq!("User-Control".parse::<ProviderKind>(), Ok(ProviderKind::UserControl));
        assert!("widget".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn default_config_maps_extensions() {
        let config = LoomConfig::default();
        assert_eq!(config.provider_kind_for("~/Default.ASPX"), Some(ProviderKind::Page));
        assert_eq!(config.provider_kind_for("Global.asax"), Some(ProviderKind::Application));
        assert_eq!(config.provider_kind_for("notes.md"), None);
        assert_eq!(config.provider_kind_for("Makefile"), None);
    }

    #[test]
    fn compiler_lookup_ignores_case() {
        let config = LoomConfig::default();
        assert_eq!(config.compiler_for_language("CSharp").unwrap().backend, "csc");
        assert!(config.compiler_for_language("fsharp").is_none());
    }
}
