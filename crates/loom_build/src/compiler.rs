//! Compiler backends and the registry mapping languages to them.

use loom_common::{qualified_name, CodeCompileUnit};
use loom_config::{CompilerInfo, LoomConfig};
use loom_resources::ResourceGroup;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Everything a backend needs to compile one batch.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Synthetic name of the assembly to produce.
    pub assembly_name: String,
    /// Language of every unit in the batch.
    pub language: String,
    /// Code units of all batch members, partial types already merged.
    pub units: Vec<CodeCompileUnit>,
    /// Resolved paths of referenced external assemblies.
    pub references: Vec<PathBuf>,
    /// Resource files embedded into the assembly, one family per entry with
    /// the neutral file first.
    pub resources: Vec<ResourceGroup>,
    /// Whether to emit debug information.
    pub debug: bool,
    /// Backend-specific options from the compiler entry.
    pub options: String,
}

/// The product of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledAssembly {
    /// Assembly name.
    pub name: String,
    /// Fully qualified names of the types the assembly defines.
    pub types: Vec<String>,
    /// Where the assembly was written, if anywhere.
    pub path: Option<PathBuf>,
}

impl CompiledAssembly {
    /// Returns `true` when the assembly defines `type_name`.
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}

impl fmt::Display for CompiledAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({})", self.name, path.display()),
            None => f.write_str(&self.name),
        }
    }
}

/// A backend rejected a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendFailure {
    /// The backend's explanation.
    pub message: String,
}

/// Turns a batch of code units into an assembly.
pub trait CompilerBackend: Send + Sync {
    /// Compiles `request`.
    fn compile(&self, request: &CompileRequest) -> Result<CompiledAssembly, BackendFailure>;
}

/// A backend together with the configuration entry it was registered under.
#[derive(Clone)]
pub struct RegisteredCompiler {
    /// The configuration entry.
    pub info: CompilerInfo,
    /// The backend instance.
    pub backend: Arc<dyn CompilerBackend>,
}

impl fmt::Debug for RegisteredCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCompiler")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Language names written in directives, mapped to configured language names.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("c#", "csharp"),
    ("cs", "csharp"),
    ("visualbasic", "vb"),
    ("vb.net", "vb"),
];

/// Maps languages to compiler backends.
#[derive(Debug, Clone, Default)]
pub struct CompilerRegistry {
    compilers: Vec<RegisteredCompiler>,
}

impl CompilerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every configured compiler with one [`RecordingBackend`].
    pub fn recording(config: &LoomConfig, backend: Arc<RecordingBackend>) -> Self {
        let mut registry = Self::new();
        for info in &config.compilers {
            registry.register(info.clone(), Arc::clone(&backend) as Arc<dyn CompilerBackend>);
        }
        registry
    }

    /// Registers `backend` for `info.language`. A later registration for the
    /// same language wins.
    pub fn register(&mut self, info: CompilerInfo, backend: Arc<dyn CompilerBackend>) {
        self.compilers
            .retain(|c| !c.info.language.eq_ignore_ascii_case(&info.language));
        self.compilers.push(RegisteredCompiler { info, backend });
    }

    /// Finds the compiler for `language`, ignoring ASCII case.
    ///
    /// Accepts the configured language name, one of its source extensions,
    /// or a common alias such as `C#`.
    pub fn lookup(&self, language: &str) -> Option<&RegisteredCompiler> {
        let wanted = canonical_language(language);
        self.compilers.iter().find(|c| {
            c.info.language.eq_ignore_ascii_case(&wanted)
                || c.info
                    .extensions
                    .iter()
                    .any(|ext| ext.eq_ignore_ascii_case(language))
        })
    }

    /// Number of registered compilers.
    pub fn len(&self) -> usize {
        self.compilers.len()
    }

    /// Returns `true` when no compiler is registered.
    pub fn is_empty(&self) -> bool {
        self.compilers.is_empty()
    }
}

/// Lowercases `language` and resolves well-known aliases.
pub fn canonical_language(language: &str) -> String {
    let lower = language.trim().to_ascii_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map_or(lower, |(_, name)| name.to_string())
}

/// A backend that compiles nothing: it records each request and reports the
/// types the units declare.
///
/// Types are taken from the units' namespaces plus `class`, `struct`, and
/// `interface` declarations found in source snippets.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    requests: Mutex<Vec<CompileRequest>>,
    failure: Option<String>,
}

impl RecordingBackend {
    /// Creates a backend that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects every request with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CompilerBackend for RecordingBackend {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledAssembly, BackendFailure> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if let Some(message) = &self.failure {
            return Err(BackendFailure {
                message: message.clone(),
            });
        }
        let mut types: Vec<String> = Vec::new();
        for unit in &request.units {
            let declared = unit
                .type_names()
                .chain(unit.snippets.iter().flat_map(|s| snippet_types(s)));
            for name in declared {
                if !types.contains(&name) {
                    types.push(name);
                }
            }
        }
        Ok(CompiledAssembly {
            name: request.assembly_name.clone(),
            types,
            path: None,
        })
    }
}

/// Finds type declarations in source text, qualified by the most recent
/// `namespace` declaration.
fn snippet_types(source: &str) -> Vec<String> {
    let words: Vec<&str> = source
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .filter(|w| !w.is_empty())
        .collect();
    let mut namespace = "";
    let mut types = Vec::new();
    for pair in words.windows(2) {
        match pair[0] {
            "namespace" | "Namespace" => namespace = pair[1],
            "class" | "struct" | "interface" | "Class" | "Structure" | "Interface" => {
                types.push(qualified_name(namespace, pair[1]));
            }
            _ => {}
        }
    }
    types
}
