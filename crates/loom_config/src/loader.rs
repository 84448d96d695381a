//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{default_compilers, LoomConfig, ProviderKind, DEFAULT_PROVIDERS};
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "loom.toml";

/// Loads and validates `<project_dir>/loom.toml`.
pub fn load_config(project_dir: &Path) -> Result<LoomConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<LoomConfig, ConfigError> {
    let mut config: LoomConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&mut config)?;
    Ok(config)
}

/// Checks required fields and resolves the extension map.
fn validate_config(config: &mut LoomConfig) -> Result<(), ConfigError> {
    if config.compilation.default_language.is_empty() {
        return Err(ConfigError::MissingField(
            "compilation.default_language".to_string(),
        ));
    }
    if config.compilers.is_empty() {
        config.compilers = default_compilers();
    }
    for (idx, compiler) in config.compilers.iter().enumerate() {
        if compiler.language.is_empty() {
            return Err(ConfigError::MissingField(format!("compilers[{idx}].language")));
        }
        if compiler.backend.is_empty() {
            return Err(ConfigError::MissingField(format!("compilers[{idx}].backend")));
        }
    }

    config.providers.clear();
    if config.build_providers.is_empty() {
        for (ext, kind) in DEFAULT_PROVIDERS {
            config.providers.insert(ext.to_string(), kind);
        }
        return Ok(());
    }
    for (ext, kind_name) in &config.build_providers {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::ValidationError(format!(
                "build provider extension '{ext}' must start with '.'"
            )));
        }
        let kind: ProviderKind =
            kind_name
                .parse()
                .map_err(|kind| ConfigError::UnknownProviderKind {
                    extension: ext.clone(),
                    kind,
                })?;
        config.providers.insert(ext.to_ascii_lowercase(), kind);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.compilation.default_language, "csharp");
        assert!(config.compilation.batch);
        assert_eq!(config.compilers.len(), 2);
        assert!(config.compiler_for_language("VB").is_some());
        assert_eq!(config.provider_kind_for("a.ascx"), Some(ProviderKind::UserControl));
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[compilation]
default_language = "vb"
debug = true
batch = false

[[compilers]]
language = "vb"
extensions = ["vb"]
backend = "vbc"
options = "/optimize"

[build_providers]
".ASPX" = "page"
".foo" = "ignore"

[assemblies]
probe_paths = ["bin", "lib"]
references = ["System.Web"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.compilation.default_language, "vb");
        assert!(config.compilation.debug);
        assert!(!config.compilation.batch);
        assert_eq!(config.compiler_for_language("VB").unwrap().options, "/optimize");
        assert_eq!(config.provider_kind_for("x.aspx"), Some(ProviderKind::Page));
        assert_eq!(config.provider_kind_for("x.foo"), Some(ProviderKind::Ignore));
        // An explicit map replaces the defaults entirely.
        assert_eq!(config.provider_kind_for("x.ascx"), None);
        assert_eq!(config.assemblies.probe_paths, vec!["bin", "lib"]);
        assert_eq!(config.assemblies.references, vec!["System.Web"]);
    }

    #[test]
    fn unknown_kind_errors() {
        let toml = r#"
[build_providers]
".foo" = "widget"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProviderKind { .. }));
    }

    #[test]
    fn extension_without_dot_errors() {
        let toml = r#"
[build_providers]
"aspx" = "page"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_default_language_errors() {
        let toml = r#"
[compilation]
default_language = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn compiler_without_language_errors() {
        let toml = r#"
[[compilers]]
language = ""
backend = "csc"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "compilers[0].language"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[assemblies]\nprobe_paths = [\"bin\"]\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.assemblies.probe_paths, vec!["bin"]);
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
