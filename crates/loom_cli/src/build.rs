//! `loom build`: runs the provider pipeline over project artifacts.
//!
//! Compilation goes to a recording backend, so a build checks markup,
//! includes, code generation, batching, and assembly references without
//! invoking a real compiler.

use std::sync::Arc;

use loom_build::{BuildManager, CompilerRegistry, RecordingBackend};
use loom_config::{LoomConfig, ProviderKind};
use loom_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use loom_source::ArtifactIdentity;

use crate::pipeline::{load_project, load_sources, resolver_for};
use crate::{BuildArgs, GlobalArgs};

/// Runs the `loom build` command.
///
/// Prints one line per build result. Returns exit code 0 on success, 1 when
/// the build fails.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let (sources, names) = load_sources(&root)?;

    let artifacts: Vec<ArtifactIdentity> = if args.files.is_empty() {
        buildable(&config, &names)
    } else {
        args.files
            .iter()
            .map(|f| ArtifactIdentity::durable(normalize(f)))
            .collect()
    };
    if artifacts.is_empty() {
        if !global.quiet {
            eprintln!("warning: nothing to build in {}", root.display());
        }
        return Ok(0);
    }

    let backend = Arc::new(RecordingBackend::new());
    let compilers = CompilerRegistry::recording(&config, Arc::clone(&backend));
    let resolver = Arc::new(resolver_for(&root, &config));
    let manager = BuildManager::new(config, compilers, resolver);

    match manager.build(&sources, &artifacts) {
        Ok(items) => {
            for item in &items {
                println!("{item}");
            }
            if !global.quiet {
                eprintln!(
                    "    Finished {} artifact(s) in {} batch(es)",
                    items.len(),
                    backend.requests().len()
                );
            }
            Ok(0)
        }
        Err(err) => {
            let renderer = TerminalRenderer::new(global.color);
            eprintln!("{}", renderer.render(&err.to_diagnostic(), &sources));
            Ok(1)
        }
    }
}

/// Names with a configured provider other than `ignore`.
fn buildable(config: &LoomConfig, names: &[String]) -> Vec<ArtifactIdentity> {
    names
        .iter()
        .filter(|name| {
            config
                .provider_kind_for(name)
                .is_some_and(|kind| kind != ProviderKind::Ignore)
        })
        .map(|name| ArtifactIdentity::durable(name.clone()))
        .collect()
}

/// `./site\a.aspx` → `site/a.aspx`.
fn normalize(file: &str) -> String {
    let file = file.replace('\\', "/");
    file.trim_start_matches("./").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_for(dir: &std::path::Path) -> GlobalArgs {
        std::fs::write(dir.join("loom.toml"), "").unwrap();
        GlobalArgs {
            quiet: true,
            color: false,
            config: Some(dir.display().to_string()),
        }
    }

    #[test]
    fn builds_every_artifact_by_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Default.aspx"), "<%@ Page %>").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "notes").unwrap();
        let args = BuildArgs { files: Vec::new() };
        assert_eq!(run(&args, &global_for(dir.path())).unwrap(), 0);
    }

    #[test]
    fn failed_build_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.aspx"), "<!-- #include file=\"a.aspx\" -->").unwrap();
        let args = BuildArgs {
            files: vec!["./a.aspx".to_string()],
        };
        assert_eq!(run(&args, &global_for(dir.path())).unwrap(), 1);
    }

    #[test]
    fn buildable_skips_ignored_and_unknown() {
        let config = LoomConfig::default();
        let names = vec!["a.aspx".to_string(), "notes.txt".to_string(), "logo.png".to_string()];
        let artifacts = buildable(&config, &names);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path(), "a.aspx");
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize("./site\\a.aspx"), "site/a.aspx");
        assert_eq!(normalize("a.aspx"), "a.aspx");
    }
}
