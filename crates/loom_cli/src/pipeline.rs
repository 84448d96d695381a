//! Project loading shared by the CLI commands.

use std::path::{Path, PathBuf};

use loom_cache::{AssemblyPathResolver, ProbingLoader};
use loom_config::{load_config, load_config_from_str, LoomConfig, CONFIG_FILE_NAME};
use loom_source::SourceDb;
use tracing::debug;

use crate::GlobalArgs;

/// Directories never scanned for artifacts.
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git"];

/// Finds the project root and its configuration.
///
/// `--config` may name a `loom.toml` (its directory is the root) or a
/// directory. Without it the current directory is the root, and a missing
/// `loom.toml` there means built-in defaults.
pub fn load_project(global: &GlobalArgs) -> Result<(PathBuf, LoomConfig), Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let config = load_config_from_str(&std::fs::read_to_string(&path)?)?;
                Ok((root, config))
            } else {
                let config = load_config(&path)?;
                Ok((path, config))
            }
        }
        None => {
            let root = std::env::current_dir()?;
            let config = if root.join(CONFIG_FILE_NAME).is_file() {
                load_config(&root)?
            } else {
                debug!("no {CONFIG_FILE_NAME} found, using defaults");
                LoomConfig::default()
            };
            Ok((root, config))
        }
    }
}

/// Loads every file under `root` into a source database, named by its
/// `/`-separated path relative to `root`. Returns the names, sorted.
pub fn load_sources(root: &Path) -> Result<(SourceDb, Vec<String>), Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    walk_dir(root, &mut paths)?;
    paths.sort();

    let mut db = SourceDb::new();
    let mut names = Vec::with_capacity(paths.len());
    for path in paths {
        let name = relative_name(root, &path);
        let bytes = std::fs::read(&path)?;
        db.add_source(name.clone(), String::from_utf8_lossy(&bytes).into_owned());
        names.push(name);
    }
    debug!(root = %root.display(), files = names.len(), "loaded sources");
    Ok((db, names))
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| SKIPPED_DIRS.contains(&n));
            if !skipped {
                walk_dir(&path, files)?;
            }
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// `root/site/a.aspx` → `site/a.aspx`.
pub fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// A resolver probing the configured paths, taken relative to `root`.
pub fn resolver_for(root: &Path, config: &LoomConfig) -> AssemblyPathResolver {
    let probe: Vec<PathBuf> = config
        .assemblies
        .probe_paths
        .iter()
        .map(|p| root.join(p))
        .collect();
    AssemblyPathResolver::new(ProbingLoader::new(probe))
}
