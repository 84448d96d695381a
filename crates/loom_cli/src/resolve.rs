//! `loom resolve`: looks up external assemblies in the probe paths.

use crate::pipeline::{load_project, resolver_for};
use crate::{GlobalArgs, ResolveArgs};

/// Runs the `loom resolve` command.
///
/// Prints `name -> path` for every name that resolves and reports the rest.
/// Returns exit code 1 when any name fails.
pub fn run(args: &ResolveArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    let resolver = resolver_for(&root, &config);

    let mut failed = 0;
    for name in &args.names {
        match resolver.get_assembly_path(name) {
            Ok(path) => println!("{name} -> {}", path.display()),
            Err(err) => {
                eprintln!("error: {err}");
                failed += 1;
            }
        }
    }
    Ok(if failed > 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_from_probe_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/Site.Data.dll"), b"").unwrap();
        std::fs::write(dir.path().join("loom.toml"), "[assemblies]\nprobe_paths = [\"bin\"]\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            color: false,
            config: Some(dir.path().display().to_string()),
        };

        let found = ResolveArgs {
            names: vec!["Site.Data".to_string()],
        };
        assert_eq!(run(&found, &global).unwrap(), 0);

        let missing = ResolveArgs {
            names: vec!["Site.Data".to_string(), "Other, Version=1.0.0.0".to_string()],
        };
        assert_eq!(run(&missing, &global).unwrap(), 1);
    }
}
