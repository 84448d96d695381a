//! `loom resources`: classifies and groups global resource files.

use loom_resources::{discover_resource_files, group_global_files};

use crate::pipeline::load_project;
use crate::{GlobalArgs, ResourcesArgs};

/// Runs the `loom resources` command.
///
/// Prints one line per resource group, longest head first, with the head's
/// culture-specific files after it. A relative directory is taken from the
/// project root.
pub fn run(args: &ResourcesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = if args.dir.is_absolute() {
        args.dir.clone()
    } else {
        load_project(global)?.0.join(&args.dir)
    };
    let mut files = discover_resource_files(&dir)?;

    if args.list {
        for file in &files {
            let role = if file.embeddable() {
                "embeddable"
            } else if file.compilable() {
                "compilable"
            } else {
                "-"
            };
            println!("{:<12} {:<10} {}", format!("{:?}", file.kind()), role, file.file_name());
        }
    }

    let groups = group_global_files(&mut files);
    for group in &groups {
        println!("{}", group.join(" "));
    }
    if !global.quiet {
        eprintln!("    {} file(s) in {} group(s)", files.len(), groups.len());
    }
    Ok(0)
}
