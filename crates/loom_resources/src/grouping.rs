//! Grouping of global resource files by neutral base name.

use crate::comparer::AppResourcesLengthComparer;
use crate::culture::culture_of;
use crate::error::ResourceError;
use crate::file_info::ResourceFileInfo;
use std::path::Path;
use tracing::debug;

/// Paths of one resource family: the neutral file first, then its
/// culture-specific variants.
pub type ResourceGroup = Vec<String>;

/// Lists the files of a resource directory, sorted by path.
pub fn discover_resource_files(dir: &Path) -> Result<Vec<ResourceFileInfo>, ResourceError> {
    let io_err = |source: std::io::Error| ResourceError::Io {
        path: dir.display().to_string(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            files.push(ResourceFileInfo::from_path(entry.path()));
        }
    }
    files.sort_by(|a, b| a.path().cmp(b.path()));
    Ok(files)
}

/// Groups keyed resource files into families.
///
/// 1. A neutral file with at least one culture-qualified sibling
///    (`Strings.resx` with `Strings.fr.resx`) heads a group.
/// 2. Heads are visited longest first; each claims the unclaimed files whose
///    name starts with its base name followed by `.`. A head named
///    `Resources.X` also claims files named `X.*`.
/// 3. Neutral files still unclaimed form singleton groups.
///
/// Culture-specific files with no neutral head are left out. Files are
/// marked seen as they are claimed; files already seen are skipped. The
/// result is ordered by [`AppResourcesLengthComparer`].
pub fn group_global_files(files: &mut [ResourceFileInfo]) -> Vec<ResourceGroup> {
    let comparer = AppResourcesLengthComparer;
    let mut groups: Vec<ResourceGroup> = Vec::new();

    for i in 0..files.len() {
        let file = &files[i];
        if file.is_seen() || !file.kind().is_keyed() || culture_of(file.path()).is_some() {
            continue;
        }
        let prefix = format!("{}.", file.stem());
        let depth = file.stem().matches('.').count();
        let has_variant = files.iter().enumerate().any(|(j, other)| {
            j != i
                && !other.is_seen()
                && other.kind().is_keyed()
                && other.stem().starts_with(&prefix)
                && other.stem().matches('.').count() == depth + 1
                && culture_of(other.path()).is_some()
        });
        if has_variant {
            files[i].mark_seen();
            groups.push(vec![path_string(&files[i])]);
        }
    }
    comparer.sort(&mut groups);

    for group in &mut groups {
        let head = Path::new(&group[0])
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let base = head.strip_prefix("Resources.").unwrap_or(&head);
        let prefixes = [format!("{head}."), format!("{base}.")];
        for file in files.iter_mut() {
            let claimed = prefixes.iter().any(|p| file.file_name().starts_with(p.as_str()));
            if !file.is_seen() && file.kind().is_keyed() && claimed {
                file.mark_seen();
                group.push(path_string(file));
            }
        }
    }

    for file in files.iter_mut() {
        if !file.is_seen() && file.kind().is_keyed() && culture_of(file.path()).is_none() {
            file.mark_seen();
            groups.push(vec![path_string(file)]);
        }
    }
    comparer.sort(&mut groups);

    debug!(groups = groups.len(), "grouped global resources");
    groups
}

fn path_string(file: &ResourceFileInfo) -> String {
    file.path().to_string_lossy().into_owned()
}
