//! The reconciliation planner: pure matching of tracked index paths against
//! the casing the host filesystem reports. Planning never mutates the index
//! or the filesystem; warnings are returned alongside the mapping and printed
//! by the caller.

use std::collections::HashSet;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Ordered set of `(source, destination)` rename pairs for one category of
/// entries. No two pairs share a source; applying a mapping and re-planning
/// yields an empty one.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenameMapping {
    pairs: Vec<(PathBuf, PathBuf)>,
}

impl RenameMapping {
    pub fn push(&mut self, source: PathBuf, destination: PathBuf) {
        if self.pairs.iter().any(|(existing, _)| existing == &source) {
            return;
        }
        self.pairs.push((source, destination));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PathBuf, PathBuf)> {
        self.pairs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// A computed directory plan: `mapping` holds the tracked file paths to
/// rewrite in the index, `directories` the deduplicated directory-level pairs
/// to rename on the host, plus the warnings produced while matching.
#[derive(Debug, Default)]
pub struct ReconciliationPlan {
    pub mapping: RenameMapping,
    pub directories: RenameMapping,
    pub warnings: Vec<String>,
}

/// Index paths are stored `/`-separated; host paths use the platform
/// separator.
pub(crate) fn to_host_separators(path: &Path) -> String {
    path.to_string_lossy().replace('/', MAIN_SEPARATOR_STR)
}

pub(crate) fn to_index_separators(path: &str) -> PathBuf {
    PathBuf::from(path.replace(MAIN_SEPARATOR, "/"))
}

/// Matches the directory prefix of every tracked path against the host
/// directories. An entry whose prefix appears with identical casing in some
/// host directory path already agrees with the host and is skipped; otherwise
/// the entry is mapped onto the host directory that contains its prefix
/// case-insensitively, or reported as unmatched.
pub fn plan_directory_casing(
    tracked: &[PathBuf],
    host_directories: &[PathBuf],
    working_dir: &Path,
) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();
    let host_paths = host_directories
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect::<Vec<_>>();

    for tracked_path in tracked {
        let display = to_host_separators(tracked_path);

        // entries at the root have no directory casing to fix
        let Some(split_at) = display.rfind(MAIN_SEPARATOR) else {
            continue;
        };
        let (directory_prefix, filename) = (&display[..split_at], &display[split_at + 1..]);

        if host_paths.iter().any(|host| host.contains(directory_prefix)) {
            continue;
        }

        let prefix_lowered = directory_prefix.to_lowercase();
        // the shortest matching full path is the most specific ancestor when
        // several host directories could contain the prefix, and it
        // deterministically prefers the top-level directory over deeper
        // aliases
        let target = host_paths
            .iter()
            .filter(|host| host.to_lowercase().contains(&prefix_lowered))
            .min_by_key(|host| host.len());

        match target {
            None => plan.warnings.push(format!(
                "unable to determine target for index entry [{display}]"
            )),
            Some(host_directory) => {
                let source = working_dir.join(&display);
                let destination =
                    PathBuf::from(format!("{host_directory}{MAIN_SEPARATOR}{filename}"));
                plan.mapping.push(source, destination);
                plan.directories.push(
                    working_dir.join(directory_prefix),
                    PathBuf::from(host_directory),
                );
            }
        }
    }

    plan
}

/// Matches tracked file paths against the host files by full-path equality:
/// an entry is a candidate when no host file equals it case-sensitively, and
/// is mapped onto the host file that equals it case-insensitively. A
/// candidate without a case-insensitive counterpart was deleted or renamed
/// beyond casing and is not a reconciliation target.
pub fn plan_file_casing(
    tracked: &[PathBuf],
    host_files: &[PathBuf],
    working_dir: &Path,
) -> RenameMapping {
    let mut mapping = RenameMapping::default();
    let host_relative = host_files
        .iter()
        .filter_map(|file| file.strip_prefix(working_dir).ok())
        .map(|relative| relative.to_string_lossy().into_owned())
        .collect::<HashSet<_>>();

    for tracked_path in tracked {
        let display = to_host_separators(tracked_path);
        if host_relative.contains(&display) {
            continue;
        }

        let source = working_dir.join(&display);
        let source_lowered = source.to_string_lossy().to_lowercase();

        if let Some(host_file) = host_files
            .iter()
            .find(|file| file.to_string_lossy().to_lowercase() == source_lowered)
        {
            mapping.push(source, host_file.to_path_buf());
        }
    }

    mapping
}
