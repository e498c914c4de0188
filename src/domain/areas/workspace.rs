use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const GIT_DIR: &str = ".git";

/// Paths discovered on the host filesystem together with the warnings
/// produced while enumerating them. Casing is exactly what the OS reported;
/// the rest of the system treats it as authoritative.
#[derive(Debug, Default)]
pub struct HostScan {
    pub paths: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full recursive set of directories under the repository root, excluding
    /// the `.git` subtree. Unreadable subtrees are skipped with a warning and
    /// a total failure yields an empty scan, never an abort.
    pub fn host_directories(&self) -> HostScan {
        let mut scan = HostScan::default();

        let walker = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != GIT_DIR);

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => scan.paths.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => scan
                    .warnings
                    .push(format!("skipping unreadable entry: {err}")),
            }
        }

        scan
    }

    /// Immediate files of every given directory plus the repository root;
    /// recursion already happened while collecting the directories.
    pub fn host_files(&self, directories: &[PathBuf]) -> HostScan {
        let mut scan = HostScan::default();

        for directory in directories
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(self.path()))
        {
            let entries = match std::fs::read_dir(directory) {
                Ok(entries) => entries,
                Err(err) => {
                    scan.warnings.push(format!(
                        "skipping unreadable directory {}: {err}",
                        directory.display()
                    ));
                    continue;
                }
            };

            for entry in entries {
                match entry {
                    Ok(entry) => match entry.file_type() {
                        Ok(file_type) if file_type.is_file() => scan.paths.push(entry.path()),
                        Ok(_) => {}
                        Err(err) => scan.warnings.push(format!(
                            "skipping unreadable entry {}: {err}",
                            entry.path().display()
                        )),
                    },
                    Err(err) => scan.warnings.push(format!(
                        "skipping unreadable entry in {}: {err}",
                        directory.display()
                    )),
                }
            }
        }

        scan
    }

    /// Renames a file or directory whose source and destination may differ
    /// only by case. A direct rename between such paths can fail or no-op on
    /// a case-insensitive filesystem, so the entry is first displaced to a
    /// probed temporary name and then moved to its final destination.
    pub fn rename_entry(&self, source: &Path, destination: &Path) -> anyhow::Result<()> {
        let temporary = Self::displace_to_temporary(source)?;

        if let Err(err) = std::fs::rename(&temporary, destination) {
            // put the entry back under its original name before giving up
            let _ = std::fs::rename(&temporary, source);
            return Err(err).with_context(|| {
                format!(
                    "failed to rename {} -> {}",
                    temporary.display(),
                    destination.display()
                )
            });
        }

        Ok(())
    }

    /// Renames `source` to `destination` where the two differ only in the
    /// casing of some components. Each differing segment is renamed in turn
    /// from the outside in, so the correction also works when no parent of
    /// `destination` exists under its corrected casing yet.
    pub fn align_casing(&self, source: &Path, destination: &Path) -> anyhow::Result<()> {
        let stale = source
            .strip_prefix(self.path())
            .with_context(|| format!("path {} is outside the repository", source.display()))?;
        let corrected = destination
            .strip_prefix(self.path())
            .with_context(|| format!("path {} is outside the repository", destination.display()))?;

        let mut current = self.path().to_path_buf();
        for (stale_segment, corrected_segment) in stale.components().zip(corrected.components()) {
            let from = current.join(stale_segment);
            current.push(corrected_segment);

            if stale_segment == corrected_segment {
                continue;
            }

            // an earlier mapping entry may have corrected this segment
            if !from.exists() && current.exists() {
                continue;
            }

            self.rename_entry(&from, &current)?;
        }

        Ok(())
    }

    fn displace_to_temporary(source: &Path) -> anyhow::Result<PathBuf> {
        let mut attempt: u32 = 0;

        loop {
            let candidate = Self::temporary_name(source, attempt);

            if candidate.exists() {
                attempt += 1;
                continue;
            }

            match std::fs::rename(source, &candidate) {
                Ok(()) => return Ok(candidate),
                Err(err) if !source.exists() => {
                    return Err(err).with_context(|| {
                        format!("source vanished while renaming {}", source.display())
                    });
                }
                // lost a race for the temporary name, probe the next suffix
                Err(_) if candidate.exists() => attempt += 1,
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!(
                            "failed to rename {} -> {}",
                            source.display(),
                            candidate.display()
                        )
                    });
                }
            }
        }
    }

    fn temporary_name(source: &Path, attempt: u32) -> PathBuf {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        source.with_file_name(format!("{name}.unite{attempt}"))
    }
}
