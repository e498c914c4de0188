use crate::domain::areas::repository::Repository;
use crate::domain::options::OptionFlags;
use crate::domain::planner::{
    RenameMapping, plan_directory_casing, plan_file_casing, to_index_separators,
};
use anyhow::Context;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

impl Repository {
    /// Reconciles index path casing with the host filesystem: directories
    /// first, then files, so that the file pass sees post-rename directory
    /// paths.
    pub fn reconcile(&mut self, options: OptionFlags) -> anyhow::Result<()> {
        self.index().rehydrate()?;

        let scan = self.workspace().host_directories();
        self.report_warnings(&scan.warnings)?;
        let mut host_directories = scan.paths;

        if options.processes_directories() {
            let tracked = self.index().tracked_paths();
            let plan = plan_directory_casing(&tracked, &host_directories, self.path());
            self.report_warnings(&plan.warnings)?;

            // host renames move the directories themselves; index rewrites
            // move the tracked file paths
            let mapping = if options.renames_host() {
                &plan.directories
            } else {
                &plan.mapping
            };
            self.apply(mapping, options)?;

            // directory renames on disk invalidate the scanned paths
            if options.renames_host() && !options.is_dry_run() && !mapping.is_empty() {
                let rescan = self.workspace().host_directories();
                self.report_warnings(&rescan.warnings)?;
                host_directories = rescan.paths;
            }
        }

        if options.processes_files() {
            let scan = self.workspace().host_files(&host_directories);
            self.report_warnings(&scan.warnings)?;

            let tracked = self.index().tracked_paths();
            let mapping = plan_file_casing(&tracked, &scan.paths, self.path());
            self.apply(&mapping, options)?;
        }

        Ok(())
    }

    fn apply(&self, mapping: &RenameMapping, options: OptionFlags) -> anyhow::Result<()> {
        if mapping.is_empty() {
            return Ok(());
        }

        if options.is_dry_run() {
            for (source, destination) in mapping.iter() {
                writeln!(
                    self.writer(),
                    "proposed rename: {} -> {}",
                    source.display(),
                    destination.display()
                )?;
            }
            return Ok(());
        }

        if options.renames_host() {
            self.rename_host_entries(mapping)
        } else {
            self.rewrite_index_entries(mapping)
        }
    }

    /// All stale paths are removed before any corrected path is added: the
    /// index rejects an addition that collides with a stale entry sharing a
    /// directory segment.
    fn rewrite_index_entries(&self, mapping: &RenameMapping) -> anyhow::Result<()> {
        let mut index = self.index();

        for (source, destination) in mapping.iter() {
            let stale = self.index_relative(source)?;
            if let Err(err) = index.remove(&stale) {
                self.report_entry_error(source, destination, &err)?;
            }
        }

        for (source, destination) in mapping.iter() {
            let corrected = self.index_relative(destination)?;
            match index.add(&corrected) {
                Ok(()) => writeln!(
                    self.writer(),
                    "renaming: {} -> {}",
                    source.display(),
                    destination.display()
                )?,
                Err(err) => self.report_entry_error(source, destination, &err)?,
            }
        }

        index.write_updates()
    }

    /// The host filesystem is renamed to match the index, so each mapping
    /// entry is applied in the reverse direction, segment by segment when the
    /// parents still carry the stale casing. A failed on-disk rename aborts
    /// the run; the state it reported would otherwise be wrong.
    fn rename_host_entries(&self, mapping: &RenameMapping) -> anyhow::Result<()> {
        for (source, destination) in mapping.iter() {
            self.workspace().align_casing(destination, source)?;
            writeln!(
                self.writer(),
                "renaming: {} -> {}",
                destination.display(),
                source.display()
            )?;
        }

        Ok(())
    }

    fn index_relative(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let relative = path
            .strip_prefix(self.path())
            .with_context(|| format!("path {} is outside the repository", path.display()))?;

        Ok(to_index_separators(&relative.to_string_lossy()))
    }

    fn report_warnings(&self, warnings: &[String]) -> anyhow::Result<()> {
        for warning in warnings {
            writeln!(self.writer(), "{}: {}", "warning".yellow(), warning)?;
        }

        Ok(())
    }

    fn report_entry_error(
        &self,
        source: &Path,
        destination: &Path,
        err: &anyhow::Error,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} changing: {} -> {} [{}]",
            "error".red(),
            source.display(),
            destination.display(),
            err
        )?;

        Ok(())
    }
}
