use bitflags::bitflags;

bitflags! {
    /// Runtime option flags, composable along two independent axes: what gets
    /// mutated (the index, the host filesystem, or nothing on a dry run) and
    /// which entry categories are processed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OptionFlags: u8 {
        const DRY_RUN = 1;
        const DIRECTORIES = 1 << 1;
        const FILES = 1 << 2;
        const HOST_RENAME = 1 << 3;
    }
}

impl OptionFlags {
    /// Both categories are processed unless exactly one narrowing flag is
    /// given.
    pub fn from_cli(dry_run: bool, directories_only: bool, files_only: bool, host: bool) -> Self {
        let mut flags = OptionFlags::DIRECTORIES | OptionFlags::FILES;

        if directories_only && !files_only {
            flags.remove(OptionFlags::FILES);
        }
        if files_only && !directories_only {
            flags.remove(OptionFlags::DIRECTORIES);
        }
        if dry_run {
            flags.insert(OptionFlags::DRY_RUN);
        }
        if host {
            flags.insert(OptionFlags::HOST_RENAME);
        }

        flags
    }

    pub fn is_dry_run(&self) -> bool {
        self.contains(OptionFlags::DRY_RUN)
    }

    pub fn processes_directories(&self) -> bool {
        self.contains(OptionFlags::DIRECTORIES)
    }

    pub fn processes_files(&self) -> bool {
        self.contains(OptionFlags::FILES)
    }

    pub fn renames_host(&self) -> bool {
        self.contains(OptionFlags::HOST_RENAME)
    }
}
