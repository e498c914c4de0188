use crate::domain::objects::checksum::Checksum;
use crate::domain::objects::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, IndexEntry};
use crate::domain::objects::index_header::IndexHeader;
use crate::domain::objects::pack::{Packable, Unpackable};
use crate::domain::objects::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::anyhow;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Read/write view over the set of tracked paths in the git index file.
///
/// Removals and additions are staged in memory and only become durable on
/// [`Index::write_updates`]. A removed entry is displaced rather than dropped:
/// it waits to be claimed by a matching addition, so a rename never
/// transiently loses a tracked file.
#[derive(Debug, Clone)]
pub struct Index {
    path: Box<Path>,
    entries: BTreeMap<PathBuf, IndexEntry>,
    displaced: Vec<IndexEntry>,
    header: IndexHeader,
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            displaced: Vec::new(),
            header: IndexHeader::new(String::from(SIGNATURE), VERSION, 0),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.displaced.clear();
        self.header = IndexHeader::empty();
        self.changed = false;
    }

    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        // a repository without an index file simply tracks nothing
        if !self.path().exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        // git may append extensions the reconciler has no use for
        reader.skip_remaining_and_verify()
    }

    fn parse_header(&self, reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(header_bytes)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(Bytes::from(entry_bytes))?;
            self.entries.insert(entry.path.clone(), entry);
        }

        self.header.entries_count = entries_count;

        Ok(())
    }

    /// Inserts a fresh entry, replacing any entry already stored under the
    /// same path.
    pub fn track(&mut self, entry: IndexEntry) {
        self.entries.insert(entry.path.clone(), entry);
        self.header.entries_count = self.entries.len() as u32;
        self.changed = true;
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Tracked paths in stored order, with the exact casing last written.
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    /// Stages the removal of a tracked path. The displaced entry is kept
    /// aside until [`Index::add`] claims it under a corrected path.
    pub fn remove(&mut self, path: &Path) -> anyhow::Result<()> {
        let entry = self
            .entries
            .remove(path)
            .ok_or_else(|| anyhow!("path is not tracked: {}", path.display()))?;

        self.displaced.push(entry);
        self.changed = true;

        Ok(())
    }

    /// Stages the addition of a corrected path, claiming the displaced entry
    /// whose old path matches it case-insensitively. An addition without a
    /// matching displaced entry is refused: claiming an unrelated entry would
    /// attach the wrong stat payload, and the unclaimed entry is restored on
    /// [`Index::write_updates`] anyway.
    pub fn add(&mut self, path: &Path) -> anyhow::Result<()> {
        let position = self
            .displaced
            .iter()
            .position(|entry| paths_match_ignoring_case(&entry.path, path))
            .ok_or_else(|| anyhow!("no displaced entry matches: {}", path.display()))?;

        let entry = self.displaced.remove(position).with_path(path.to_path_buf());
        self.entries.insert(entry.path.clone(), entry);
        self.changed = true;

        Ok(())
    }

    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        // a removal that was never matched by an addition is restored rather
        // than silently dropped from the index
        for entry in std::mem::take(&mut self.displaced) {
            self.entries.insert(entry.path.clone(), entry);
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        self.header = IndexHeader {
            entries_count: self.entries.len() as u32,
            ..self.header.clone()
        };
        let header_bytes = self.header.serialize()?;
        writer.write(&header_bytes)?;

        for entry in self.entries.values() {
            let entry_bytes = entry.serialize()?;
            writer.write(&entry_bytes)?;
        }

        writer.write_checksum()?;
        self.changed = false;

        Ok(())
    }
}

fn paths_match_ignoring_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
