#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use unite::domain::areas::index::Index;
use unite::domain::objects::index_entry::{EntryMetadata, IndexEntry};
use unite::domain::objects::object_id::ObjectId;

pub fn run_unite_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("unite").expect("Failed to find unite binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Creates a repository whose on-disk casing (`host_path`) drifted from the
/// casing recorded in the index (`index_path`).
pub fn seed_repository(root: &Path, entries: &[(&str, &str)]) {
    std::fs::create_dir_all(root.join(".git")).expect("Failed to create .git directory");

    let mut index = Index::new(root.join(".git").join("index").into_boxed_path());

    for (index_path, host_path) in entries {
        let host_file = root.join(host_path);
        if let Some(parent) = host_file.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create directory {parent:?}: {e}"));
        }
        std::fs::write(&host_file, index_path)
            .unwrap_or_else(|e| panic!("Failed to write file {host_file:?}: {e}"));

        index.track(IndexEntry::new(
            PathBuf::from(index_path),
            ObjectId::default(),
            entry_metadata(index_path),
        ));
    }

    index
        .write_updates()
        .expect("Failed to write the seeded index");
}

fn entry_metadata(path: &str) -> EntryMetadata {
    EntryMetadata {
        mode: 0o100644,
        size: path.len() as u32,
        flags: path.len().min(0xFFF) as u16,
        ..Default::default()
    }
}

pub fn tracked_paths(root: &Path) -> Vec<String> {
    let mut index = Index::new(root.join(".git").join("index").into_boxed_path());
    index.rehydrate().expect("Failed to read the index back");

    index
        .tracked_paths()
        .iter()
        .map(|path| path.to_string_lossy().into_owned())
        .collect()
}

pub fn index_bytes(root: &Path) -> Vec<u8> {
    std::fs::read(root.join(".git").join("index")).expect("Failed to read the index file")
}
