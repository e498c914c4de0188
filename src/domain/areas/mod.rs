//! Core repository components
//!
//! - `index`: read/write view over the tracked paths in the git index file
//! - `repository`: high-level coordination, validation and output
//! - `workspace`: host filesystem enumeration and on-disk renames

pub mod index;
pub mod repository;
pub mod workspace;
