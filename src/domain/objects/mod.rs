pub mod checksum;
pub mod index_entry;
pub mod index_header;
pub mod object_id;
pub mod pack;

pub const SIGNATURE: &str = "DIRC";
pub const VERSION: u32 = 2;
pub const HEADER_SIZE: usize = 12;
pub const CHECKSUM_SIZE: usize = 20;
