use crate::domain::objects::object_id::ObjectId;
use crate::domain::objects::pack::{Packable, Unpackable};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;
use std::path::PathBuf;

pub const ENTRY_BLOCK: usize = 8;
pub const ENTRY_MIN_SIZE: usize = 64; // Minimum size of an index entry in bytes
const ENTRY_FIXED_SIZE: usize = 62;
const NAME_LENGTH_MASK: u16 = 0xFFF;

/// A tracked file exactly as stored in the git index: its `/`-separated path
/// plus the stat payload git recorded for it. The reconciler never interprets
/// the payload; it survives a rename untouched while only the path and the
/// name-length bits of `flags` change.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub path: PathBuf,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    pub flags: u16,
}

impl IndexEntry {
    /// The same entry stored under a different path: the name-length flag
    /// bits are recomputed, every other flag bit is preserved.
    pub fn with_path(&self, path: PathBuf) -> Self {
        let name_length = path.as_os_str().len().min(NAME_LENGTH_MASK as usize) as u16;
        let flags = (self.metadata.flags & !NAME_LENGTH_MASK) | name_length;

        IndexEntry {
            path,
            oid: self.oid.clone(),
            metadata: EntryMetadata {
                flags,
                ..self.metadata.clone()
            },
        }
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let entry_path = self
            .path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid entry path"))?;

        let mut entry_bytes = Vec::new();
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ctime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mtime_nsec)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.dev)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.ino)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.mode)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.uid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.gid)?;
        entry_bytes.write_u32::<byteorder::NetworkEndian>(self.metadata.size)?;
        self.oid.write_raw_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.metadata.flags)?;
        entry_bytes.write_all(entry_path.as_bytes())?;

        // Pad with null bytes to ENTRY_BLOCK size, at least one terminator
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(anyhow::anyhow!("Invalid index entry size"));
        }

        let ctime = byteorder::NetworkEndian::read_u32(&bytes[0..4]);
        let ctime_nsec = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let mtime = byteorder::NetworkEndian::read_u32(&bytes[8..12]);
        let mtime_nsec = byteorder::NetworkEndian::read_u32(&bytes[12..16]);
        let dev = byteorder::NetworkEndian::read_u32(&bytes[16..20]);
        let ino = byteorder::NetworkEndian::read_u32(&bytes[20..24]);
        let mode = byteorder::NetworkEndian::read_u32(&bytes[24..28]);
        let uid = byteorder::NetworkEndian::read_u32(&bytes[28..32]);
        let gid = byteorder::NetworkEndian::read_u32(&bytes[32..36]);
        let size = byteorder::NetworkEndian::read_u32(&bytes[36..40]);
        let mut oid_bytes = &bytes[40..60];
        let oid = ObjectId::read_raw_from(&mut oid_bytes)?;
        let flags = byteorder::NetworkEndian::read_u16(&bytes[60..62]);

        let name_length = (flags & NAME_LENGTH_MASK) as usize;
        let name_bytes = if name_length < NAME_LENGTH_MASK as usize {
            bytes
                .get(ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + name_length)
                .ok_or_else(|| anyhow::anyhow!("Entry name exceeds the entry size"))?
        } else {
            // Overlong path, the length bits are saturated; scan for the
            // null terminator instead
            let name_end = bytes[ENTRY_FIXED_SIZE..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| anyhow::anyhow!("Missing null terminator in entry name"))?;
            &bytes[ENTRY_FIXED_SIZE..ENTRY_FIXED_SIZE + name_end]
        };

        let path = PathBuf::from(
            std::str::from_utf8(name_bytes)
                .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in entry name"))?,
        );

        Ok(IndexEntry {
            path,
            oid,
            metadata: EntryMetadata {
                ctime,
                ctime_nsec,
                mtime,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
                flags,
            },
        })
    }
}
