use std::fmt;
use std::io;

pub const OID_SIZE: usize = 20;

/// Raw 20-byte SHA-1 of the blob an index entry points at. The reconciler
/// carries it through a rename without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OID_SIZE]);

impl ObjectId {
    pub fn from_raw(bytes: [u8; OID_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_all(&self.0)?;
        Ok(())
    }

    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut bytes = [0u8; OID_SIZE];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
