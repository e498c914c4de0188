use anyhow::Result;
use bytes::Bytes;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(bytes: Bytes) -> Result<Self>
    where
        Self: Sized;
}
