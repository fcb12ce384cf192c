//! Key suppliers consumed by the level-building engine.
//!
//! The engine never compares keys for equality; it only needs a stable count
//! and the ability to hash the key at a given index under a chosen seed. A
//! [`KeyProvider`] therefore exposes exactly that, which lets integer-array,
//! string and byte-sequence encodings share one seam without forcing every
//! provider to materialize `&[u32]` slices. Keys must be unique and must be
//! supplied in a stable order across repeated calls within one build.

use std::io::{BufReader, Read, Write};

use crate::hash::{hash_bytes, hash_str, hash_u32s};
use crate::mphf::MphfError;

/// Source of keys for MPHF construction.
pub trait KeyProvider {
    /// Number of keys supplied. Must not change during a build.
    fn key_count(&self) -> usize;

    /// Hash of the key at `index` under `seed`. Must agree with the hash the
    /// caller will use for the same key at query time.
    fn hash_key(&self, index: usize, seed: i32) -> u32;
}

impl KeyProvider for Vec<Vec<u32>> {
    fn key_count(&self) -> usize {
        self.len()
    }

    fn hash_key(&self, index: usize, seed: i32) -> u32 {
        hash_u32s(&self[index], seed)
    }
}

/// Fixed-order integer-sequence keys held in one flat allocation, matching
/// the binary key-file layout (`order:u32, count:u32, count × order u32`).
#[derive(Debug, Clone)]
pub struct FlatKeys {
    order: usize,
    values: Vec<u32>,
}

impl FlatKeys {
    /// Wraps `values` as `values.len() / order` keys of `order` elements each.
    /// `values.len()` must be a multiple of `order`.
    pub fn new(order: usize, values: Vec<u32>) -> Self {
        assert!(order > 0, "key order must be positive");
        assert!(values.len() % order == 0, "value count must be a multiple of the key order");
        FlatKeys { order, values }
    }

    /// Reads keys in the binary key-file format, all integers little-endian.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MphfError> {
        let mut reader = BufReader::new(reader);
        let order = read_u32(&mut reader)? as usize;
        let count = read_u32(&mut reader)? as usize;
        if order == 0 {
            return Err(MphfError::Deserialization("key file with zero order".into()));
        }
        let mut values = vec![0u32; order * count];
        let mut buf = [0u8; 4];
        for value in &mut values {
            reader
                .read_exact(&mut buf)
                .map_err(|e| MphfError::from_read(e, "key file values"))?;
            *value = u32::from_le_bytes(buf);
        }
        Ok(FlatKeys { order, values })
    }

    /// Writes the keys in the binary key-file format.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), MphfError> {
        writer.write_all(&(self.order as u32).to_le_bytes())?;
        writer.write_all(&(self.key_count() as u32).to_le_bytes())?;
        for &value in &self.values {
            writer.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }

    /// Number of elements per key.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The key at `index` as an element slice.
    pub fn key(&self, index: usize) -> &[u32] {
        &self.values[index * self.order..(index + 1) * self.order]
    }
}

impl KeyProvider for FlatKeys {
    fn key_count(&self) -> usize {
        self.values.len() / self.order
    }

    fn hash_key(&self, index: usize, seed: i32) -> u32 {
        hash_u32s(self.key(index), seed)
    }
}

/// Text keys hashed per character code.
#[derive(Debug, Clone)]
pub struct StrKeys(pub Vec<String>);

impl KeyProvider for StrKeys {
    fn key_count(&self) -> usize {
        self.0.len()
    }

    fn hash_key(&self, index: usize, seed: i32) -> u32 {
        hash_str(&self.0[index], seed)
    }
}

/// Raw byte-sequence keys, one hash element per byte.
#[derive(Debug, Clone)]
pub struct ByteKeys(pub Vec<Vec<u8>>);

impl KeyProvider for ByteKeys {
    fn key_count(&self) -> usize {
        self.0.len()
    }

    fn hash_key(&self, index: usize, seed: i32) -> u32 {
        hash_bytes(&self.0[index], seed)
    }
}

pub(crate) fn read_u32<R: Read>(reader: &mut R) -> Result<u32, MphfError> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| MphfError::from_read(e, "fixed-width integer"))?;
    Ok(u32::from_le_bytes(buf))
}
