//! # Sharded MPHF for oversized key files
//!
//! [`LargeNgramMphf`] builds an MPHF over key sets too large to bucket in
//! memory at once. The key file is streamed once and every key is routed to
//! a page by the high bits of its masked fingerprint; each page's keys are
//! spilled to a shard file, a [`MultiLevelMphf`] is built per page, and
//! cumulative page sizes become the offsets that turn disjoint per-page id
//! ranges into one global minimal perfect mapping. Pages have no cross-page
//! dependency, so per-page builds could run in parallel; this implementation
//! builds them sequentially and only the offset accumulation is ordered.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::hash::{hash_packed, hash_u32s, FINGERPRINT_SEED};
use crate::keys::{read_u32, FlatKeys};
use crate::mphf::{MphfError, MultiLevelMphf};

/// An MPHF over a paged key file: one [`MultiLevelMphf`] per page plus the
/// offsets composing per-page ids into a single dense range `[0, size())`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LargeNgramMphf {
    max_bit_mask: u32,
    bucket_mask: u32,
    page_shift: u32,
    pages: Vec<MultiLevelMphf>,
    offsets: Vec<u32>,
}

impl LargeNgramMphf {
    /// Builds a sharded MPHF from a binary key file (`order:u32, count:u32,
    /// count × order u32`, little-endian). `chunk_bits` bounds the per-page
    /// key count at roughly `2^chunk_bits`; shard files go into a temporary
    /// directory that is removed when construction finishes.
    pub fn generate<P: AsRef<Path>>(key_file: P, chunk_bits: u32) -> Result<Self, MphfError> {
        let mut reader = BufReader::new(File::open(key_file)?);
        let order = read_u32(&mut reader)? as usize;
        let count = read_u32(&mut reader)? as usize;
        if order == 0 {
            return Err(MphfError::Deserialization("key file with zero order".into()));
        }

        let max_bit = max_bit_for(count);
        let page_bit = chunk_bits.min(max_bit);
        let page_shift = page_bit;
        let page_count = 1usize << (max_bit - page_bit);
        let bucket_mask = page_bit.saturating_sub(2).max(1);
        let max_bit_mask = ((1u64 << max_bit) - 1) as u32;
        debug!("sharding {count} keys of order {order} into {page_count} page(s)");

        let page_keys = if page_count == 1 {
            vec![read_flat_values(&mut reader, order, count)?]
        } else {
            shard_to_pages(&mut reader, order, count, page_count, max_bit_mask, page_shift)?
        };

        let mut pages = Vec::with_capacity(page_count);
        let mut offsets = Vec::with_capacity(page_count);
        let mut offset = 0u32;
        for (index, keys) in page_keys.into_iter().enumerate() {
            let page = MultiLevelMphf::from_keys(&keys)?;
            debug!("page {index}: {} keys, {} level(s)", page.size(), page.level_count());
            offsets.push(offset);
            offset += page.size() as u32;
            pages.push(page);
        }

        Ok(LargeNgramMphf { max_bit_mask, bucket_mask, page_shift, pages, offsets })
    }

    /// Total number of keys across all pages.
    pub fn size(&self) -> usize {
        match (self.offsets.last(), self.pages.last()) {
            (Some(&offset), Some(page)) => offset as usize + page.size(),
            _ => 0,
        }
    }

    /// Per-page structures, in page order.
    pub fn pages(&self) -> &[MultiLevelMphf] {
        &self.pages
    }

    /// Cumulative key counts of the preceding pages; `offsets()[0] == 0`.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Returns the global id of an integer-sequence key.
    #[inline]
    pub fn get(&self, key: &[u32]) -> Result<usize, MphfError> {
        let fingerprint = hash_u32s(key, FINGERPRINT_SEED);
        let page = self.page_of(fingerprint)?;
        let local = self.pages[page].get_with_fingerprint(key, fingerprint)?;
        Ok(self.offsets[page] as usize + local)
    }

    /// Returns the global id of a key packed 21 bits per element.
    #[inline]
    pub fn get_packed(&self, packed: u64, order: usize) -> Result<usize, MphfError> {
        let fingerprint = hash_packed(packed, order, FINGERPRINT_SEED);
        let page = self.page_of(fingerprint)?;
        let local = self.pages[page].get_inner(fingerprint, |seed| hash_packed(packed, order, seed))?;
        Ok(self.offsets[page] as usize + local)
    }

    // Page routing uses the masked fingerprint; the page itself keeps the
    // unmasked value, matching how its buckets were assigned during the build.
    #[inline]
    fn page_of(&self, fingerprint: u32) -> Result<usize, MphfError> {
        let page = ((fingerprint & self.max_bit_mask) >> self.page_shift) as usize;
        if page >= self.pages.len() {
            return Err(MphfError::InvariantViolation);
        }
        Ok(page)
    }

    /// Serialized footprint in bytes.
    pub fn serialized_size(&self) -> usize {
        16 + 4 * self.offsets.len()
            + self.pages.iter().map(MultiLevelMphf::serialized_size).sum::<usize>()
    }

    /// Writes the structure in its fixed little-endian wire format:
    /// the three routing integers, the page count, the offsets, then the
    /// serialized pages in page order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), MphfError> {
        writer.write_all(&self.max_bit_mask.to_le_bytes())?;
        writer.write_all(&self.bucket_mask.to_le_bytes())?;
        writer.write_all(&self.page_shift.to_le_bytes())?;
        writer.write_all(&(self.pages.len() as u32).to_le_bytes())?;
        for &offset in &self.offsets {
            writer.write_all(&offset.to_le_bytes())?;
        }
        for page in &self.pages {
            page.write_to(writer)?;
        }
        Ok(())
    }

    /// Reads a structure previously written by [`write_to`](Self::write_to),
    /// rejecting truncated input and inconsistent offsets.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, MphfError> {
        let max_bit_mask = read_u32(reader)?;
        let bucket_mask = read_u32(reader)?;
        let page_shift = read_u32(reader)?;
        let page_count = read_u32(reader)? as usize;
        if page_count == 0 {
            return Err(MphfError::Deserialization("zero pages".into()));
        }
        let mut offsets = Vec::with_capacity(page_count);
        for _ in 0..page_count {
            offsets.push(read_u32(reader)?);
        }
        let mut pages: Vec<MultiLevelMphf> = Vec::with_capacity(page_count);
        for index in 0..page_count {
            let page = MultiLevelMphf::read_from(reader)?;
            let expected = if index == 0 {
                0
            } else {
                offsets[index - 1] + pages[index - 1].size() as u32
            };
            if offsets[index] != expected {
                return Err(MphfError::Deserialization(format!(
                    "page {index} offset {} does not match cumulative size {expected}",
                    offsets[index]
                )));
            }
            pages.push(page);
        }
        Ok(LargeNgramMphf { max_bit_mask, bucket_mask, page_shift, pages, offsets })
    }

    /// Reads a structure stored at byte `offset` inside a larger stream.
    pub fn read_at<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<Self, MphfError> {
        reader.seek(SeekFrom::Start(offset))?;
        Self::read_from(reader)
    }
}

/// Smallest `x >= 1` with `2^(x-1) < count <= 2^x`.
fn max_bit_for(count: usize) -> u32 {
    if count <= 2 {
        1
    } else {
        usize::BITS - (count - 1).leading_zeros()
    }
}

/// Reads `count` keys straight into one in-memory page.
fn read_flat_values<R: Read>(
    reader: &mut R,
    order: usize,
    count: usize,
) -> Result<FlatKeys, MphfError> {
    let mut values = vec![0u32; order * count];
    let mut buf = [0u8; 4];
    for value in &mut values {
        reader.read_exact(&mut buf).map_err(|e| MphfError::from_read(e, "key file values"))?;
        *value = u32::from_le_bytes(buf);
    }
    Ok(FlatKeys::new(order, values))
}

/// Streams the key file once, appending each key's elements to the shard
/// file of the page its masked fingerprint routes to.
fn shard_to_pages<R: Read>(
    reader: &mut R,
    order: usize,
    count: usize,
    page_count: usize,
    max_bit_mask: u32,
    page_shift: u32,
) -> Result<Vec<FlatKeys>, MphfError> {
    let shard_dir = tempfile::tempdir()?;
    let mut writers = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let file = File::create(shard_dir.path().join(format!("shard-{page}")))?;
        writers.push(BufWriter::new(file));
    }

    let mut key = vec![0u32; order];
    let mut buf = [0u8; 4];
    let mut page_counts = vec![0usize; page_count];
    for _ in 0..count {
        for element in &mut key {
            reader.read_exact(&mut buf).map_err(|e| MphfError::from_read(e, "key file values"))?;
            *element = u32::from_le_bytes(buf);
        }
        let fingerprint = hash_u32s(&key, FINGERPRINT_SEED);
        let page = ((fingerprint & max_bit_mask) >> page_shift) as usize;
        for &element in &key {
            writers[page].write_all(&element.to_le_bytes())?;
        }
        page_counts[page] += 1;
    }
    for writer in &mut writers {
        writer.flush()?;
    }
    drop(writers);

    let mut page_keys = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let mut reader = BufReader::new(File::open(shard_dir.path().join(format!("shard-{page}")))?);
        page_keys.push(read_flat_values(&mut reader, order, page_counts[page])?);
    }
    Ok(page_keys)
}
