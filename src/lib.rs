//! # ngram-mphf
//!
//! Minimal perfect hash functions for large n-gram vocabularies: given N
//! unique keys, construction produces a function mapping each key to a
//! distinct integer in `[0, N)` with no collisions and no wasted slots,
//! using a few bytes of auxiliary memory per key.
//!
//! Two structures are provided:
//!
//! - [`MultiLevelMphf`] — the in-memory bucket-displacement MPHF. Keys are
//!   bucketed by fingerprint and each bucket searches for a placement seed;
//!   keys that resist placement are deferred to further levels until every
//!   key has a slot, so construction always terminates with a valid MPHF.
//! - [`LargeNgramMphf`] — a sharding layer for key files too large to
//!   process in one pass: keys are routed to pages by fingerprint, one
//!   `MultiLevelMphf` is built per page, and stored offsets compose the
//!   per-page ids into one global dense range.
//!
//! Both are pure build-then-query values: immutable after construction and
//! safe for unbounded concurrent readers. Querying a key that was not part
//! of the build set returns an arbitrary id; callers needing membership must
//! check it separately.
//!
//! ```
//! use ngram_mphf::MultiLevelMphf;
//!
//! let keys: Vec<Vec<u32>> = vec![vec![1, 2], vec![3, 4], vec![5, 6]];
//! let mphf = MultiLevelMphf::from_keys(&keys).unwrap();
//! let mut ids: Vec<usize> = keys.iter().map(|k| mphf.get(k).unwrap()).collect();
//! ids.sort();
//! assert_eq!(ids, vec![0, 1, 2]);
//! ```

pub mod hash;
mod keys;
mod mphf;
mod sharded;

pub use keys::{ByteKeys, FlatKeys, KeyProvider, StrKeys};
pub use mphf::{MphfError, MultiLevelMphf, DEFAULT_KEYS_PER_BUCKET};
pub use sharded::LargeNgramMphf;
