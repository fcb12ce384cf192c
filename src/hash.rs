//! Seedable hash family used for bucketing and slot placement.
//!
//! All variants run the same FNV-1a-style accumulator over the key elements
//! and mask the result to 31 bits. A seed of zero or below selects the fixed
//! offset basis; a positive seed replaces it so that each bucket can retry
//! placement under a different function. Every specialized form
//! ([`hash_pair`], [`hash_triple`], [`hash_packed`], [`hash_str`]) is
//! numerically identical to [`hash_u32s`] over the same logical element
//! sequence, which is what lets callers mix the packed and unpacked query
//! paths on one structure.

/// Accumulator start value when no positive seed is given (FNV-1a offset basis).
pub const OFFSET_BASIS: u32 = 0x811C_9DC5;

/// Multiplier applied after each element xor (FNV prime).
pub const PRIME: u32 = 16_777_619;

/// Seed value selecting the seed-independent fingerprint hash.
pub const FINGERPRINT_SEED: i32 = -1;

/// Number of bits each element occupies in the packed 64-bit key encoding.
pub const PACKED_ELEMENT_BITS: u32 = 21;

const MASK_31: u32 = 0x7FFF_FFFF;
const PACKED_ELEMENT_MASK: u64 = (1 << PACKED_ELEMENT_BITS) - 1;

#[inline]
fn init(seed: i32) -> u32 {
    if seed <= 0 {
        OFFSET_BASIS
    } else {
        seed as u32
    }
}

#[inline]
fn mix(acc: u32, element: u32) -> u32 {
    (acc ^ element).wrapping_mul(PRIME)
}

/// Hashes a key given as a sequence of 32-bit integers.
#[inline]
pub fn hash_u32s(key: &[u32], seed: i32) -> u32 {
    let mut acc = init(seed);
    for &element in key {
        acc = mix(acc, element);
    }
    acc & MASK_31
}

/// Hashes a key given as a raw byte sequence, one element per byte.
#[inline]
pub fn hash_bytes(key: &[u8], seed: i32) -> u32 {
    let mut acc = init(seed);
    for &byte in key {
        acc = mix(acc, byte as u32);
    }
    acc & MASK_31
}

/// Hashes a key given as text, one element per character code.
#[inline]
pub fn hash_str(key: &str, seed: i32) -> u32 {
    let mut acc = init(seed);
    for ch in key.chars() {
        acc = mix(acc, ch as u32);
    }
    acc & MASK_31
}

/// Bigram fast path, identical to `hash_u32s(&[a, b], seed)`.
#[inline]
pub fn hash_pair(a: u32, b: u32, seed: i32) -> u32 {
    mix(mix(init(seed), a), b) & MASK_31
}

/// Trigram fast path, identical to `hash_u32s(&[a, b, c], seed)`.
#[inline]
pub fn hash_triple(a: u32, b: u32, c: u32, seed: i32) -> u32 {
    mix(mix(mix(init(seed), a), b), c) & MASK_31
}

/// Hashes a key already packed into one 64-bit value, 21 bits per element,
/// element 0 in the low bits. Identical to [`hash_u32s`] over the unpacked
/// elements as long as each element fits in 21 bits.
#[inline]
pub fn hash_packed(packed: u64, order: usize, seed: i32) -> u32 {
    debug_assert!(order <= 3, "packed encoding holds at most 3 elements");
    let mut acc = init(seed);
    for i in 0..order {
        let element = ((packed >> (PACKED_ELEMENT_BITS * i as u32)) & PACKED_ELEMENT_MASK) as u32;
        acc = mix(acc, element);
    }
    acc & MASK_31
}
