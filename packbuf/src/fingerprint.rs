//! Integrity fingerprint
//!
//! A truncated, non-cryptographic checksum over the payload, stored
//! big-endian in the buffer's reserved prefix. It is a uniqueness-versus-size
//! tradeoff for catching transmission damage, nothing more: collision
//! probability is bounded below by 2^-width and an adversary can forge one
//! trivially.
//!
//! The fingerprint is written on demand by [`PackBuf::generate_fingerprint`]
//! and is never kept in sync automatically; any mutation afterwards leaves a
//! stale value in the prefix until it is regenerated.

use crate::buffer::PackBuf;

/// Width of the integrity fingerprint stored in a buffer's reserved prefix.
///
/// The numeric value of each variant is its prefix length in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FingerprintWidth {
    /// No fingerprint. `has_valid_fingerprint` is always true.
    #[default]
    None,
    /// One byte. Only 256 possible values; expect collisions.
    B8,
    /// Two bytes. 65535 possible values, not bad.
    B16,
    /// Four bytes. Generally good enough.
    B32,
    /// Eight bytes.
    B64,
}

impl FingerprintWidth {
    /// Number of prefix bytes the fingerprint occupies.
    pub const fn byte_len(self) -> usize {
        match self {
            Self::None => 0,
            Self::B8 => 1,
            Self::B16 => 2,
            Self::B32 => 4,
            Self::B64 => 8,
        }
    }

    /// Mask that truncates a full 64-bit hash to this width.
    pub const fn mask(self) -> u64 {
        match self {
            Self::None => 0,
            Self::B8 => u8::MAX as u64,
            Self::B16 => u16::MAX as u64,
            Self::B32 => u32::MAX as u64,
            Self::B64 => u64::MAX,
        }
    }
}

/// Hashes `data[offset..end]` and truncates the result to `width`.
///
/// The hash consumes 8-byte big-endian words with additive/shift/xor mixing
/// rounds, then folds any remainder bytes in through a shifted accumulator.
/// The word layout and round constants are part of the wire contract: two
/// implementations must agree byte for byte to validate each other's
/// prefixes.
pub fn hash_region(width: FingerprintWidth, data: &[u8], offset: usize, end: usize) -> u64 {
    if width == FingerprintWidth::None {
        return 0;
    }
    let end = end.min(data.len());
    let mut fingerprint = 0u64;
    let mut i = offset;
    while i + 8 <= end {
        let mut word = 0u64;
        for &b in &data[i..i + 8] {
            word = (word << 8) | b as u64;
        }
        fingerprint = fingerprint.wrapping_add(word << 3);
        fingerprint ^= fingerprint >> 3;
        fingerprint = fingerprint.wrapping_add(fingerprint << 15);
        i += 8;
    }
    // Fold the remainder through a shifted accumulator.
    let mut fold = 0u64;
    while i < end {
        fold = fold.wrapping_add(data[i] as u64) << 8;
        i += 1;
    }
    fingerprint ^= fold;
    fingerprint & width.mask()
}

impl PackBuf {
    /// Region the fingerprint covers: the payload, minus a fingerprint-width
    /// tail. The tail exclusion is part of the hash contract.
    fn hashed_region(&self) -> (usize, usize) {
        let prefix = self.fingerprint_len();
        (prefix, self.data.len().saturating_sub(prefix))
    }

    /// Computes the fingerprint over the payload and writes it big-endian
    /// into the reserved prefix. No-op when the width is `None`.
    ///
    /// The stored value goes stale the moment the buffer is mutated again;
    /// regenerate before transmitting.
    pub fn generate_fingerprint(&mut self) {
        let width = self.fingerprint_width();
        if width == FingerprintWidth::None || self.data.len() < width.byte_len() {
            return;
        }
        let (offset, end) = self.hashed_region();
        let mut value = hash_region(width, &self.data, offset, end);
        for i in (0..width.byte_len()).rev() {
            self.data[i] = (value & 0xFF) as u8;
            value >>= 8;
        }
    }

    /// Reads the fingerprint currently stored in the prefix. Does not
    /// recompute anything; a stale or tampered value is returned as-is.
    pub fn fingerprint(&self) -> u64 {
        let stored = self.fingerprint_len().min(self.data.len());
        let mut value = 0u64;
        for &b in &self.data[..stored] {
            value = (value << 8) | b as u64;
        }
        value
    }

    /// True when the stored fingerprint matches a fresh hash of the payload.
    /// Trivially true when the width is `None`.
    pub fn has_valid_fingerprint(&self) -> bool {
        let (offset, end) = self.hashed_region();
        self.fingerprint() == hash_region(self.fingerprint_width(), &self.data, offset, end)
    }
}
