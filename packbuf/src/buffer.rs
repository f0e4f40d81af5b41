//! Byte buffer and cursor
//!
//! [`PackBuf`] owns a fixed-size byte region and the sequential cursor every
//! codec reads and writes through. The first `fingerprint_len()` bytes are
//! reserved for the integrity fingerprint and are never touched by value
//! codecs; all payload indexing is relative to the end of that prefix.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::fingerprint::FingerprintWidth;

/// Fixed-capacity packing buffer with a sequential read/write cursor.
///
/// Capacity is fixed at construction; there is no resizing and no implicit
/// reallocation. A single cursor is shared between packing and unpacking, so
/// one buffer serves one logical message at a time.
#[derive(Debug, Clone)]
pub struct PackBuf {
    /// Backing storage: fingerprint prefix followed by the payload region.
    pub(crate) data: Vec<u8>,
    /// Next byte the buffer will read or write.
    pub(crate) cursor: usize,
    width: FingerprintWidth,
}

impl PackBuf {
    /// Creates a buffer holding at most `capacity` payload bytes, with no
    /// fingerprint. Capacity 0 is legal but unusable.
    pub fn new(capacity: usize) -> Self {
        Self::with_fingerprint(capacity, FingerprintWidth::None)
    }

    /// Creates a buffer holding at most `capacity` payload bytes plus a
    /// reserved fingerprint prefix. The backing allocation grows to
    /// accommodate the prefix, so `len()` still reports `capacity`.
    pub fn with_fingerprint(capacity: usize, width: FingerprintWidth) -> Self {
        let prefix = width.byte_len();
        Self {
            data: vec![0; capacity + prefix],
            cursor: prefix,
            width,
        }
    }

    /// Adapts an externally supplied byte region by copying it into a fresh
    /// allocation, leaving the source untouched. When `contains_fingerprint`
    /// is false and `width` is non-zero, the copy is placed after a zeroed
    /// fingerprint prefix.
    pub fn from_slice(bytes: &[u8], contains_fingerprint: bool, width: FingerprintWidth) -> Self {
        let prefix = width.byte_len();
        let data = if contains_fingerprint || prefix == 0 {
            bytes.to_vec()
        } else {
            let mut data = vec![0; bytes.len() + prefix];
            data[prefix..].copy_from_slice(bytes);
            data
        };
        Self {
            data,
            cursor: prefix,
            width,
        }
    }

    /// Adopts an externally supplied allocation without growing it. When
    /// fingerprint room must be made, bytes are shifted toward the tail in
    /// place and the trailing `width.byte_len()` bytes are lost. That loss
    /// is deliberate: the tradeoff for not reallocating.
    pub fn from_vec(bytes: Vec<u8>, contains_fingerprint: bool, width: FingerprintWidth) -> Self {
        let prefix = width.byte_len();
        let mut data = bytes;
        if !contains_fingerprint && prefix > 0 {
            let len = data.len();
            if len > prefix {
                data.copy_within(0..len - prefix, prefix);
            }
            let zeroed = prefix.min(len);
            data[..zeroed].fill(0);
        }
        Self {
            data,
            cursor: prefix,
            width,
        }
    }

    /// Payload capacity in bytes (backing size minus the fingerprint prefix).
    /// Saturates to 0 when an adopted region is shorter than the prefix it
    /// claims to contain.
    pub fn len(&self) -> usize {
        self.data.len().saturating_sub(self.width.byte_len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full backing bytes, fingerprint prefix included. This is the region
    /// to store or put on the wire.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Current cursor as an absolute offset into the backing bytes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn fingerprint_width(&self) -> FingerprintWidth {
        self.width
    }

    /// Length of the reserved fingerprint prefix in bytes.
    pub fn fingerprint_len(&self) -> usize {
        self.width.byte_len()
    }

    /// Rewinds the cursor to the start of the payload region.
    pub fn seek_to_start(&mut self) {
        self.cursor = self.width.byte_len();
    }

    /// Moves the cursor to a payload-relative index, clamped to the payload.
    pub fn seek_to(&mut self, index: usize) {
        let payload = self.len();
        let clamped = if payload == 0 {
            0
        } else {
            index.min(payload - 1)
        };
        self.cursor = self.width.byte_len() + clamped;
    }

    /// Adds `amount` to the cursor, unchecked. A cursor pushed out of range
    /// is only caught by the bounds check of the next codec call.
    pub fn advance(&mut self, amount: usize) {
        self.cursor = self.cursor.wrapping_add(amount);
    }

    /// Subtracts `amount` from the cursor, unchecked. See [`advance`].
    ///
    /// [`advance`]: PackBuf::advance
    pub fn reverse(&mut self, amount: usize) {
        self.cursor = self.cursor.wrapping_sub(amount);
    }

    /// Writes `word`'s low `n` bytes big-endian at the cursor, or does
    /// nothing when they don't fit.
    #[inline]
    pub(crate) fn put_be(&mut self, word: u64, n: usize) {
        let Some(end) = self.cursor.checked_add(n) else {
            return;
        };
        if end > self.data.len() {
            return;
        }
        for (i, slot) in self.data[self.cursor..end].iter_mut().enumerate() {
            *slot = (word >> (8 * (n - 1 - i))) as u8;
        }
        self.cursor = end;
    }

    /// Reads `n` bytes big-endian at the cursor, or `None` when fewer remain
    /// (cursor unchanged).
    #[inline]
    pub(crate) fn get_be(&mut self, n: usize) -> Option<u64> {
        let end = self.cursor.checked_add(n)?;
        if end > self.data.len() {
            return None;
        }
        let mut word = 0u64;
        for &b in &self.data[self.cursor..end] {
            word = (word << 8) | b as u64;
        }
        self.cursor = end;
        Some(word)
    }

    /// Writes `word`'s low `n` bytes little-endian at the cursor, or does
    /// nothing when they don't fit.
    #[inline]
    pub(crate) fn put_le(&mut self, word: u64, n: usize) {
        let Some(end) = self.cursor.checked_add(n) else {
            return;
        };
        if end > self.data.len() {
            return;
        }
        for (i, slot) in self.data[self.cursor..end].iter_mut().enumerate() {
            *slot = (word >> (8 * i)) as u8;
        }
        self.cursor = end;
    }

    /// Reads `n` bytes little-endian at the cursor, or `None` when fewer
    /// remain (cursor unchanged).
    #[inline]
    pub(crate) fn get_le(&mut self, n: usize) -> Option<u64> {
        let end = self.cursor.checked_add(n)?;
        if end > self.data.len() {
            return None;
        }
        let mut word = 0u64;
        for (i, &b) in self.data[self.cursor..end].iter().enumerate() {
            word |= (b as u64) << (8 * i);
        }
        self.cursor = end;
        Some(word)
    }
}

/// Payload-relative byte access (index 0 is the first byte after the
/// fingerprint prefix).
impl Index<usize> for PackBuf {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.data[self.width.byte_len() + index]
    }
}

impl IndexMut<usize> for PackBuf {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        let prefix = self.width.byte_len();
        &mut self.data[prefix + index]
    }
}

impl fmt::Display for PackBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            FingerprintWidth::None => writeln!(f, "#NONE# 0")?,
            FingerprintWidth::B8 => writeln!(f, "#B8  # {}", self.fingerprint())?,
            FingerprintWidth::B16 => writeln!(f, "#B16 # {}", self.fingerprint())?,
            FingerprintWidth::B32 => writeln!(f, "#B32 # {}", self.fingerprint())?,
            FingerprintWidth::B64 => writeln!(f, "#B64 # {}", self.fingerprint())?,
        }
        write!(f, "RAW BYTES:")?;
        for b in &self.data {
            write!(f, " {b:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_accounting() {
        let buf = PackBuf::with_fingerprint(32, FingerprintWidth::B16);
        assert_eq!(buf.len(), 32);
        assert_eq!(buf.data().len(), 34);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_from_slice_makes_room_for_fingerprint() {
        let src = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let buf = PackBuf::from_slice(&src, false, FingerprintWidth::B16);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf.data().len(), 12);
        assert_eq!(&buf.data()[2..], &src);
    }

    #[test]
    fn test_from_slice_adopts_existing_fingerprint() {
        let src = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let buf = PackBuf::from_slice(&src, true, FingerprintWidth::B16);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.data().len(), 10);
    }

    #[test]
    fn test_from_vec_shifts_in_place() {
        let src = vec![0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let buf = PackBuf::from_vec(src, false, FingerprintWidth::B16);
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.data().len(), 10);
        // Bytes moved down to make room; the tail two bytes are lost.
        assert_eq!(buf.data(), &[0, 0, 0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_seek_to_clamps_to_payload() {
        let mut buf = PackBuf::with_fingerprint(8, FingerprintWidth::B16);
        buf.seek_to(3);
        assert_eq!(buf.cursor(), 5);
        buf.seek_to(1000);
        assert_eq!(buf.cursor(), 2 + 7);
        buf.seek_to_start();
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn test_reverse_past_start_is_caught_by_bounds_checks() {
        let mut buf = PackBuf::new(4);
        buf.reverse(10);
        // Cursor is corrupt; the next pack is a silent no-op.
        buf.pack_u16(0xABCD);
        assert_eq!(buf.data(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_payload_indexing_skips_prefix() {
        let mut buf = PackBuf::with_fingerprint(4, FingerprintWidth::B32);
        buf[0] = 0xAA;
        assert_eq!(buf.data()[4], 0xAA);
        assert_eq!(buf[0], 0xAA);
    }

    #[test]
    fn test_display_dumps_fingerprint_and_bytes() {
        let mut buf = PackBuf::with_fingerprint(2, FingerprintWidth::B8);
        buf.pack_u8(0xFF);
        buf.generate_fingerprint();
        let text = format!("{buf}");
        assert!(text.starts_with("#B8  #"));
        assert!(text.contains("RAW BYTES:"));
        assert!(text.contains("FF"));
    }
}
