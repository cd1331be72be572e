//! Flash read backends.
//!
//! Some flash controllers fault on unaligned or sub-word loads. Image access
//! therefore goes through [`FlashRead`]: [`DirectReader`] reads bytes
//! directly, [`WordReader`] loads the containing aligned word and shifts.
//! Both return zero past the end of the image, which also terminates any
//! string comparison that runs off a corrupt blob.
//!
//! The backend used by the runtime is picked once per build through
//! [`TargetReader`] (`word-access` feature).

use std::cmp::Ordering;

use crate::aligned_vec::{AlignedVec, Word};
use crate::constants::WORD_SIZE;

/// Little-endian reads at byte offsets into an image.
pub trait FlashRead: Copy {
    /// Image length in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_u8(&self, offset: usize) -> u8;

    fn read_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.read_u8(offset), self.read_u8(offset + 1)])
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.read_u8(offset),
            self.read_u8(offset + 1),
            self.read_u8(offset + 2),
            self.read_u8(offset + 3),
        ])
    }
}

/// Byte-addressable backend.
#[derive(Clone, Copy, Debug)]
pub struct DirectReader<'a> {
    bytes: &'a [u8],
}

impl<'a> DirectReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl<'a> From<&'a AlignedVec> for DirectReader<'a> {
    fn from(storage: &'a AlignedVec) -> Self {
        Self::new(storage.as_slice())
    }
}

impl FlashRead for DirectReader<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    fn read_u8(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0)
    }
}

/// Aligned 32-bit load backend.
#[derive(Clone, Copy, Debug)]
pub struct WordReader<'a> {
    words: &'a [Word],
    len: usize,
}

impl<'a> WordReader<'a> {
    pub fn new(storage: &'a AlignedVec) -> Self {
        Self {
            words: storage.words(),
            len: storage.len(),
        }
    }

    /// Load the aligned word with the given index.
    #[inline]
    fn word(&self, index: usize) -> u32 {
        self.words
            .get(index)
            .map(|w| u32::from_le_bytes(w.0))
            .unwrap_or(0)
    }
}

impl<'a> From<&'a AlignedVec> for WordReader<'a> {
    fn from(storage: &'a AlignedVec) -> Self {
        Self::new(storage)
    }
}

impl FlashRead for WordReader<'_> {
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn read_u8(&self, offset: usize) -> u8 {
        if offset >= self.len {
            return 0;
        }
        let shift = (offset % WORD_SIZE) * 8;
        (self.word(offset / WORD_SIZE) >> shift) as u8
    }

    fn read_u16(&self, offset: usize) -> u16 {
        if offset % 2 != 0 || offset + 2 > self.len {
            return u16::from_le_bytes([self.read_u8(offset), self.read_u8(offset + 1)]);
        }
        let shift = (offset % WORD_SIZE) * 8;
        (self.word(offset / WORD_SIZE) >> shift) as u16
    }

    fn read_u32(&self, offset: usize) -> u32 {
        if offset % WORD_SIZE != 0 || offset + WORD_SIZE > self.len {
            return u32::from_le_bytes([
                self.read_u8(offset),
                self.read_u8(offset + 1),
                self.read_u8(offset + 2),
                self.read_u8(offset + 3),
            ]);
        }
        self.word(offset / WORD_SIZE)
    }
}

#[cfg(feature = "word-access")]
pub type TargetReader<'a> = WordReader<'a>;

#[cfg(not(feature = "word-access"))]
pub type TargetReader<'a> = DirectReader<'a>;

/// Compare the NUL-terminated string at `offset` against `needle`, byte by
/// byte. Returns the ordering of the stored string relative to `needle`.
///
/// A needle containing NUL never compares equal.
pub fn compare_cstr<R: FlashRead>(reader: R, offset: usize, needle: &[u8]) -> Ordering {
    for (i, &n) in needle.iter().enumerate() {
        let s = reader.read_u8(offset + i);
        if s == 0 {
            return Ordering::Less;
        }
        if s != n {
            return s.cmp(&n);
        }
    }
    if reader.read_u8(offset + needle.len()) == 0 {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

/// Copy the NUL-terminated string at `offset` out of the image.
pub fn read_cstr<R: FlashRead>(reader: R, offset: usize) -> String {
    let mut bytes = Vec::new();
    let mut at = offset;
    while at < reader.len() {
        let b = reader.read_u8(at);
        if b == 0 {
            break;
        }
        bytes.push(b);
        at += 1;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
