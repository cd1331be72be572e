//! Word-aligned storage for symbol images.
//!
//! Word-access targets load the image one aligned 32-bit word at a time. The
//! buffer must therefore start on a word boundary, which `Vec<u8>` does not
//! promise. The tail of the last word is zero-filled.

use std::ops::Deref;

use crate::constants::WORD_SIZE;

/// One aligned flash word.
#[repr(C, align(4))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Word(pub(crate) [u8; WORD_SIZE]);

const _: () = assert!(std::mem::size_of::<Word>() == WORD_SIZE);

/// Immutable word-aligned byte storage.
#[derive(Clone)]
pub struct AlignedVec {
    words: Vec<Word>,
    len: usize,
}

impl AlignedVec {
    /// Copy bytes into aligned storage.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        let mut words = vec![Word([0; WORD_SIZE]); bytes.len().div_ceil(WORD_SIZE)];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks(WORD_SIZE)) {
            word.0[..chunk.len()].copy_from_slice(chunk);
        }
        Self {
            words,
            len: bytes.len(),
        }
    }

    /// Read a file into aligned storage.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::copy_from_slice(&bytes))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn as_slice(&self) -> &[u8] {
        assert!(
            self.len <= self.words.len() * WORD_SIZE,
            "AlignedVec invariant violated: len {} exceeds capacity {}",
            self.len,
            self.words.len() * WORD_SIZE
        );
        if self.words.is_empty() {
            return &[];
        }
        // SAFETY: Word is repr(C) around [u8; 4], so the word buffer is a
        // contiguous run of initialized bytes; only `len` of them are exposed.
        unsafe { std::slice::from_raw_parts(self.words.as_ptr() as *const u8, self.len) }
    }
}

impl Deref for AlignedVec {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for AlignedVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedVec")
            .field("len", &self.len)
            .field("words", &self.words.len())
            .finish()
    }
}
