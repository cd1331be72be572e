//! Index newtypes.

use std::fmt;

/// Index of a symbol table inside a symbol image.
///
/// This is the whole state carried by a native object: the table it was
/// created from.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct TableIndex(pub u16);

impl TableIndex {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index into the host's native function table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct FunctionId(pub u32);

impl FunctionId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

/// Handle to a heap object: slot index plus the slot's generation at
/// allocation time. A handle outlives its object only as a stale value that
/// every heap query rejects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        debug_assert!(generation != 0, "generation 0 is reserved for packing");
        Self { index, generation }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a single word. Never zero, so `0` can mean "no object" in
    /// atomic slots.
    #[inline]
    pub fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | self.index as u64
    }

    #[inline]
    pub fn from_bits(bits: u64) -> Option<Self> {
        let generation = (bits >> 32) as u32;
        if generation == 0 {
            return None;
        }
        Some(Self {
            index: bits as u32,
            generation,
        })
    }
}

/// Opaque identifier of a character source (serial port, USB, radio link).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct EventChannel(pub u8);
