//! Image format constants.

/// Magic bytes identifying a tern symbol image.
pub const MAGIC: [u8; 4] = *b"TRNS";

/// Current image format version.
pub const VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Width of one flash word. Images are padded to a multiple of this.
pub const WORD_SIZE: usize = 4;

/// Size of one table directory record.
pub const TABLE_DIR_SIZE: usize = 12;

/// Size of one symbol entry. Even, so entries never straddle a half-word.
pub const ENTRY_SIZE: usize = 8;

/// Symbol count is stored in one byte.
pub const MAX_SYMBOLS_PER_TABLE: usize = u8::MAX as usize;

/// Declared parameters per native function. Longer signatures take an
/// argument array.
pub const MAX_PARAMS: usize = 3;

const _: () = assert!(HEADER_SIZE % WORD_SIZE == 0);
const _: () = assert!(TABLE_DIR_SIZE % WORD_SIZE == 0);
const _: () = assert!(ENTRY_SIZE % WORD_SIZE == 0);
