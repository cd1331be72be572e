//! Symbol image format and lookup for tern built-ins.
//!
//! A symbol image holds every built-in symbol table of one build: a table
//! directory, fixed-size entries sorted by name, and a shared blob of
//! NUL-terminated names. Images are meant to live in flash; every read goes
//! through a [`FlashRead`] backend so the same lookup code works on targets
//! that only allow aligned word loads.

mod aligned_vec;
mod arg_spec;
mod builder;
mod constants;
mod dump;
mod header;
mod image;
mod reader;
mod search;
mod verify;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod search_tests;

pub use aligned_vec::AlignedVec;
pub use arg_spec::{ArgSpec, ArgType, CallKind};
pub use builder::{BuildError, ImageBuilder};
pub use constants::{
    ENTRY_SIZE, HEADER_SIZE, MAGIC, MAX_PARAMS, MAX_SYMBOLS_PER_TABLE, TABLE_DIR_SIZE, VERSION,
    WORD_SIZE,
};
pub use dump::{dump, width_for_count};
pub use header::{Header, SectionOffsets};
pub use image::{ImageError, SymbolEntry, SymbolImage, SymbolTable, Tables};
pub use reader::{DirectReader, FlashRead, TargetReader, WordReader, compare_cstr, read_cstr};
pub use search::binary_search;
pub use verify::{VerifyError, verify};
