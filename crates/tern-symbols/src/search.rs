//! Binary search over a symbol table.

use std::cmp::Ordering;

use crate::image::{SymbolEntry, SymbolTable};
use crate::reader::FlashRead;

/// Find `name` in `table`.
///
/// Entries are sorted by the byte order of their NUL-terminated names, so
/// this is a plain half-open binary search with a flash string compare. An
/// empty table returns `None` without reading anything.
pub fn binary_search<R: FlashRead>(table: &SymbolTable<R>, name: &str) -> Option<SymbolEntry> {
    let needle = name.as_bytes();
    let mut lo = 0usize;
    let mut hi = table.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let entry = table.entry(mid)?;
        match table.compare_name(&entry, needle) {
            Ordering::Equal => return Some(entry),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}
