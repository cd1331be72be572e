//! Symbol image with typed, read-only views.
//!
//! The [`SymbolImage`] owns the aligned bytes. [`Tables`] and
//! [`SymbolTable`] are cheap `Copy` views that read through a [`FlashRead`]
//! backend, so nothing is decoded ahead of time.

use std::io;
use std::path::Path;

use tern_core::{FunctionId, TableIndex};

use crate::aligned_vec::AlignedVec;
use crate::arg_spec::{ArgSpec, CallKind};
use crate::constants::{ENTRY_SIZE, HEADER_SIZE, TABLE_DIR_SIZE, VERSION};
use crate::header::{Header, SectionOffsets};
use crate::reader::{DirectReader, FlashRead, TargetReader, WordReader, compare_cstr, read_cstr};
use crate::search::binary_search;

/// Image load error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("invalid magic: expected TRNS")]
    InvalidMagic,
    #[error("unsupported version: {0} (expected {VERSION})")]
    UnsupportedVersion(u16),
    #[error("image too small: {0} bytes (minimum {HEADER_SIZE})")]
    TooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("sections need {needed} bytes but the image has {actual}")]
    Truncated { needed: u32, actual: usize },
    #[error("table {table} is malformed: {reason}")]
    MalformedTable { table: u16, reason: &'static str },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// One decoded symbol entry (8 bytes on the wire).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Offset of the name, relative to the owning table's name region.
    pub name_offset: u16,
    pub spec: ArgSpec,
    /// Native function index, or table index for `CallKind::SymbolTable`.
    pub target: u32,
}

impl SymbolEntry {
    pub fn from_bytes(bytes: [u8; ENTRY_SIZE]) -> Self {
        Self {
            name_offset: u16::from_le_bytes([bytes[0], bytes[1]]),
            spec: ArgSpec::from_bits(u16::from_le_bytes([bytes[2], bytes[3]])),
            target: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut bytes = [0u8; ENTRY_SIZE];
        bytes[0..2].copy_from_slice(&self.name_offset.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.spec.bits().to_le_bytes());
        bytes[4..8].copy_from_slice(&self.target.to_le_bytes());
        bytes
    }

    fn read<R: FlashRead>(reader: R, offset: usize) -> Self {
        Self {
            name_offset: reader.read_u16(offset),
            spec: ArgSpec::from_bits(reader.read_u16(offset + 2)),
            target: reader.read_u32(offset + 4),
        }
    }

    pub fn function(&self) -> FunctionId {
        FunctionId(self.target)
    }

    /// Target table, for members that are themselves symbol tables.
    pub fn table(&self) -> Option<TableIndex> {
        if self.spec.call_kind() != CallKind::SymbolTable {
            return None;
        }
        u16::try_from(self.target).ok().map(TableIndex)
    }
}

/// One symbol table: entries sorted by name plus its name region.
#[derive(Clone, Copy, Debug)]
pub struct SymbolTable<R: FlashRead> {
    reader: R,
    index: TableIndex,
    name: usize,
    chars: usize,
    entries: usize,
    count: u8,
}

impl<R: FlashRead> SymbolTable<R> {
    pub fn index(&self) -> TableIndex {
        self.index
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn name(&self) -> String {
        read_cstr(self.reader, self.name)
    }

    /// Entry at sorted position `i`.
    pub fn entry(&self, i: usize) -> Option<SymbolEntry> {
        (i < self.len()).then(|| SymbolEntry::read(self.reader, self.entries + i * ENTRY_SIZE))
    }

    /// Name of the entry at sorted position `i`.
    pub fn symbol_name(&self, i: usize) -> Option<String> {
        let entry = self.entry(i)?;
        Some(read_cstr(self.reader, self.chars + entry.name_offset as usize))
    }

    pub(crate) fn compare_name(&self, entry: &SymbolEntry, needle: &[u8]) -> std::cmp::Ordering {
        compare_cstr(self.reader, self.chars + entry.name_offset as usize, needle)
    }

    /// Find `name` by binary search. Byte-exact, case-sensitive.
    pub fn lookup(&self, name: &str) -> Option<SymbolEntry> {
        binary_search(self, name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, SymbolEntry)> + '_ {
        (0..self.len()).filter_map(|i| Some((self.symbol_name(i)?, self.entry(i)?)))
    }
}

/// View over the table directory.
#[derive(Clone, Copy, Debug)]
pub struct Tables<R: FlashRead> {
    reader: R,
    count: u16,
    offsets: SectionOffsets,
}

impl<R: FlashRead> Tables<R> {
    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: TableIndex) -> Option<SymbolTable<R>> {
        if index.0 >= self.count {
            return None;
        }
        let record = self.offsets.tables as usize + index.as_usize() * TABLE_DIR_SIZE;
        let blob = self.offsets.str_blob as usize;
        let first = self.reader.read_u16(record + 8) as usize;
        Some(SymbolTable {
            reader: self.reader,
            index,
            name: blob + self.reader.read_u32(record) as usize,
            chars: blob + self.reader.read_u32(record + 4) as usize,
            entries: self.offsets.entries as usize + first * ENTRY_SIZE,
            count: self.reader.read_u8(record + 10),
        })
    }

    /// Find a table by its name. Linear; meant for tooling and setup.
    pub fn find(&self, name: &str) -> Option<SymbolTable<R>> {
        self.iter()
            .find(|t| compare_cstr(self.reader, t.name, name.as_bytes()).is_eq())
    }

    pub fn iter(&self) -> impl Iterator<Item = SymbolTable<R>> + '_ {
        (0..self.count).filter_map(|i| self.get(TableIndex(i)))
    }
}

/// A loaded symbol image.
#[derive(Debug, Clone)]
pub struct SymbolImage {
    storage: AlignedVec,
    header: Header,
    offsets: SectionOffsets,
}

impl SymbolImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        Self::from_storage(AlignedVec::copy_from_slice(bytes))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        Self::from_storage(AlignedVec::from_file(path)?)
    }

    fn from_storage(storage: AlignedVec) -> Result<Self, ImageError> {
        if storage.len() < HEADER_SIZE {
            return Err(ImageError::TooSmall(storage.len()));
        }

        let header = Header::from_bytes(&storage[..HEADER_SIZE]);
        if !header.validate_magic() {
            return Err(ImageError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(ImageError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != storage.len() {
            return Err(ImageError::SizeMismatch {
                header: header.total_size,
                actual: storage.len(),
            });
        }

        let actual = crc32fast::hash(&storage[HEADER_SIZE..]);
        if actual != header.checksum {
            return Err(ImageError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let offsets = header.compute_offsets();
        if offsets.end as usize > storage.len() {
            return Err(ImageError::Truncated {
                needed: offsets.end,
                actual: storage.len(),
            });
        }

        let image = Self {
            storage,
            header,
            offsets,
        };
        image.check_structure()?;
        Ok(image)
    }

    /// Bounds checks on the directory and name offsets. Sortedness is left to
    /// [`crate::verify`].
    fn check_structure(&self) -> Result<(), ImageError> {
        let reader = self.direct_reader();
        let blob_size = self.header.str_blob_size as usize;
        let tables = self.tables_with(reader);

        for table in tables.iter() {
            let malformed = |reason| ImageError::MalformedTable {
                table: table.index.0,
                reason,
            };
            let blob = self.offsets.str_blob as usize;
            if table.name - blob >= blob_size {
                return Err(malformed("name outside string blob"));
            }
            let first = (table.entries - self.offsets.entries as usize) / ENTRY_SIZE;
            if first + table.len() > self.header.entry_count as usize {
                return Err(malformed("entries outside entry section"));
            }
            for entry in (0..table.len()).filter_map(|i| table.entry(i)) {
                if table.chars - blob + entry.name_offset as usize >= blob_size {
                    return Err(malformed("symbol name outside string blob"));
                }
            }
        }
        Ok(())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn offsets(&self) -> &SectionOffsets {
        &self.offsets
    }

    pub fn bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn table_count(&self) -> usize {
        self.header.table_count as usize
    }

    /// The backend this build reads flash with.
    pub fn reader(&self) -> TargetReader<'_> {
        TargetReader::from(&self.storage)
    }

    pub fn direct_reader(&self) -> DirectReader<'_> {
        DirectReader::from(&self.storage)
    }

    pub fn word_reader(&self) -> WordReader<'_> {
        WordReader::from(&self.storage)
    }

    pub fn tables(&self) -> Tables<TargetReader<'_>> {
        self.tables_with(self.reader())
    }

    /// Table directory read through an explicit backend.
    pub fn tables_with<R: FlashRead>(&self, reader: R) -> Tables<R> {
        Tables {
            reader,
            count: self.header.table_count,
            offsets: self.offsets,
        }
    }

    pub fn table(&self, index: TableIndex) -> Option<SymbolTable<TargetReader<'_>>> {
        self.tables().get(index)
    }

    pub fn find_table(&self, name: &str) -> Option<TableIndex> {
        self.tables().find(name).map(|t| t.index())
    }

    /// Look `name` up in table `index`. Unknown tables are a miss.
    pub fn lookup(&self, index: TableIndex, name: &str) -> Option<SymbolEntry> {
        self.table(index)?.lookup(name)
    }
}
