//! Symbol image header (32 bytes).
//!
//! Section order: Header → TableDirectory → Entries → StringBlob.
//! Every section starts on a word boundary; the directory and entry records
//! are word multiples, so offsets follow from the counts alone.

use crate::constants::{ENTRY_SIZE, HEADER_SIZE, MAGIC, TABLE_DIR_SIZE, VERSION, WORD_SIZE};

/// Image header.
///
/// - 0-3: magic
/// - 4-11: version, table count, entry count, flags (4 × u16)
/// - 12-23: blob size, checksum, total size (3 × u32)
/// - 24-31: reserved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    /// Magic bytes: b"TRNS"
    pub magic: [u8; 4],
    pub version: u16,
    pub table_count: u16,
    /// Entries across all tables.
    pub entry_count: u16,
    pub flags: u16,
    /// Size of the string blob in bytes, without trailing padding.
    pub str_blob_size: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    /// Total image size in bytes.
    pub total_size: u32,
    pub _reserved: [u8; 8],
}

const _: () = assert!(std::mem::size_of::<Header>() == HEADER_SIZE);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            table_count: 0,
            entry_count: 0,
            flags: 0,
            str_blob_size: 0,
            checksum: 0,
            total_size: 0,
            _reserved: [0; 8],
        }
    }
}

/// Section offsets derived from header counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub tables: u32,
    pub entries: u32,
    pub str_blob: u32,
    /// End of the blob, before padding.
    pub end: u32,
}

impl Header {
    /// Decode a header from its 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= HEADER_SIZE, "header too short");

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[24..32]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u16_at(4),
            table_count: u16_at(6),
            entry_count: u16_at(8),
            flags: u16_at(10),
            str_blob_size: u32_at(12),
            checksum: u32_at(16),
            total_size: u32_at(20),
            _reserved: reserved,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.table_count.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.entry_count.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.flags.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.str_blob_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[24..32].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }

    pub fn compute_offsets(&self) -> SectionOffsets {
        let tables = HEADER_SIZE as u32;
        let entries = tables + self.table_count as u32 * TABLE_DIR_SIZE as u32;
        let str_blob = entries + self.entry_count as u32 * ENTRY_SIZE as u32;
        SectionOffsets {
            tables,
            entries,
            str_blob,
            end: str_blob.saturating_add(self.str_blob_size),
        }
    }
}

/// Round up to the next multiple of the flash word.
pub(crate) fn align_to_word(value: usize) -> usize {
    value.div_ceil(WORD_SIZE) * WORD_SIZE
}
