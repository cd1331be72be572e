//! Image construction.
//!
//! Tables are declared in any order and symbols added unsorted; `emit`
//! sorts each table by byte order and lays the image out. All constraints
//! the lookup path relies on are checked here, once, instead of at runtime.

use tern_core::{FunctionId, TableIndex};

use crate::arg_spec::{ArgSpec, CallKind};
use crate::constants::{ENTRY_SIZE, HEADER_SIZE, MAX_SYMBOLS_PER_TABLE, TABLE_DIR_SIZE};
use crate::header::{Header, align_to_word};
use crate::image::{ImageError, SymbolEntry, SymbolImage};

/// Image construction error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("unknown table {0}")]
    UnknownTable(TableIndex),
    #[error("too many tables: {0}")]
    TooManyTables(usize),
    #[error("too many symbols in total: {0}")]
    TooManyEntries(usize),
    #[error("table `{table}` has {count} symbols (maximum {MAX_SYMBOLS_PER_TABLE})")]
    TooManySymbols { table: String, count: usize },
    #[error("table `{table}` declares `{name}` twice")]
    DuplicateSymbol { table: String, name: String },
    #[error("invalid symbol name {name:?} in table `{table}`")]
    InvalidName { table: String, name: String },
    #[error("names of table `{table}` exceed the 64 KiB name region")]
    NameRegionTooLarge { table: String },
    #[error("malformed argument spec {spec:?} for `{name}`")]
    MalformedSpec { name: String, spec: ArgSpec },
    #[error("`{name}` points at unknown table {target}")]
    DanglingTable { name: String, target: u32 },
    #[error("emitted image failed to load: {0}")]
    Load(#[from] ImageError),
}

#[derive(Clone, Debug)]
struct SymbolDraft {
    name: String,
    spec: ArgSpec,
    target: u32,
}

#[derive(Clone, Debug)]
struct TableDraft {
    name: String,
    symbols: Vec<SymbolDraft>,
}

/// Collects tables and symbols, then emits a validated image.
#[derive(Clone, Debug, Default)]
pub struct ImageBuilder {
    tables: Vec<TableDraft>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table. Indices are assigned in declaration order.
    pub fn add_table(&mut self, name: &str) -> TableIndex {
        let index = TableIndex(self.tables.len() as u16);
        self.tables.push(TableDraft {
            name: name.to_owned(),
            symbols: Vec::new(),
        });
        index
    }

    pub fn symbol(
        &mut self,
        table: TableIndex,
        name: &str,
        spec: ArgSpec,
        target: u32,
    ) -> Result<&mut Self, BuildError> {
        let draft = self
            .tables
            .get_mut(table.as_usize())
            .ok_or(BuildError::UnknownTable(table))?;
        draft.symbols.push(SymbolDraft {
            name: name.to_owned(),
            spec,
            target,
        });
        Ok(self)
    }

    /// Add a native function member.
    pub fn function(
        &mut self,
        table: TableIndex,
        name: &str,
        spec: ArgSpec,
        function: FunctionId,
    ) -> Result<&mut Self, BuildError> {
        self.symbol(table, name, spec, function.0)
    }

    /// Add a member that is itself a native object backed by `target`.
    pub fn table_member(
        &mut self,
        table: TableIndex,
        name: &str,
        target: TableIndex,
    ) -> Result<&mut Self, BuildError> {
        self.symbol(table, name, ArgSpec::SYMBOL_TABLE, target.0 as u32)
    }

    pub fn build(&self) -> Result<SymbolImage, BuildError> {
        let bytes = self.emit()?;
        Ok(SymbolImage::from_bytes(&bytes)?)
    }

    /// Lay out and serialize the image.
    pub fn emit(&self) -> Result<Vec<u8>, BuildError> {
        if self.tables.len() > u16::MAX as usize {
            return Err(BuildError::TooManyTables(self.tables.len()));
        }

        let mut tables = self.tables.clone();
        for table in &mut tables {
            self.check_table(table)?;
        }

        let entry_count: usize = tables.iter().map(|t| t.symbols.len()).sum();
        if entry_count > u16::MAX as usize {
            return Err(BuildError::TooManyEntries(entry_count));
        }

        let mut directory = Vec::with_capacity(tables.len() * TABLE_DIR_SIZE);
        let mut entries = Vec::with_capacity(entry_count * ENTRY_SIZE);
        let mut blob = Vec::new();
        let mut first_entry = 0u16;

        for table in &tables {
            let name_offset = blob.len() as u32;
            push_cstr(&mut blob, &table.name);

            let chars = blob.len();
            for symbol in &table.symbols {
                let relative = u16::try_from(blob.len() - chars).map_err(|_| {
                    BuildError::NameRegionTooLarge {
                        table: table.name.clone(),
                    }
                })?;
                push_cstr(&mut blob, &symbol.name);
                let entry = SymbolEntry {
                    name_offset: relative,
                    spec: symbol.spec,
                    target: symbol.target,
                };
                entries.extend_from_slice(&entry.to_bytes());
            }

            directory.extend_from_slice(&name_offset.to_le_bytes());
            directory.extend_from_slice(&(chars as u32).to_le_bytes());
            directory.extend_from_slice(&first_entry.to_le_bytes());
            directory.push(table.symbols.len() as u8);
            directory.push(0);
            first_entry += table.symbols.len() as u16;
        }

        let unpadded = HEADER_SIZE + directory.len() + entries.len() + blob.len();
        let total = align_to_word(unpadded);

        let mut body = Vec::with_capacity(total - HEADER_SIZE);
        body.extend_from_slice(&directory);
        body.extend_from_slice(&entries);
        body.extend_from_slice(&blob);
        body.resize(total - HEADER_SIZE, 0);

        let header = Header {
            table_count: tables.len() as u16,
            entry_count: entry_count as u16,
            str_blob_size: blob.len() as u32,
            checksum: crc32fast::hash(&body),
            total_size: total as u32,
            ..Header::default()
        };

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    fn check_table(&self, table: &mut TableDraft) -> Result<(), BuildError> {
        if !is_valid_name(&table.name) {
            return Err(BuildError::InvalidName {
                table: table.name.clone(),
                name: table.name.clone(),
            });
        }
        if table.symbols.len() > MAX_SYMBOLS_PER_TABLE {
            return Err(BuildError::TooManySymbols {
                table: table.name.clone(),
                count: table.symbols.len(),
            });
        }

        for symbol in &table.symbols {
            if !is_valid_name(&symbol.name) {
                return Err(BuildError::InvalidName {
                    table: table.name.clone(),
                    name: symbol.name.clone(),
                });
            }
            if !symbol.spec.is_well_formed() {
                return Err(BuildError::MalformedSpec {
                    name: symbol.name.clone(),
                    spec: symbol.spec,
                });
            }
            if symbol.spec.call_kind() == CallKind::SymbolTable
                && symbol.target as usize >= self.tables.len()
            {
                return Err(BuildError::DanglingTable {
                    name: symbol.name.clone(),
                    target: symbol.target,
                });
            }
        }

        table
            .symbols
            .sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        if let Some(pair) = table.symbols.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(BuildError::DuplicateSymbol {
                table: table.name.clone(),
                name: pair[0].name.clone(),
            });
        }
        Ok(())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.as_bytes().contains(&0)
}

fn push_cstr(blob: &mut Vec<u8>, s: &str) {
    blob.extend_from_slice(s.as_bytes());
    blob.push(0);
}
