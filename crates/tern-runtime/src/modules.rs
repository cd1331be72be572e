//! Built-in module catalog: native libraries first, then bundled scripts.

use tern_core::TableIndex;
use tern_symbols::SymbolImage;

use crate::error::ModuleError;

/// Name of the startup script. Never importable, never listed.
pub const BOOT_SCRIPT: &str = "_";

#[derive(Debug, Default)]
pub struct ModuleCatalog {
    libraries: Vec<(String, TableIndex)>,
    scripts: Vec<(String, String)>,
    boot: Option<String>,
}

impl ModuleCatalog {
    pub fn builder() -> ModuleCatalogBuilder {
        ModuleCatalogBuilder::default()
    }

    /// Table backing native library `name`.
    pub fn library(&self, name: &str) -> Option<TableIndex> {
        self.libraries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Source of bundled script `name`.
    pub fn script(&self, name: &str) -> Option<&str> {
        self.scripts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_str())
    }

    pub fn boot_script(&self) -> Option<&str> {
        self.boot.as_deref()
    }

    /// Loadable names: libraries in declaration order, then scripts.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.libraries
            .iter()
            .map(|(n, _)| n.as_str())
            .chain(self.scripts.iter().map(|(n, _)| n.as_str()))
    }

    /// [`names`](Self::names) joined with `,`, no trailing separator.
    pub fn list_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(",")
    }
}

#[derive(Debug, Default)]
pub struct ModuleCatalogBuilder {
    libraries: Vec<(String, TableIndex)>,
    scripts: Vec<(String, String)>,
    boot: Option<String>,
}

impl ModuleCatalogBuilder {
    pub fn library(mut self, name: &str, table: TableIndex) -> Self {
        self.libraries.push((name.to_owned(), table));
        self
    }

    /// Bundle a script. The name `_` sets the startup script instead.
    pub fn script(mut self, name: &str, source: &str) -> Self {
        if name == BOOT_SCRIPT {
            self.boot = Some(source.to_owned());
        } else {
            self.scripts.push((name.to_owned(), source.to_owned()));
        }
        self
    }

    pub fn boot(mut self, source: &str) -> Self {
        self.boot = Some(source.to_owned());
        self
    }

    pub fn build(self, image: &SymbolImage) -> Result<ModuleCatalog, ModuleError> {
        let mut seen: Vec<&str> = Vec::new();
        let names = self
            .libraries
            .iter()
            .map(|(n, _)| n.as_str())
            .chain(self.scripts.iter().map(|(n, _)| n.as_str()));
        for name in names {
            if name == BOOT_SCRIPT {
                return Err(ModuleError::Reserved(name.to_owned()));
            }
            // the listing is comma separated
            if name.is_empty() || name.contains(',') || name.contains('\0') {
                return Err(ModuleError::InvalidName(name.to_owned()));
            }
            if seen.contains(&name) {
                return Err(ModuleError::Duplicate(name.to_owned()));
            }
            seen.push(name);
        }

        for (name, table) in &self.libraries {
            if table.as_usize() >= image.table_count() {
                return Err(ModuleError::UnknownTable {
                    name: name.clone(),
                    table: *table,
                });
            }
        }

        Ok(ModuleCatalog {
            libraries: self.libraries,
            scripts: self.scripts,
            boot: self.boot,
        })
    }
}
