//! Built-in classes: which table a class owns, which class it inherits
//! from, and which class a plain value belongs to.

use std::collections::HashMap;

use tern_core::{TableIndex, ValueKind};
use tern_symbols::SymbolImage;

use crate::error::RegistryError;

/// Position of a class inside its registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassId(u16);

impl ClassId {
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Representation check: does a value of this kind belong to the class?
pub type ClassCheck = fn(ValueKind) -> bool;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassBinding {
    name: String,
    own_table: Option<TableIndex>,
    prototype: Option<ClassId>,
}

impl ClassBinding {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table holding the members instances of this class see first.
    pub fn own_table(&self) -> Option<TableIndex> {
        self.own_table
    }

    pub fn prototype(&self) -> Option<ClassId> {
        self.prototype
    }
}

/// Immutable class registry, shared by every runtime over the same image.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<ClassBinding>,
    by_name: HashMap<String, ClassId>,
    by_table: HashMap<TableIndex, ClassId>,
    checks: Vec<(ClassCheck, ClassId)>,
    global: Option<TableIndex>,
    base: Option<TableIndex>,
}

impl ClassRegistry {
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn class(&self, id: ClassId) -> &ClassBinding {
        &self.classes[id.as_usize()]
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassBinding)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassId(i as u16), c))
    }

    pub fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Class whose own table is `table`, if any.
    pub fn class_for_table(&self, table: TableIndex) -> Option<ClassId> {
        self.by_table.get(&table).copied()
    }

    /// Exact, case-sensitive match against the declared class names.
    pub fn is_builtin_class_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// First class whose representation check accepts `kind`.
    ///
    /// Checks run in declaration order, so the most specific checks
    /// (typed array views) must be declared before the general ones.
    pub fn basic_class_of(&self, kind: ValueKind) -> Option<ClassId> {
        self.checks
            .iter()
            .find(|(check, _)| check(kind))
            .map(|(_, id)| *id)
    }

    pub fn basic_class_name_of(&self, kind: ValueKind) -> Option<&str> {
        self.basic_class_of(kind).map(|id| self.class(id).name())
    }

    /// Name of the class `name` inherits from.
    pub fn basic_prototype_name(&self, name: &str) -> Option<&str> {
        let id = self.lookup_class(name)?;
        let proto = self.class(id).prototype()?;
        Some(self.class(proto).name())
    }

    /// Table of the global object.
    pub fn global_table(&self) -> Option<TableIndex> {
        self.global
    }

    /// Table consulted after every prototype chain is exhausted.
    pub fn base_table(&self) -> Option<TableIndex> {
        self.base
    }
}

/// Builder for [`ClassRegistry`]. Nothing is validated until [`build`].
///
/// [`build`]: ClassRegistryBuilder::build
#[derive(Debug)]
pub struct ClassRegistryBuilder {
    classes: Vec<(String, Option<TableIndex>, Option<String>)>,
    checks: Vec<(String, ClassCheck)>,
    global: Option<TableIndex>,
    base: Option<TableIndex>,
    max_depth: usize,
}

impl Default for ClassRegistryBuilder {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            checks: Vec::new(),
            global: None,
            base: None,
            max_depth: 8,
        }
    }
}

impl ClassRegistryBuilder {
    pub fn class(mut self, name: &str, own_table: Option<TableIndex>, prototype: Option<&str>) -> Self {
        self.classes
            .push((name.to_owned(), own_table, prototype.map(str::to_owned)));
        self
    }

    /// Map values accepted by `check` to `class`.
    pub fn check(mut self, class: &str, check: ClassCheck) -> Self {
        self.checks.push((class.to_owned(), check));
        self
    }

    pub fn global_table(mut self, table: TableIndex) -> Self {
        self.global = Some(table);
        self
    }

    pub fn base_table(mut self, table: TableIndex) -> Self {
        self.base = Some(table);
        self
    }

    /// Longest prototype chain accepted (default: 8).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn build(self, image: &SymbolImage) -> Result<ClassRegistry, RegistryError> {
        let table_count = image.table_count();
        let check_table = |owner: &str, table: TableIndex| {
            if table.as_usize() < table_count {
                Ok(())
            } else {
                Err(RegistryError::UnknownTable {
                    owner: owner.to_owned(),
                    table,
                })
            }
        };

        let mut by_name = HashMap::with_capacity(self.classes.len());
        for (i, (name, own_table, _)) in self.classes.iter().enumerate() {
            if by_name.insert(name.clone(), ClassId(i as u16)).is_some() {
                return Err(RegistryError::DuplicateClass(name.clone()));
            }
            if let Some(table) = own_table {
                check_table(name, *table)?;
            }
        }
        if let Some(table) = self.global {
            check_table("global", table)?;
        }
        if let Some(table) = self.base {
            check_table("base", table)?;
        }

        let mut classes = Vec::with_capacity(self.classes.len());
        let mut by_table = HashMap::new();
        for (i, (name, own_table, prototype)) in self.classes.into_iter().enumerate() {
            let prototype = match prototype {
                Some(proto) => Some(by_name.get(&proto).copied().ok_or_else(|| {
                    RegistryError::UnknownPrototype {
                        class: name.clone(),
                        prototype: proto.clone(),
                    }
                })?),
                None => None,
            };
            if let Some(table) = own_table {
                by_table.entry(table).or_insert(ClassId(i as u16));
            }
            classes.push(ClassBinding {
                name,
                own_table,
                prototype,
            });
        }

        for (i, class) in classes.iter().enumerate() {
            let mut depth = 0;
            let mut next = class.prototype;
            while let Some(id) = next {
                if id.as_usize() == i || depth > classes.len() {
                    return Err(RegistryError::PrototypeCycle(class.name.clone()));
                }
                depth += 1;
                next = classes[id.as_usize()].prototype;
            }
            if depth > self.max_depth {
                return Err(RegistryError::ChainTooDeep {
                    class: class.name.clone(),
                    depth,
                    max: self.max_depth,
                });
            }
        }

        let mut checks = Vec::with_capacity(self.checks.len());
        for (class, check) in self.checks {
            let id = by_name
                .get(&class)
                .copied()
                .ok_or(RegistryError::UnknownClass(class))?;
            checks.push((check, id));
        }

        Ok(ClassRegistry {
            classes,
            by_name,
            by_table,
            checks,
            global: self.global,
            base: self.base,
        })
    }
}
