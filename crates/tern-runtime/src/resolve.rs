//! Member resolution over the class registry.
//!
//! Order is fixed: the object's own table, then each prototype table
//! nearest first, then the base table. The walk is an iterative loop with a
//! depth bound, so a long or corrupt chain can never overflow the stack.

use std::fmt;

use tern_core::TableIndex;
use tern_symbols::{SymbolEntry, SymbolImage};

use crate::registry::{ClassId, ClassRegistry};
use crate::trace::{NoopTracer, Tracer};

/// Where along the lookup order a member was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Own,
    /// `depth` links above the starting class, starting at 1.
    Prototype { depth: u8 },
    Base,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Own => f.write_str("own"),
            Origin::Prototype { depth } => write!(f, "proto{depth}"),
            Origin::Base => f.write_str("base"),
        }
    }
}

/// A successful lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub table: TableIndex,
    pub entry: SymbolEntry,
    pub origin: Origin,
}

#[derive(Clone, Copy)]
pub struct PrototypeChainResolver<'a> {
    image: &'a SymbolImage,
    registry: &'a ClassRegistry,
    max_depth: usize,
}

impl<'a> PrototypeChainResolver<'a> {
    pub fn new(image: &'a SymbolImage, registry: &'a ClassRegistry) -> Self {
        Self {
            image,
            registry,
            max_depth: 8,
        }
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Resolve `name` on instances of the class called `class_name`.
    ///
    /// An unknown class resolves nothing, not even base members.
    pub fn resolve_member(&self, class_name: &str, name: &str) -> Option<Resolution> {
        self.resolve_member_traced(class_name, name, &mut NoopTracer)
    }

    pub fn resolve_member_traced<T: Tracer>(
        &self,
        class_name: &str,
        name: &str,
        tracer: &mut T,
    ) -> Option<Resolution> {
        let id = self.registry.lookup_class(class_name)?;
        let class = self.registry.class(id);
        self.resolve_from(class.own_table(), class.prototype(), name, tracer)
    }

    /// Probe `own`, then the tables of `prototype` and its ancestors, then
    /// the base table.
    pub fn resolve_from<T: Tracer>(
        &self,
        own: Option<TableIndex>,
        prototype: Option<ClassId>,
        name: &str,
        tracer: &mut T,
    ) -> Option<Resolution> {
        let result = self.walk(own, prototype, name, tracer);
        tracer.trace_result(name, result.as_ref());
        result
    }

    fn walk<T: Tracer>(
        &self,
        own: Option<TableIndex>,
        prototype: Option<ClassId>,
        name: &str,
        tracer: &mut T,
    ) -> Option<Resolution> {
        let base = self.registry.base_table();
        let mut base_probed = false;

        if let Some(table) = own {
            base_probed = Some(table) == base;
            if let Some(hit) = self.probe(table, Origin::Own, name, tracer) {
                return Some(hit);
            }
        }

        let mut next = prototype;
        let mut depth = 0usize;
        while let Some(id) = next {
            if depth >= self.max_depth {
                tracer.trace_depth_exceeded(depth);
                break;
            }
            depth += 1;
            let class = self.registry.class(id);
            if let Some(table) = class.own_table()
                && Some(table) != own
            {
                base_probed |= Some(table) == base;
                let origin = Origin::Prototype {
                    depth: depth.min(u8::MAX as usize) as u8,
                };
                if let Some(hit) = self.probe(table, origin, name, tracer) {
                    return Some(hit);
                }
            }
            next = class.prototype();
        }

        match base {
            Some(table) if !base_probed => self.probe(table, Origin::Base, name, tracer),
            _ => None,
        }
    }

    fn probe<T: Tracer>(
        &self,
        table: TableIndex,
        origin: Origin,
        name: &str,
        tracer: &mut T,
    ) -> Option<Resolution> {
        let entry = self.image.lookup(table, name);
        tracer.trace_probe(table, origin, name, entry.is_some());
        entry.map(|entry| Resolution {
            table,
            entry,
            origin,
        })
    }

    /// Tables a lookup starting at `class_name` would probe, in order.
    pub fn probe_order(&self, class_name: &str) -> Vec<(TableIndex, Origin)> {
        let mut order = Vec::new();
        let Some(id) = self.registry.lookup_class(class_name) else {
            return order;
        };
        let class = self.registry.class(id);
        let own = class.own_table();
        if let Some(table) = own {
            order.push((table, Origin::Own));
        }
        let mut next = class.prototype();
        let mut depth = 0usize;
        while let Some(id) = next {
            if depth >= self.max_depth {
                break;
            }
            depth += 1;
            let class = self.registry.class(id);
            if let Some(table) = class.own_table()
                && Some(table) != own
            {
                order.push((
                    table,
                    Origin::Prototype {
                        depth: depth.min(u8::MAX as usize) as u8,
                    },
                ));
            }
            next = class.prototype();
        }
        if let Some(base) = self.registry.base_table()
            && !order.iter().any(|(t, _)| *t == base)
        {
            order.push((base, Origin::Base));
        }
        order
    }
}
