//! Tracing infrastructure for member resolution.
//!
//! Resolution is generic over [`Tracer`]; with [`NoopTracer`] every hook
//! compiles away.

use std::fmt::Write as _;

use tern_core::{Colors, TableIndex};
use tern_symbols::SymbolImage;

use crate::resolve::{Origin, Resolution};

pub trait Tracer {
    /// Called after each table probe.
    fn trace_probe(&mut self, table: TableIndex, origin: Origin, name: &str, hit: bool);

    /// Called when the prototype walk stops at the depth bound.
    fn trace_depth_exceeded(&mut self, depth: usize);

    /// Called once per lookup with the final answer.
    fn trace_result(&mut self, name: &str, result: Option<&Resolution>);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_probe(&mut self, _table: TableIndex, _origin: Origin, _name: &str, _hit: bool) {}

    #[inline(always)]
    fn trace_depth_exceeded(&mut self, _depth: usize) {}

    #[inline(always)]
    fn trace_result(&mut self, _name: &str, _result: Option<&Resolution>) {}
}

/// Tracer that collects one line per probe.
pub struct PrintTracer<'a> {
    image: &'a SymbolImage,
    lines: Vec<String>,
    colors: Colors,
}

impl<'a> PrintTracer<'a> {
    pub fn new(image: &'a SymbolImage, colors: Colors) -> Self {
        Self {
            image,
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn output(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            writeln!(out, "{line}").unwrap();
        }
        out
    }

    /// Write collected lines to stderr.
    pub fn print(&self) {
        eprint!("{}", self.output());
    }

    fn table_name(&self, table: TableIndex) -> String {
        self.image
            .table(table)
            .map(|t| t.name())
            .unwrap_or_else(|| "?".to_owned())
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_probe(&mut self, table: TableIndex, origin: Origin, name: &str, hit: bool) {
        let c = self.colors;
        let verdict = if hit { "hit" } else { "miss" };
        let line = format!(
            "{}{:<6}{} {}{}{} {name} {}{verdict}{}",
            c.dim,
            origin.to_string(),
            c.reset,
            c.name,
            self.table_name(table),
            c.reset,
            c.literal,
            c.reset,
        );
        self.lines.push(line);
    }

    fn trace_depth_exceeded(&mut self, depth: usize) {
        self.lines
            .push(format!("stop   prototype chain cut at depth {depth}"));
    }

    fn trace_result(&mut self, name: &str, result: Option<&Resolution>) {
        let line = match result {
            Some(r) => format!(
                "found  {name} in {} ({})",
                self.table_name(r.table),
                r.entry.spec
            ),
            None => format!("absent {name}"),
        };
        self.lines.push(line);
    }
}
