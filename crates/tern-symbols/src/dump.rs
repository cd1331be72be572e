//! Human-readable image listing.

use std::fmt::Write as _;

use tern_core::Colors;

use crate::arg_spec::CallKind;
use crate::image::{SymbolImage, SymbolTable};
use crate::reader::FlashRead;

/// Digits needed to print every index below `count`.
pub fn width_for_count(count: usize) -> usize {
    let mut n = count.saturating_sub(1);
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}

/// Render the header summary and every table.
pub fn dump(image: &SymbolImage, colors: Colors) -> String {
    let mut out = String::new();
    let c = colors;
    let header = image.header();

    writeln!(out, "{}[image]{}", c.heading, c.reset).unwrap();
    writeln!(
        out,
        "version {}  tables {}  symbols {}  names {} bytes",
        header.version, header.table_count, header.entry_count, header.str_blob_size
    )
    .unwrap();

    let tables = image.tables_with(image.direct_reader());
    for table in tables.iter() {
        out.push('\n');
        dump_table(&mut out, &table, |i| tables.get(i).map(|t| t.name()), c);
    }
    out
}

fn dump_table<R: FlashRead>(
    out: &mut String,
    table: &SymbolTable<R>,
    table_name: impl Fn(tern_core::TableIndex) -> Option<String>,
    c: Colors,
) {
    writeln!(
        out,
        "{}[table {} {}]{}",
        c.heading,
        table.index(),
        table.name(),
        c.reset
    )
    .unwrap();

    if table.is_empty() {
        writeln!(out, "  {}(empty){}", c.dim, c.reset).unwrap();
        return;
    }

    let rows: Vec<_> = table
        .iter()
        .map(|(name, entry)| (name, entry, entry.spec.to_string()))
        .collect();
    let index_width = width_for_count(rows.len());
    let name_width = rows.iter().map(|(n, _, _)| n.len()).max().unwrap_or(0);
    let spec_width = rows.iter().map(|(_, _, s)| s.len()).max().unwrap_or(0);

    for (i, (name, entry, spec)) in rows.iter().enumerate() {
        let target = match entry.spec.call_kind() {
            CallKind::SymbolTable => match entry.table() {
                Some(t) => format!("-> {} {}", t, table_name(t).unwrap_or_default()),
                None => format!("-> #{}?", entry.target),
            },
            _ => format!("{}", entry.function()),
        };
        writeln!(
            out,
            "  {}{:>iw$}{}  {}{:<nw$}{}  {}{:<sw$}{}  {}{}{}",
            c.dim,
            i,
            c.reset,
            c.name,
            name,
            c.reset,
            c.dim,
            spec,
            c.reset,
            c.literal,
            target,
            c.reset,
            iw = index_width,
            nw = name_width,
            sw = spec_width,
        )
        .unwrap();
    }
}
