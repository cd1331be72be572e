use tern_core::{Colors, FunctionId};

use super::*;

fn sample() -> SymbolImage {
    let mut b = ImageBuilder::new();
    let global = b.add_table("global");
    let nrf = b.add_table("NRF");
    b.add_table("empty");

    b.table_member(global, "NRF", nrf).unwrap();
    b.function(
        nrf,
        "setAdvertising",
        ArgSpec::new(ArgType::Void)
            .param(ArgType::JsVar)
            .param(ArgType::JsVar),
        FunctionId(3),
    )
    .unwrap();
    b.function(nrf, "getAddress", ArgSpec::new(ArgType::JsVar), FunctionId(0))
        .unwrap();
    b.build().unwrap()
}

#[test]
fn dump_lists_every_table() {
    let out = dump(&sample(), Colors::OFF);

    insta::assert_snapshot!(out, @r"
    [image]
    version 1  tables 3  symbols 3  names 47 bytes

    [table #0 global]
      0  NRF  table  -> #1 NRF

    [table #1 NRF]
      0  getAddress      () -> jsvar             fn0
      1  setAdvertising  (jsvar, jsvar) -> void  fn3

    [table #2 empty]
      (empty)
    ");
}

#[test]
fn dump_colors_headings() {
    let out = dump(&sample(), Colors::ON);
    assert!(out.starts_with("\x1b[1;35m[image]\x1b[0m"));
}

#[test]
fn index_width() {
    assert_eq!(width_for_count(0), 1);
    assert_eq!(width_for_count(10), 1);
    assert_eq!(width_for_count(11), 2);
    assert_eq!(width_for_count(255), 3);
}
