use tern_core::{FunctionId, TableIndex};

use super::*;

fn js() -> ArgSpec {
    ArgSpec::new(ArgType::JsVar)
}

/// `NRF`-style table: getAddress → f1, setConsole → f2, setServices → f3.
fn scenario_image() -> (SymbolImage, TableIndex, TableIndex) {
    let mut b = ImageBuilder::new();
    let radio = b.add_table("Radio");
    let empty = b.add_table("Empty");
    b.function(radio, "setServices", js(), FunctionId(3)).unwrap();
    b.function(radio, "getAddress", js(), FunctionId(1)).unwrap();
    b.function(radio, "setConsole", js(), FunctionId(2)).unwrap();
    (b.build().unwrap(), radio, empty)
}

#[test]
fn finds_every_present_name() {
    let (image, radio, _) = scenario_image();
    let table = image.table(radio).unwrap();

    assert_eq!(table.lookup("getAddress").unwrap().function(), FunctionId(1));
    assert_eq!(table.lookup("setConsole").unwrap().function(), FunctionId(2));
    assert_eq!(table.lookup("setServices").unwrap().function(), FunctionId(3));
}

#[test]
fn absent_names_miss() {
    let (image, radio, _) = scenario_image();
    let table = image.table(radio).unwrap();

    assert_eq!(table.lookup("getaddress"), None);
    assert_eq!(table.lookup("setAdvertising"), None);
    assert_eq!(table.lookup(""), None);
    // no prefix matches in either direction
    assert_eq!(table.lookup("getAddr"), None);
    assert_eq!(table.lookup("getAddressX"), None);
}

#[test]
fn empty_table_misses() {
    let (image, _, empty) = scenario_image();
    let table = image.table(empty).unwrap();

    assert!(table.is_empty());
    assert_eq!(binary_search(&table, "anything"), None);
}

#[test]
fn both_backends_resolve_identically() {
    let (image, radio, _) = scenario_image();
    let direct = image.tables_with(image.direct_reader()).get(radio).unwrap();
    let word = image.tables_with(image.word_reader()).get(radio).unwrap();

    for name in ["getAddress", "setConsole", "setServices", "nope", "a", "zzz"] {
        assert_eq!(direct.lookup(name), word.lookup(name), "{name}");
    }
}

#[test]
fn large_table_every_name_resolves() {
    let mut b = ImageBuilder::new();
    let t = b.add_table("Big");
    let names: Vec<String> = (0..255).map(|i| format!("m{i:03}x")).collect();
    for (i, name) in names.iter().enumerate().rev() {
        b.function(t, name, js(), FunctionId(i as u32)).unwrap();
    }
    let image = b.build().unwrap();
    let table = image.table(t).unwrap();

    assert_eq!(table.len(), 255);
    for (i, name) in names.iter().enumerate() {
        assert_eq!(table.lookup(name).unwrap().function(), FunctionId(i as u32));
    }
    assert_eq!(table.lookup("m000"), None);
    assert_eq!(table.lookup("m255x"), None);
}

#[test]
fn single_entry_table() {
    let mut b = ImageBuilder::new();
    let t = b.add_table("One");
    b.function(t, "only", js(), FunctionId(9)).unwrap();
    let image = b.build().unwrap();

    assert_eq!(image.lookup(t, "only").unwrap().function(), FunctionId(9));
    assert_eq!(image.lookup(t, "onlx"), None);
    assert_eq!(image.lookup(t, "onlz"), None);
}

#[test]
fn unknown_table_misses() {
    let (image, _, _) = scenario_image();
    assert_eq!(image.lookup(TableIndex(40), "getAddress"), None);
}
