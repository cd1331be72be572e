use tern_core::{Colors, FunctionId};

use super::*;
use crate::fixtures::{self, BoardTables};

fn board() -> (tern_symbols::SymbolImage, ClassRegistry, BoardTables) {
    let (image, t) = fixtures::image();
    let registry = fixtures::registry(&image, &t);
    (image, registry, t)
}

#[test]
fn bluetooth_reaches_nrf_through_its_chain() {
    let (image, registry, t) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    let hit = resolver.resolve_member("Bluetooth", "getAddress").unwrap();
    assert_eq!(hit.table, t.nrf);
    assert_eq!(hit.origin, Origin::Prototype { depth: 1 });
    assert_eq!(hit.entry.function(), FunctionId(0));
}

#[test]
fn bluetooth_without_chain_misses_nrf_members() {
    let (image, t) = fixtures::image();
    let registry = ClassRegistry::builder()
        .class("NRF", Some(t.nrf), None)
        .class("Bluetooth", Some(t.bluetooth), None)
        .base_table(t.object_proto)
        .build(&image)
        .unwrap();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    assert_eq!(resolver.resolve_member("Bluetooth", "getAddress"), None);
    assert!(resolver.resolve_member("Bluetooth", "setConsole").is_some());
}

#[test]
fn own_table_shadows_prototype_and_base() {
    let (image, registry, t) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    let own = resolver.resolve_member("String", "toString").unwrap();
    assert_eq!(own.table, t.string_proto);
    assert_eq!(own.origin, Origin::Own);

    let inherited = resolver.resolve_member("String", "hasOwnProperty").unwrap();
    assert_eq!(inherited.table, t.object_proto);
    assert_eq!(inherited.origin, Origin::Prototype { depth: 1 });
}

#[test]
fn classes_without_tables_start_at_their_prototype() {
    let (image, registry, t) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    let len = resolver.resolve_member("Uint8Array", "length").unwrap();
    assert_eq!((len.table, len.origin), (t.view_proto, Origin::Prototype { depth: 1 }));

    let has = resolver.resolve_member("Uint8Array", "hasOwnProperty").unwrap();
    assert_eq!((has.table, has.origin), (t.object_proto, Origin::Prototype { depth: 2 }));
}

#[test]
fn base_table_is_the_last_resort() {
    let (image, registry, t) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    let hit = resolver.resolve_member("NRF", "hasOwnProperty").unwrap();
    assert_eq!(hit.table, t.object_proto);
    assert_eq!(hit.origin, Origin::Base);
}

#[test]
fn misses_and_unknown_classes() {
    let (image, registry, _) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    assert_eq!(resolver.resolve_member("NRF", "nope"), None);
    assert_eq!(resolver.resolve_member("Ghost", "toString"), None);
    assert_eq!(resolver.resolve_member("NRF", ""), None);
}

#[test]
fn depth_bound_stops_the_walk() {
    let (image, registry, t) = board();

    // the chain is cut after ArrayBufferView, the base table still answers
    let shallow = PrototypeChainResolver::new(&image, &registry).max_depth(1);
    let has = shallow.resolve_member("Uint8Array", "hasOwnProperty").unwrap();
    assert_eq!((has.table, has.origin), (t.object_proto, Origin::Base));

    let none = PrototypeChainResolver::new(&image, &registry).max_depth(0);
    assert_eq!(none.resolve_member("Uint8Array", "length"), None);
}

#[test]
fn probe_order_skips_repeated_tables() {
    let (image, registry, t) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);

    assert_eq!(
        resolver.probe_order("Uint8Array"),
        vec![
            (t.view_proto, Origin::Prototype { depth: 1 }),
            (t.object_proto, Origin::Prototype { depth: 2 }),
        ]
    );
    assert_eq!(
        resolver.probe_order("NRF"),
        vec![(t.nrf, Origin::Own), (t.object_proto, Origin::Base)]
    );
    assert!(resolver.probe_order("Ghost").is_empty());
}

#[test]
fn print_tracer_records_each_probe() {
    let (image, registry, _) = board();
    let resolver = PrototypeChainResolver::new(&image, &registry);
    let mut tracer = PrintTracer::new(&image, Colors::OFF);

    resolver.resolve_member_traced("Bluetooth", "getAddress", &mut tracer);
    assert_eq!(
        tracer.lines(),
        [
            "own    Bluetooth getAddress miss",
            "proto1 NRF getAddress hit",
            "found  getAddress in NRF (() -> jsvar)",
        ]
    );

    let mut tracer = PrintTracer::new(&image, Colors::OFF);
    resolver.resolve_member_traced("NRF", "nope", &mut tracer);
    insta::assert_snapshot!(tracer.output(), @r"
    own    NRF nope miss
    base   Object.prototype nope miss
    absent nope
    ");
}
