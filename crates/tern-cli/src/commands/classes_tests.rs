use tern_core::Colors;

use super::classes::{class_rows, render};

#[test]
fn probe_order_per_class() {
    let rows = class_rows(&tern_builtins::builtins());

    insta::assert_snapshot!(render(&rows, Colors::OFF), @r"
    Object           own:Object.prototype
    String           own:String.prototype -> proto1:Object.prototype
    ArrayBufferView  own:ArrayBufferView.prototype -> proto1:Object.prototype
    Uint8Array       proto1:ArrayBufferView.prototype -> proto2:Object.prototype
    NRF              own:NRF -> base:Object.prototype
    Bluetooth        own:Bluetooth -> base:Object.prototype
    ");
}

#[test]
fn rows_name_their_prototype() {
    let rows = class_rows(&tern_builtins::builtins());
    let uint8 = rows.iter().find(|r| r.name == "Uint8Array").unwrap();

    assert_eq!(uint8.prototype.as_deref(), Some("ArrayBufferView"));
    let json = serde_json::to_value(uint8).unwrap();
    assert_eq!(json["probes"][0], "proto1:ArrayBufferView.prototype");
}
