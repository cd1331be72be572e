//! Small board shared by the runtime tests.

use std::sync::Arc;

use tern_core::{TableIndex, Value, ValueKind, ViewKind};
use tern_symbols::{ArgSpec, ArgType, ImageBuilder, SymbolImage};

use crate::*;

pub(crate) struct BoardTables {
    pub global: TableIndex,
    pub object_proto: TableIndex,
    pub string_proto: TableIndex,
    pub view_proto: TableIndex,
    pub nrf: TableIndex,
    pub bluetooth: TableIndex,
}

fn get_address(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    call.string("12:34:56:78:90:ab")
}

fn ignore(_call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    Ok(Value::Undefined)
}

fn has_own_property(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let found = match (call.this().as_object(), call.str_arg(0)) {
        (Some(id), Some(name)) => call.heap().field(id, name).is_some(),
        _ => false,
    };
    Ok(Value::Bool(found))
}

fn length(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let len = call
        .this()
        .as_object()
        .and_then(|id| call.heap().bytes(id))
        .map_or(0, <[u8]>::len);
    Ok(Value::Int(len as i32))
}

fn add(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let a = call.heap().to_int(call.arg(0));
    let b = call.heap().to_int(call.arg(1));
    Ok(Value::Int(a.wrapping_add(b)))
}

fn sum(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let heap = call.heap();
    let items = call
        .arg(0)
        .as_object()
        .and_then(|id| heap.array(id))
        .unwrap_or(&[]);
    Ok(Value::Float(items.iter().map(|v| heap.to_float(*v)).sum()))
}

fn to_string(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    call.string("[object Object]")
}

fn echo(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    Ok(call.arg(0))
}

fn fail(_call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    Err(CallError::Thrown("boom".to_owned()))
}

/// Natives in id order: getAddress, ignore, hasOwnProperty, length, add,
/// sum, toString, echo, fail.
pub(crate) fn natives() -> NativeTable {
    let mut natives = NativeTable::new();
    natives.register("getAddress", get_address);
    natives.register("ignore", ignore);
    natives.register("hasOwnProperty", has_own_property);
    natives.register("length", length);
    natives.register("add", add);
    natives.register("sum", sum);
    natives.register("toString", to_string);
    natives.register("echo", echo);
    natives.register("fail", fail);
    natives
}

pub(crate) fn image() -> (SymbolImage, BoardTables) {
    let js = ArgSpec::new(ArgType::JsVar);
    let mut b = ImageBuilder::new();
    let t = BoardTables {
        global: b.add_table("global"),
        object_proto: b.add_table("Object.prototype"),
        string_proto: b.add_table("String.prototype"),
        view_proto: b.add_table("ArrayBufferView.prototype"),
        nrf: b.add_table("NRF"),
        bluetooth: b.add_table("Bluetooth"),
    };
    let f = tern_core::FunctionId;

    b.table_member(t.global, "NRF", t.nrf).unwrap();
    b.table_member(t.global, "Bluetooth", t.bluetooth).unwrap();
    let int2 = ArgSpec::new(ArgType::Int32)
        .param(ArgType::Int32)
        .param(ArgType::Int32);
    b.function(t.global, "add", int2, f(4)).unwrap();
    let packed = ArgSpec::new(ArgType::Float).param(ArgType::ArgumentArray);
    b.function(t.global, "sum", packed, f(5)).unwrap();
    b.function(t.global, "fail", js, f(8)).unwrap();

    let has_own = ArgSpec::new(ArgType::Bool)
        .with_this()
        .param(ArgType::JsVar);
    b.function(t.object_proto, "hasOwnProperty", has_own, f(2))
        .unwrap();
    b.function(t.object_proto, "toString", js.with_this(), f(6))
        .unwrap();

    let len = ArgSpec::new(ArgType::Int32).with_this().immediate();
    b.function(t.string_proto, "length", len, f(3)).unwrap();
    b.function(t.string_proto, "toString", js.with_this(), f(7))
        .unwrap();
    b.function(t.view_proto, "length", len, f(3)).unwrap();

    b.function(t.nrf, "getAddress", js, f(0)).unwrap();
    let one = ArgSpec::new(ArgType::Void).param(ArgType::JsVar);
    b.function(t.nrf, "setConsole", one, f(1)).unwrap();
    b.function(t.nrf, "setServices", one.param(ArgType::JsVar), f(1))
        .unwrap();
    b.function(t.bluetooth, "setConsole", one, f(1)).unwrap();

    (b.build().unwrap(), t)
}

pub(crate) fn is_object(kind: ValueKind) -> bool {
    matches!(
        kind,
        ValueKind::Object
            | ValueKind::Array
            | ValueKind::Function
            | ValueKind::NativeObject(_)
            | ValueKind::ArrayBuffer(_)
    )
}

/// Object ← String, Object ← ArrayBufferView ← Uint8Array, NRF ← Bluetooth.
pub(crate) fn registry(image: &SymbolImage, t: &BoardTables) -> ClassRegistry {
    ClassRegistry::builder()
        .class("Object", Some(t.object_proto), None)
        .class("String", Some(t.string_proto), Some("Object"))
        .class("ArrayBufferView", Some(t.view_proto), Some("Object"))
        .class("Uint8Array", None, Some("ArrayBufferView"))
        .class("NRF", Some(t.nrf), None)
        .class("Bluetooth", Some(t.bluetooth), Some("NRF"))
        .check("Uint8Array", |k| k == ValueKind::ArrayBuffer(ViewKind::Uint8))
        .check("ArrayBufferView", ValueKind::is_array_buffer_view)
        .check("String", |k| k == ValueKind::String)
        .check("Object", is_object)
        .global_table(t.global)
        .base_table(t.object_proto)
        .build(image)
        .unwrap()
}

pub(crate) fn modules(image: &SymbolImage, t: &BoardTables) -> ModuleCatalog {
    ModuleCatalog::builder()
        .library("radio", t.nrf)
        .script("greeting", "exports.hi = 1;")
        .script(BOOT_SCRIPT, "print('boot');")
        .build(image)
        .unwrap()
}

pub(crate) fn builtins() -> (Arc<Builtins>, BoardTables) {
    let (image, t) = image();
    let registry = registry(&image, &t);
    let modules = modules(&image, &t);
    let builtins = Builtins::new(image, registry, natives(), modules).unwrap();
    (Arc::new(builtins), t)
}

pub(crate) fn runtime_with(hooks: Hooks, config: RuntimeConfig) -> (Runtime, BoardTables) {
    let (builtins, t) = builtins();
    (Runtime::new(builtins, hooks, config), t)
}

pub(crate) fn runtime() -> (Runtime, BoardTables) {
    runtime_with(Hooks::new(), RuntimeConfig::new())
}
