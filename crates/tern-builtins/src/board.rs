//! Tables, classes, libraries and hooks of the emulated board.

use std::sync::Arc;

use tern_core::{EventChannel, TableIndex, Value, ValueKind, ViewKind};
use tern_runtime::{
    Builtins, CharQueue, ClassRegistry, Hooks, ModuleCatalog, ModuleError, NativeTable,
    RegistryError, RuntimeError,
};
use tern_symbols::{ArgSpec, ArgType, BuildError, ImageBuilder, SymbolImage};

use crate::natives::{self, Natives};

/// Channel of the board console.
pub const CONSOLE: EventChannel = EventChannel(0);

const CONSOLE_QUEUE: usize = 256;
/// Longest console line kept; longer input is split.
const CONSOLE_LINE: usize = CONSOLE_QUEUE;
/// Bytes the console idle hook handles per pass.
const CONSOLE_BATCH: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("symbol image: {0}")]
    Image(#[from] BuildError),
    #[error("class registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("module catalog: {0}")]
    Module(#[from] ModuleError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("table `{0}` is missing from the image")]
    MissingTable(String),
}

/// Build the board catalog, bundling `scripts` (name, source) and an
/// optional startup script.
pub fn build(scripts: &[(String, String)], boot: Option<&str>) -> Result<Builtins, BoardError> {
    let mut natives = NativeTable::new();
    let ids = natives::register(&mut natives);
    let image = image(&ids)?;
    let registry = registry(&image)?;

    let hash = table(&image, "hash")?;
    let mut modules = ModuleCatalog::builder().library("hash", hash);
    for (name, source) in scripts {
        modules = modules.script(name, source);
    }
    if let Some(source) = boot {
        modules = modules.boot(source);
    }
    let modules = modules.build(&image)?;

    Ok(Builtins::new(image, registry, natives, modules)?)
}

fn table(image: &SymbolImage, name: &str) -> Result<TableIndex, BoardError> {
    image
        .find_table(name)
        .ok_or_else(|| BoardError::MissingTable(name.to_owned()))
}

fn image(f: &Natives) -> Result<SymbolImage, BuildError> {
    let js = ArgSpec::new(ArgType::JsVar);
    let void = ArgSpec::new(ArgType::Void);
    let length = ArgSpec::new(ArgType::Int32).with_this().immediate();

    let mut b = ImageBuilder::new();
    let global = b.add_table("global");
    let object = b.add_table("Object");
    let object_proto = b.add_table("Object.prototype");
    let string_proto = b.add_table("String.prototype");
    let view_proto = b.add_table("ArrayBufferView.prototype");
    let nrf = b.add_table("NRF");
    let bluetooth = b.add_table("Bluetooth");
    let hash = b.add_table("hash");

    b.table_member(global, "Object", object)?;
    b.table_member(global, "NRF", nrf)?;
    b.table_member(global, "Bluetooth", bluetooth)?;

    b.function(object, "keys", js.param(ArgType::JsVar), f.keys)?;

    b.function(
        object_proto,
        "hasOwnProperty",
        ArgSpec::new(ArgType::Bool).with_this().param(ArgType::JsVar),
        f.has_own_property,
    )?;
    b.function(object_proto, "toString", js.with_this(), f.to_string)?;

    b.function(string_proto, "length", length, f.length)?;
    b.function(
        string_proto,
        "charAt",
        js.with_this().param(ArgType::Int32),
        f.char_at,
    )?;
    b.function(string_proto, "toString", js.with_this(), f.to_string)?;

    b.function(view_proto, "length", length, f.length)?;

    let two = void.param(ArgType::JsVar).param(ArgType::JsVar);
    b.function(nrf, "getAddress", js, f.get_address)?;
    b.function(nrf, "getSecurityStatus", js, f.get_security_status)?;
    b.function(nrf, "setAdvertising", two, f.ignore)?;
    b.function(nrf, "setServices", two, f.ignore)?;

    b.function(bluetooth, "setConsole", void, f.ignore)?;

    b.function(hash, "crc32", ArgSpec::new(ArgType::Float).param(ArgType::JsVar), f.crc32)?;

    b.build()
}

fn is_object(kind: ValueKind) -> bool {
    matches!(
        kind,
        ValueKind::Object
            | ValueKind::Array
            | ValueKind::Function
            | ValueKind::NativeObject(_)
            | ValueKind::ArrayBuffer(_)
    )
}

fn registry(image: &SymbolImage) -> Result<ClassRegistry, BoardError> {
    let object_proto = table(image, "Object.prototype")?;
    Ok(ClassRegistry::builder()
        .class("Object", Some(object_proto), None)
        .class("String", Some(table(image, "String.prototype")?), Some("Object"))
        .class(
            "ArrayBufferView",
            Some(table(image, "ArrayBufferView.prototype")?),
            Some("Object"),
        )
        .class("Uint8Array", None, Some("ArrayBufferView"))
        .class("NRF", Some(table(image, "NRF")?), None)
        .class("Bluetooth", Some(table(image, "Bluetooth")?), None)
        .check("Uint8Array", |k| k == ValueKind::ArrayBuffer(ViewKind::Uint8))
        .check("ArrayBufferView", ValueKind::is_array_buffer_view)
        .check("String", |k| k == ValueKind::String)
        .check("Object", is_object)
        .global_table(table(image, "global")?)
        .base_table(object_proto)
        .build(image)?)
}

fn hw_init() {
    log::debug!("emulated board ready");
}

/// Board hooks. Console bytes are queued from the character hook and
/// collected into lines by the idle hook; the last complete line is kept
/// on the global object as `consoleLine`.
pub fn hooks() -> Hooks {
    let queue = Arc::new(CharQueue::with_capacity(CONSOLE_QUEUE));
    let producer = Arc::clone(&queue);
    let mut line = Vec::new();

    Hooks::new()
        .on_hw_init(hw_init)
        .on_init(|_| log::debug!("board libraries initialized"))
        .on_char(CONSOLE, move |byte| producer.push(byte))
        .on_idle(move |rt| {
            for _ in 0..CONSOLE_BATCH {
                let Some(byte) = queue.pop() else {
                    return false;
                };
                if byte != b'\n' {
                    line.push(byte);
                    if line.len() < CONSOLE_LINE {
                        continue;
                    }
                }
                let text = String::from_utf8_lossy(&line).into_owned();
                line.clear();
                log::info!("console: {text}");
                let root = rt.heap().root();
                match rt.heap_mut().new_string(&text) {
                    Ok(id) => {
                        if let Err(err) = rt.heap_mut().set_field(root, "consoleLine", Value::Ref(id)) {
                            log::warn!("console line dropped: {err}");
                        }
                    }
                    Err(err) => log::warn!("console line dropped: {err}"),
                }
            }
            !queue.is_empty()
        })
        .on_kill(|_| log::debug!("board libraries stopped"))
}
