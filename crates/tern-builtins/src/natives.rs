//! Native implementations behind the board's symbol tables.
//!
//! The radio entries are emulation stubs: they accept their arguments and
//! return fixed values.

use tern_core::{FunctionId, Value};
use tern_runtime::{CallError, NativeCall, NativeTable};

macro_rules! define_natives {
    ($($id:ident => $native:path),* $(,)?) => {
        /// Function ids handed out at registration.
        pub(crate) struct Natives {
            $(pub $id: FunctionId,)*
        }

        pub(crate) fn register(table: &mut NativeTable) -> Natives {
            Natives {
                $($id: table.register(stringify!($id), $native),)*
            }
        }
    };
}

define_natives! {
    has_own_property => has_own_property,
    to_string => to_string,
    keys => keys,
    length => length,
    char_at => char_at,
    get_address => get_address,
    get_security_status => get_security_status,
    ignore => ignore,
    crc32 => crc32,
}

const ADDRESS: &str = "12:34:56:78:90:ab";

fn has_own_property(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let found = match (call.this().as_object(), call.str_arg(0)) {
        (Some(id), Some(name)) => call.heap().field(id, name).is_some(),
        _ => false,
    };
    Ok(Value::Bool(found))
}

fn to_string(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let text = match call.this().as_object() {
        Some(id) => match call.heap().string(id) {
            Some(s) => s.to_owned(),
            None => "[object Object]".to_owned(),
        },
        None => call.heap().to_json(call.this()).to_string(),
    };
    call.string(&text)
}

fn keys(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let names: Vec<String> = call
        .arg(0)
        .as_object()
        .and_then(|id| call.heap().get(id))
        .map(|object| object.fields().map(|(name, _)| name.to_owned()).collect())
        .unwrap_or_default();

    let mut items = Vec::with_capacity(names.len());
    for name in &names {
        match call.heap_mut().new_string(name) {
            Ok(id) => items.push(Value::Ref(id)),
            Err(err) => {
                for item in items {
                    call.heap_mut().release_value(item);
                }
                return Err(err.into());
            }
        }
    }
    Ok(Value::Ref(call.heap_mut().new_array(items)?))
}

fn length(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let this = call.this().as_object();
    let len = match this {
        Some(id) => match call.heap().array(id) {
            Some(items) => items.len(),
            None => call.heap().bytes(id).map_or(0, <[u8]>::len),
        },
        None => 0,
    };
    Ok(Value::Int(len as i32))
}

fn char_at(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let index = call.heap().to_int(call.arg(0));
    let text = call
        .this()
        .as_object()
        .and_then(|id| call.heap().string(id))
        .and_then(|s| usize::try_from(index).ok().and_then(|i| s.chars().nth(i)))
        .map(String::from)
        .unwrap_or_default();
    call.string(&text)
}

fn get_address(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    call.string(ADDRESS)
}

fn get_security_status(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    Ok(Value::Ref(call.heap_mut().new_object()?))
}

fn ignore(_call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    Ok(Value::Undefined)
}

fn crc32(call: &mut NativeCall<'_>) -> Result<Value, CallError> {
    let data = call.arg(0);
    let Some(bytes) = data.as_object().and_then(|id| call.heap().bytes(id)) else {
        return Err(CallError::Thrown("crc32 expects a string or buffer".to_owned()));
    };
    Ok(Value::Float(crc32fast::hash(bytes) as f64))
}
