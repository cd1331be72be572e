use std::path::PathBuf;

use serde_json::Value as Json;
use tern_core::{Heap, HeapError, Value};
use tern_runtime::{CallError, ResolvedModule, Runtime, RuntimeError};

use super::catalog_loader::{load_scripts, start_runtime};

pub struct CallArgs {
    pub path: String,
    pub args: Vec<String>,
    pub modules: Vec<String>,
    pub boot: Option<PathBuf>,
}

pub fn run(args: CallArgs) {
    let mut runtime = match load_scripts(&args.modules, args.boot.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|scripts| start_runtime(&scripts))
    {
        Ok(runtime) => runtime,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let json_args = match parse_json_args(&args.args) {
        Ok(values) => values,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    match call_path(&mut runtime, &args.path, &json_args) {
        Ok(result) => println!("{}", result),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

pub fn parse_json_args(args: &[String]) -> Result<Vec<Json>, String> {
    args.iter()
        .map(|arg| {
            serde_json::from_str(arg).map_err(|e| format!("argument '{}' is not JSON: {}", arg, e))
        })
        .collect()
}

/// Walk a dotted path and call the last member with the path's parent as
/// `this`.
///
/// The first segment is looked up on the global object, then among native
/// library modules. A non-function at the end of the path is printed as is
/// when no arguments were given.
pub fn call_path(runtime: &mut Runtime, path: &str, args: &[Json]) -> Result<Json, String> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut receiver = runtime.global();
    let mut target = root_member(runtime, first)?;
    let mut walked = first.to_owned();

    for segment in segments {
        if target.is_undefined() {
            return Err(format!("'{}' is undefined", walked));
        }
        receiver = target;
        target = runtime
            .get_property(receiver, segment)
            .map_err(|e| e.to_string())?;
        walked.push('.');
        walked.push_str(segment);
    }
    if target.is_undefined() {
        return Err(format!("'{}' is undefined", walked));
    }

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        let value = to_value(runtime.heap_mut(), arg).map_err(|e| e.to_string())?;
        values.push(value);
    }

    let outcome = runtime.call(target, receiver, &values);
    for value in values {
        runtime.release(value);
    }
    let result = match outcome {
        Ok(value) => value,
        Err(RuntimeError::Call(CallError::NotCallable)) if args.is_empty() => target,
        Err(RuntimeError::Call(CallError::NotCallable)) => {
            return Err(format!("'{}' is not a function", walked));
        }
        Err(e) => return Err(e.to_string()),
    };

    let json = runtime.heap().to_json(result);
    if result != target {
        runtime.release(result);
    }
    Ok(json)
}

fn root_member(runtime: &mut Runtime, name: &str) -> Result<Value, String> {
    let global = runtime.global();
    let value = runtime
        .get_property(global, name)
        .map_err(|e| e.to_string())?;
    if !value.is_undefined() {
        return Ok(value);
    }
    match runtime.resolve_module(name).map_err(|e| e.to_string())? {
        Some(ResolvedModule::Native(module)) => Ok(module),
        Some(ResolvedModule::Script(_)) => Err(format!(
            "'{}' is a script module and cannot be called into",
            name
        )),
        None => Ok(Value::Undefined),
    }
}

/// Build a heap value from JSON. Integers that fit become `Int`, other
/// numbers `Float`.
pub fn to_value(heap: &mut Heap, json: &Json) -> Result<Value, HeapError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Ref(heap.new_string(s)?),
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(to_value(heap, item)?);
            }
            Value::Ref(heap.new_array(values)?)
        }
        Json::Object(fields) => {
            let id = heap.new_object()?;
            for (name, item) in fields {
                let value = to_value(heap, item)?;
                heap.set_field(id, name, value)?;
            }
            Value::Ref(id)
        }
    })
}
