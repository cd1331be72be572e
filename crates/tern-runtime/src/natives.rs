//! Native function table and argument marshalling.
//!
//! A symbol entry names a native by [`FunctionId`] and describes its
//! signature with an [`ArgSpec`]. [`invoke`] converts script arguments to
//! the declared parameter types, runs the native, and converts its result
//! to the declared return type.

use std::fmt;

use tern_core::{FunctionId, Heap, Value};
use tern_symbols::{ArgSpec, ArgType};

use crate::error::CallError;

/// Arguments and heap access for one native call.
pub struct NativeCall<'h> {
    heap: &'h mut Heap,
    this: Value,
    args: Vec<Value>,
}

impl<'h> NativeCall<'h> {
    pub fn new(heap: &'h mut Heap, this: Value, args: Vec<Value>) -> Self {
        Self { heap, this, args }
    }

    pub fn heap(&self) -> &Heap {
        self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut *self.heap
    }

    /// `Undefined` unless the signature asks for `this`.
    pub fn this(&self) -> Value {
        self.this
    }

    /// Marshalled argument `i`, or `Undefined` past the end.
    pub fn arg(&self, i: usize) -> Value {
        self.args.get(i).copied().unwrap_or_default()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Allocate a string the caller will own.
    pub fn string(&mut self, text: &str) -> Result<Value, CallError> {
        Ok(Value::Ref(self.heap.new_string(text)?))
    }

    /// Text of a string argument.
    pub fn str_arg(&self, i: usize) -> Option<&str> {
        self.heap.string(self.arg(i).as_object()?)
    }
}

/// A native entry point. The returned value is owned by the caller.
pub type NativeFn = fn(&mut NativeCall<'_>) -> Result<Value, CallError>;

/// Natives addressed by [`FunctionId`], in registration order.
#[derive(Default)]
pub struct NativeTable {
    entries: Vec<(&'static str, NativeFn)>,
}

impl fmt::Debug for NativeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, f: NativeFn) -> FunctionId {
        let id = FunctionId(self.entries.len() as u32);
        self.entries.push((name, f));
        id
    }

    pub fn get(&self, id: FunctionId) -> Option<NativeFn> {
        self.entries.get(id.as_usize()).map(|(_, f)| *f)
    }

    pub fn name(&self, id: FunctionId) -> Option<&'static str> {
        self.entries.get(id.as_usize()).map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Call native `function` with `spec`'s marshalling.
///
/// Borrows `this` and `args`; the result is owned by the caller.
/// `ArgumentArray` packs every remaining argument into one array.
pub fn invoke(
    heap: &mut Heap,
    natives: &NativeTable,
    function: FunctionId,
    spec: ArgSpec,
    this: Value,
    args: &[Value],
) -> Result<Value, CallError> {
    let f = natives
        .get(function)
        .ok_or(CallError::UnknownFunction(function))?;

    let mut marshalled = Vec::with_capacity(spec.param_count());
    let mut rest = args.iter().copied();
    for ty in spec.params() {
        let value = match ty {
            ArgType::ArgumentArray => {
                let items: Vec<Value> = rest.by_ref().collect();
                for item in &items {
                    heap.retain_value(*item);
                }
                match heap.new_array(items.clone()) {
                    Ok(id) => Value::Ref(id),
                    Err(err) => {
                        for item in items {
                            heap.release_value(item);
                        }
                        release_packed(heap, spec, marshalled);
                        return Err(err.into());
                    }
                }
            }
            other => coerce(heap, other, rest.next().unwrap_or_default()),
        };
        marshalled.push(value);
    }

    let this = if spec.has_this() { this } else { Value::Undefined };
    let mut call = NativeCall::new(heap, this, marshalled);
    let result = f(&mut call);
    let NativeCall { args: packed, .. } = call;

    release_packed(heap, spec, packed);

    let result = result?;
    let converted = coerce(heap, spec.return_type(), result);
    if converted != result {
        heap.release_value(result);
    }
    Ok(converted)
}

/// Release the argument arrays `invoke` allocated; nothing else in
/// `marshalled` is owned.
fn release_packed(heap: &mut Heap, spec: ArgSpec, marshalled: Vec<Value>) {
    for (ty, value) in spec.params().zip(marshalled) {
        if ty == ArgType::ArgumentArray {
            heap.release_value(value);
        }
    }
}

/// Convert `value` to `ty`. References pass through untouched for `JsVar`.
pub(crate) fn coerce(heap: &Heap, ty: ArgType, value: Value) -> Value {
    match ty {
        ArgType::Void => Value::Undefined,
        ArgType::JsVar | ArgType::ArgumentArray => value,
        ArgType::Bool => Value::Bool(heap.to_bool(value)),
        ArgType::Int32 => Value::Int(heap.to_int(value)),
        ArgType::Float => Value::Float(heap.to_float(value)),
        ArgType::Pin => match value {
            Value::Pin(p) => Value::Pin(p),
            other => Value::Pin(heap.to_int(other).clamp(0, u16::MAX as i32) as u16),
        },
    }
}
