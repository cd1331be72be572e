use tern_core::{FunctionId, Heap, HeapError, Value};
use tern_symbols::{ArgSpec, ArgType};

use super::*;
use crate::fixtures;

const ADD: FunctionId = FunctionId(4);
const SUM: FunctionId = FunctionId(5);
const ECHO: FunctionId = FunctionId(7);

#[test]
fn coerces_to_declared_parameters() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(16);
    let three = Value::Ref(heap.new_string("3").unwrap());
    let spec = ArgSpec::new(ArgType::Int32)
        .param(ArgType::Int32)
        .param(ArgType::Int32);

    let result = invoke(&mut heap, &natives, ADD, spec, Value::Undefined, &[Value::Float(2.9), three]);
    assert_eq!(result, Ok(Value::Int(5)));

    // missing arguments arrive as undefined, which is 0 as an int
    let result = invoke(&mut heap, &natives, ADD, spec, Value::Undefined, &[Value::Int(7)]);
    assert_eq!(result, Ok(Value::Int(7)));
}

#[test]
fn argument_array_packs_the_rest() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(16);
    let live = heap.live_count();
    let spec = ArgSpec::new(ArgType::Float).param(ArgType::ArgumentArray);

    let args = [Value::Int(1), Value::Float(2.5), Value::Bool(true)];
    let result = invoke(&mut heap, &natives, SUM, spec, Value::Undefined, &args);

    assert_eq!(result, Ok(Value::Float(4.5)));
    assert_eq!(heap.live_count(), live, "packed array is released");
}

#[test]
fn packed_references_survive_the_call() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(16);
    let text = heap.new_string("2").unwrap();
    let spec = ArgSpec::new(ArgType::Float).param(ArgType::ArgumentArray);

    let result = invoke(&mut heap, &natives, SUM, spec, Value::Undefined, &[Value::Ref(text)]);

    assert_eq!(result, Ok(Value::Float(2.0)));
    assert_eq!(heap.refs(text), Some(1));
}

#[test]
fn failed_packing_releases_the_arguments() {
    let natives = fixtures::natives();
    // root plus one object fills the heap
    let mut heap = Heap::new(2);
    let object = heap.new_object().unwrap();
    let spec = ArgSpec::new(ArgType::Float).param(ArgType::ArgumentArray);

    let result = invoke(&mut heap, &natives, SUM, spec, Value::Undefined, &[Value::Ref(object)]);

    assert!(matches!(
        result,
        Err(CallError::Heap(HeapError::OutOfMemory { capacity: 2 }))
    ));
    assert_eq!(heap.refs(object), Some(1));
    heap.release(object).unwrap();
    assert!(!heap.is_live(object));
}

#[test]
fn pins_are_clamped() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(4);
    let spec = ArgSpec::new(ArgType::Pin).param(ArgType::Pin);
    let mut echo = |v| invoke(&mut heap, &natives, ECHO, spec, Value::Undefined, &[v]);

    assert_eq!(echo(Value::Int(-5)), Ok(Value::Pin(0)));
    assert_eq!(echo(Value::Int(70_000)), Ok(Value::Pin(u16::MAX)));
    assert_eq!(echo(Value::Pin(12)), Ok(Value::Pin(12)));
}

#[test]
fn return_values_follow_the_declared_type() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(8);
    let live = heap.live_count();

    let as_bool = ArgSpec::new(ArgType::Bool).param(ArgType::JsVar);
    let result = invoke(&mut heap, &natives, ECHO, as_bool, Value::Undefined, &[Value::Int(3)]);
    assert_eq!(result, Ok(Value::Bool(true)));

    // a void native that still hands back a string must not leak it
    let void = ArgSpec::new(ArgType::Void);
    let result = invoke(&mut heap, &natives, FunctionId(0), void, Value::Undefined, &[]);
    assert_eq!(result, Ok(Value::Undefined));
    assert_eq!(heap.live_count(), live);
}

#[test]
fn this_is_only_passed_when_declared() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(8);
    let object = heap.new_object().unwrap();
    heap.set_field(object, "x", Value::Int(1)).unwrap();
    let name = Value::Ref(heap.new_string("x").unwrap());
    let this = Value::Ref(object);

    let with_this = ArgSpec::new(ArgType::Bool).with_this().param(ArgType::JsVar);
    let result = invoke(&mut heap, &natives, FunctionId(2), with_this, this, &[name]);
    assert_eq!(result, Ok(Value::Bool(true)));

    let without = ArgSpec::new(ArgType::Bool).param(ArgType::JsVar);
    let result = invoke(&mut heap, &natives, FunctionId(2), without, this, &[name]);
    assert_eq!(result, Ok(Value::Bool(false)));
}

#[test]
fn errors_propagate() {
    let natives = fixtures::natives();
    let mut heap = Heap::new(4);
    let spec = ArgSpec::new(ArgType::JsVar);

    let err = invoke(&mut heap, &natives, FunctionId(8), spec, Value::Undefined, &[]);
    assert_eq!(err, Err(CallError::Thrown("boom".to_owned())));

    let err = invoke(&mut heap, &natives, FunctionId(99), spec, Value::Undefined, &[]);
    assert_eq!(err, Err(CallError::UnknownFunction(FunctionId(99))));
}

#[test]
fn table_names_registrations() {
    let natives = fixtures::natives();

    assert_eq!(natives.len(), 9);
    assert_eq!(natives.name(FunctionId(0)), Some("getAddress"));
    assert_eq!(natives.name(FunctionId(9)), None);
    assert!(natives.get(FunctionId(8)).is_some());
}
