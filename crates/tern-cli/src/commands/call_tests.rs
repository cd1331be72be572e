use serde_json::json;
use tern_core::{Heap, Value};
use tern_runtime::Runtime;

use super::call::*;
use super::catalog_loader::{Scripts, start_runtime};

fn runtime() -> Runtime {
    start_runtime(&Scripts::default()).unwrap()
}

#[test]
fn calls_a_member_of_a_global_native_object() {
    let mut rt = runtime();
    let result = call_path(&mut rt, "NRF.getAddress", &[]).unwrap();
    assert_eq!(result, json!("12:34:56:78:90:ab"));
}

#[test]
fn first_segment_falls_back_to_library_modules() {
    let mut rt = runtime();
    let result = call_path(&mut rt, "hash.crc32", &[json!("hello")]).unwrap();
    assert_eq!(result, json!(907_060_870.0));
}

#[test]
fn native_errors_are_reported() {
    let mut rt = runtime();
    let err = call_path(&mut rt, "hash.crc32", &[json!(1)]).unwrap_err();
    assert_eq!(err, "crc32 expects a string or buffer");
}

#[test]
fn object_arguments_reach_natives() {
    let mut rt = runtime();
    let result = call_path(&mut rt, "Object.keys", &[json!({"k": 1})]).unwrap();
    assert_eq!(result, json!(["k"]));
}

#[test]
fn non_function_without_args_prints_the_value() {
    let mut rt = runtime();
    assert_eq!(call_path(&mut rt, "NRF", &[]).unwrap(), json!({}));

    let err = call_path(&mut rt, "NRF", &[json!(1)]).unwrap_err();
    assert_eq!(err, "'NRF' is not a function");
}

#[test]
fn undefined_segments_are_named() {
    let mut rt = runtime();

    let err = call_path(&mut rt, "nope.x", &[]).unwrap_err();
    assert_eq!(err, "'nope' is undefined");

    let err = call_path(&mut rt, "NRF.nope", &[]).unwrap_err();
    assert_eq!(err, "'NRF.nope' is undefined");
}

#[test]
fn json_numbers_prefer_int() {
    let mut heap = Heap::new(16);

    assert_eq!(to_value(&mut heap, &json!(7)).unwrap(), Value::Int(7));
    assert_eq!(to_value(&mut heap, &json!(1.5)).unwrap(), Value::Float(1.5));
    assert_eq!(
        to_value(&mut heap, &json!(3_000_000_000u64)).unwrap(),
        Value::Float(3_000_000_000.0)
    );
    assert_eq!(to_value(&mut heap, &json!(null)).unwrap(), Value::Null);
}

#[test]
fn json_containers_round_through_the_heap() {
    let mut heap = Heap::new(16);
    let input = json!(["a", [1, true]]);
    let value = to_value(&mut heap, &input).unwrap();

    assert_eq!(heap.to_json(value), input);
}

#[test]
fn bad_json_argument() {
    let err = parse_json_args(&["1".to_owned(), "oops".to_owned()]).unwrap_err();
    assert!(err.starts_with("argument 'oops' is not JSON: "), "{err}");
}
