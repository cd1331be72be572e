use std::sync::{Arc, Mutex};

use super::*;

#[derive(Default)]
struct RecordingObserver {
    freed: Mutex<Vec<(ObjectId, TableIndex)>>,
}

impl FreeObserver for RecordingObserver {
    fn native_object_freed(&self, id: ObjectId, table: TableIndex) {
        self.freed.lock().unwrap().push((id, table));
    }
}

#[test]
fn root_is_live_and_permanent() {
    let mut heap = Heap::new(8);
    let root = heap.root();

    assert_eq!(heap.kind(Value::Ref(root)), ValueKind::Root);
    assert_eq!(heap.release(root), Ok(false));
    assert!(heap.is_live(root));
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn release_frees_and_invalidates_handle() {
    let mut heap = Heap::new(8);
    let id = heap.new_object().unwrap();
    assert!(heap.is_live(id));

    assert_eq!(heap.release(id), Ok(true));
    assert!(!heap.is_live(id));
    assert_eq!(heap.kind(Value::Ref(id)), ValueKind::Undefined);
    assert_eq!(heap.release(id), Err(HeapError::StaleHandle(id)));
}

#[test]
fn reused_slot_gets_new_generation() {
    let mut heap = Heap::new(8);
    let first = heap.new_object().unwrap();
    heap.release(first).unwrap();

    let second = heap.new_object().unwrap();
    assert_eq!(first.index(), second.index());
    assert_ne!(first, second);
    assert!(!heap.is_live(first));
    assert!(heap.is_live(second));
}

#[test]
fn retain_keeps_object_alive() {
    let mut heap = Heap::new(8);
    let id = heap.new_object().unwrap();
    heap.retain(id).unwrap();

    assert_eq!(heap.release(id), Ok(false));
    assert_eq!(heap.refs(id), Some(1));
    assert_eq!(heap.release(id), Ok(true));
}

#[test]
fn capacity_is_enforced() {
    let mut heap = Heap::new(2);
    heap.new_object().unwrap();

    assert_eq!(
        heap.new_object(),
        Err(HeapError::OutOfMemory { capacity: 2 })
    );
}

#[test]
fn freeing_parent_releases_children() {
    let mut heap = Heap::new(8);
    let parent = heap.new_object().unwrap();
    let child = heap.new_string("hi").unwrap();
    heap.set_field(parent, "greeting", Value::Ref(child)).unwrap();

    heap.release(parent).unwrap();

    assert!(!heap.is_live(child));
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn set_field_releases_previous_value() {
    let mut heap = Heap::new(8);
    let obj = heap.new_object().unwrap();
    let old = heap.new_string("old").unwrap();
    heap.set_field(obj, "x", Value::Ref(old)).unwrap();
    heap.set_field(obj, "x", Value::Int(1)).unwrap();

    assert!(!heap.is_live(old));
    assert_eq!(heap.field(obj, "x"), Some(Value::Int(1)));
}

#[test]
fn observer_sees_freed_native_objects_only() {
    let observer = Arc::new(RecordingObserver::default());
    let mut heap = Heap::new(8);
    heap.set_observer(observer.clone());

    let plain = heap.new_object().unwrap();
    let native = heap.new_object().unwrap();
    heap.set_native_tag(native, TableIndex(3)).unwrap();

    heap.release(plain).unwrap();
    heap.release(native).unwrap();

    let freed = observer.freed.lock().unwrap();
    assert_eq!(freed.as_slice(), &[(native, TableIndex(3))]);
}

#[test]
fn native_tag_changes_kind() {
    let mut heap = Heap::new(8);
    let id = heap.new_object().unwrap();
    assert_eq!(heap.kind(Value::Ref(id)), ValueKind::Object);

    heap.set_native_tag(id, TableIndex(5)).unwrap();
    assert_eq!(heap.native_tag(id), Some(TableIndex(5)));
    assert_eq!(
        heap.kind(Value::Ref(id)),
        ValueKind::NativeObject(TableIndex(5))
    );
}

#[test]
fn iter_skips_free_slots() {
    let mut heap = Heap::new(8);
    let a = heap.new_object().unwrap();
    let b = heap.new_object().unwrap();
    heap.release(a).unwrap();

    let ids: Vec<_> = heap.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![heap.root(), b]);
}

#[test]
fn coercions() {
    let mut heap = Heap::new(8);
    let num = heap.new_string(" 42 ").unwrap();
    let empty = heap.new_string("").unwrap();

    assert_eq!(heap.to_int(Value::Ref(num)), 42);
    assert_eq!(heap.to_int(Value::Float(3.9)), 3);
    assert_eq!(heap.to_int(Value::Undefined), 0);
    assert_eq!(heap.to_int(Value::Bool(true)), 1);
    assert!(heap.to_float(Value::Undefined).is_nan());
    assert!(!heap.to_bool(Value::Ref(empty)));
    assert!(heap.to_bool(Value::Ref(num)));
    assert!(!heap.to_bool(Value::Float(f64::NAN)));
}

#[test]
fn json_rendering() {
    let mut heap = Heap::new(8);
    let obj = heap.new_object().unwrap();
    let name = heap.new_string("nrf").unwrap();
    let list = heap.new_array(vec![Value::Int(1), Value::Bool(false)]).unwrap();
    heap.set_field(obj, "name", Value::Ref(name)).unwrap();
    heap.set_field(obj, "list", Value::Ref(list)).unwrap();

    let json = heap.to_json(Value::Ref(obj));
    assert_eq!(json.to_string(), r#"{"name":"nrf","list":[1,false]}"#);
}
