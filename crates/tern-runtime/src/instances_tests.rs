use std::sync::Arc;

use tern_core::{FreeObserver, Heap, TableIndex};

use super::*;

#[test]
fn slots_start_empty() {
    let instances = Instantiations::new(3);

    assert_eq!(instances.len(), 3);
    assert_eq!(instances.get(TableIndex(0)), None);
    assert_eq!(instances.get(TableIndex(7)), None);
    assert_eq!(instances.live_count(), 0);
}

#[test]
fn clear_if_only_clears_a_matching_handle() {
    let mut heap = Heap::new(8);
    let a = heap.new_object().unwrap();
    let b = heap.new_object().unwrap();
    let instances = Instantiations::new(2);

    instances.record(TableIndex(1), b);
    assert!(!instances.clear_if(TableIndex(1), a));
    assert_eq!(instances.get(TableIndex(1)), Some(b));

    assert!(instances.clear_if(TableIndex(1), b));
    assert_eq!(instances.get(TableIndex(1)), None);
}

#[test]
fn freeing_a_tagged_object_clears_its_slot() {
    let instances = Arc::new(Instantiations::new(2));
    let mut heap = Heap::new(8);
    heap.set_observer(instances.clone());

    let id = heap.new_object().unwrap();
    heap.set_native_tag(id, TableIndex(1)).unwrap();
    instances.record(TableIndex(1), id);

    assert!(heap.release(id).unwrap());
    assert_eq!(instances.get(TableIndex(1)), None);
}

#[test]
fn freeing_an_old_object_keeps_the_newer_registration() {
    let instances = Arc::new(Instantiations::new(1));
    let mut heap = Heap::new(8);
    heap.set_observer(instances.clone());

    let old = heap.new_object().unwrap();
    heap.set_native_tag(old, TableIndex(0)).unwrap();
    let new = heap.new_object().unwrap();
    heap.set_native_tag(new, TableIndex(0)).unwrap();
    instances.record(TableIndex(0), new);

    heap.release(old).unwrap();
    assert_eq!(instances.get(TableIndex(0)), Some(new));
}

#[test]
fn observer_ignores_out_of_range_tables() {
    let mut heap = Heap::new(4);
    let id = heap.new_object().unwrap();
    let instances = Instantiations::new(1);

    instances.native_object_freed(id, TableIndex(5));
    instances.record(TableIndex(5), id);
    assert_eq!(instances.live_count(), 0);
}

#[test]
fn reset_empties_everything() {
    let mut heap = Heap::new(4);
    let id = heap.new_object().unwrap();
    let instances = Instantiations::new(2);
    instances.record(TableIndex(0), id);
    instances.record(TableIndex(1), id);
    assert_eq!(instances.live_count(), 2);

    assert!(instances.clear_if(TableIndex(0), id));
    assert_eq!(instances.live_count(), 1);
    instances.reset();
    assert_eq!(instances.live_count(), 0);
}
