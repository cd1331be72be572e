//! Core data types for the tern built-in runtime.
//!
//! This crate provides:
//! - Index newtypes shared by the symbol image and the runtime
//! - The value model (`Value`, `ValueKind`) and a handle-based `Heap`
//! - Terminal color palette for dumps and traces

pub mod colors;
pub mod heap;
pub mod ids;
pub mod value;

#[cfg(test)]
mod heap_tests;
#[cfg(test)]
mod value_tests;

pub use colors::Colors;
pub use heap::{FreeObserver, Heap, HeapError, HeapObject, ObjectKind};
pub use ids::{EventChannel, FunctionId, ObjectId, TableIndex};
pub use value::{Value, ValueKind, ViewKind};
