//! Script values as seen by the built-in resolver.

use crate::ids::{ObjectId, TableIndex};

/// A script value. Immediates are stored inline; everything else is a heap
/// handle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i32),
    Float(f64),
    /// Hardware pin number.
    Pin(u16),
    Ref(ObjectId),
}

impl Value {
    pub fn as_object(self) -> Option<ObjectId> {
        match self {
            Value::Ref(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Ref(id)
    }
}

/// Element type of an array buffer or typed-array view over one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// The raw buffer itself, not a view.
    ArrayBuffer,
    Uint8,
    Uint8Clamped,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
}

impl ViewKind {
    pub fn class_name(self) -> &'static str {
        match self {
            ViewKind::ArrayBuffer => "ArrayBuffer",
            ViewKind::Uint8 => "Uint8Array",
            ViewKind::Uint8Clamped => "Uint8ClampedArray",
            ViewKind::Int8 => "Int8Array",
            ViewKind::Uint16 => "Uint16Array",
            ViewKind::Int16 => "Int16Array",
            ViewKind::Uint32 => "Uint32Array",
            ViewKind::Int32 => "Int32Array",
            ViewKind::Float32 => "Float32Array",
            ViewKind::Float64 => "Float64Array",
        }
    }

    pub fn element_size(self) -> usize {
        match self {
            ViewKind::ArrayBuffer
            | ViewKind::Uint8
            | ViewKind::Uint8Clamped
            | ViewKind::Int8 => 1,
            ViewKind::Uint16 | ViewKind::Int16 => 2,
            ViewKind::Uint32 | ViewKind::Int32 | ViewKind::Float32 => 4,
            ViewKind::Float64 => 8,
        }
    }

    pub fn is_view(self) -> bool {
        self != ViewKind::ArrayBuffer
    }
}

/// Representation class of a value, as reported by [`crate::Heap::kind`].
///
/// This is the "class tag query" the registry's representation checks run
/// against. A stale handle reports `Undefined`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Int,
    Float,
    Pin,
    String,
    Array,
    ArrayBuffer(ViewKind),
    Function,
    Object,
    /// Object carrying a native-object tag.
    NativeObject(TableIndex),
    /// The global root object.
    Root,
}

impl ValueKind {
    pub fn is_number(self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::Float)
    }

    pub fn is_array_buffer_view(self) -> bool {
        matches!(self, ValueKind::ArrayBuffer(view) if view.is_view())
    }
}
