//! Handle-based, reference-counted object heap.
//!
//! Objects live in generation-checked slots. Handles (`ObjectId`) stay valid
//! for as long as the object holds at least one reference; once freed, the
//! slot's generation moves on and the old handle is rejected everywhere.
//!
//! Ownership convention: constructors return an object holding one
//! reference, owned by the caller. Operations that store a value inside
//! another object (`new_array`, `set_field`) take over the caller's
//! reference. Freeing an object releases everything it owns.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ids::{FunctionId, ObjectId, TableIndex};
use crate::value::{Value, ValueKind, ViewKind};

/// Heap operation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    #[error("heap exhausted: {capacity} objects live")]
    OutOfMemory { capacity: usize },
    #[error("stale object handle {0:?}")]
    StaleHandle(ObjectId),
}

/// Notified when an object carrying a native-object tag is freed.
///
/// Called synchronously from inside the heap, so implementations must not
/// touch the heap and must not block.
pub trait FreeObserver: Send + Sync {
    fn native_object_freed(&self, id: ObjectId, table: TableIndex);
}

/// Payload of a heap object.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Object,
    /// The global root object; never freed.
    Root,
    String(String),
    Array(Vec<Value>),
    ArrayBuffer { view: ViewKind, bytes: Vec<u8> },
    /// Callable built-in. `spec` is the raw packed argument spec.
    NativeFunction { function: FunctionId, spec: u16 },
}

/// A heap object: payload, optional native-object tag, dynamic fields.
#[derive(Clone, Debug, PartialEq)]
pub struct HeapObject {
    kind: ObjectKind,
    native: Option<TableIndex>,
    fields: IndexMap<String, Value>,
}

impl HeapObject {
    fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            native: None,
            fields: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn native_tag(&self) -> Option<TableIndex> {
        self.native
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).copied()
    }

    /// Dynamic fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn owned_refs(&self) -> Vec<ObjectId> {
        let elements = match &self.kind {
            ObjectKind::Array(items) => items.as_slice(),
            _ => &[],
        };
        elements
            .iter()
            .chain(self.fields.values())
            .filter_map(|v| v.as_object())
            .collect()
    }
}

struct Entry {
    refs: u32,
    object: HeapObject,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Object heap with a fixed capacity.
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    capacity: usize,
    root: ObjectId,
    observer: Option<Arc<dyn FreeObserver>>,
}

impl fmt::Debug for Heap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("live", &self.live)
            .field("capacity", &self.capacity)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl Heap {
    /// Create a heap holding at most `capacity` objects, the root included.
    pub fn new(capacity: usize) -> Self {
        let root = ObjectId::new(0, 1);
        Self {
            slots: vec![Slot {
                generation: 1,
                entry: Some(Entry {
                    refs: 1,
                    object: HeapObject::new(ObjectKind::Root),
                }),
            }],
            free: Vec::new(),
            live: 1,
            capacity: capacity.max(1),
            root,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: Arc<dyn FreeObserver>) {
        self.observer = Some(observer);
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn alloc(&mut self, kind: ObjectKind) -> Result<ObjectId, HeapError> {
        if self.live >= self.capacity {
            return Err(HeapError::OutOfMemory {
                capacity: self.capacity,
            });
        }
        let entry = Entry {
            refs: 1,
            object: HeapObject::new(kind),
        };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return Ok(ObjectId::new(index, slot.generation));
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            entry: Some(entry),
        });
        Ok(ObjectId::new(index, 1))
    }

    pub fn new_object(&mut self) -> Result<ObjectId, HeapError> {
        self.alloc(ObjectKind::Object)
    }

    pub fn new_string(&mut self, text: &str) -> Result<ObjectId, HeapError> {
        self.alloc(ObjectKind::String(text.to_owned()))
    }

    /// Takes over the references held by `items`.
    pub fn new_array(&mut self, items: Vec<Value>) -> Result<ObjectId, HeapError> {
        self.alloc(ObjectKind::Array(items))
    }

    pub fn new_array_buffer(
        &mut self,
        view: ViewKind,
        bytes: Vec<u8>,
    ) -> Result<ObjectId, HeapError> {
        self.alloc(ObjectKind::ArrayBuffer { view, bytes })
    }

    pub fn new_native_function(
        &mut self,
        function: FunctionId,
        spec: u16,
    ) -> Result<ObjectId, HeapError> {
        self.alloc(ObjectKind::NativeFunction { function, spec })
    }

    fn entry(&self, id: ObjectId) -> Option<&Entry> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: ObjectId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    pub fn get(&self, id: ObjectId) -> Option<&HeapObject> {
        self.entry(id).map(|e| &e.object)
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.entry(id).is_some()
    }

    pub fn refs(&self, id: ObjectId) -> Option<u32> {
        self.entry(id).map(|e| e.refs)
    }

    pub fn retain(&mut self, id: ObjectId) -> Result<(), HeapError> {
        let entry = self.entry_mut(id).ok_or(HeapError::StaleHandle(id))?;
        entry.refs = entry.refs.saturating_add(1);
        Ok(())
    }

    /// Retain if `value` is a heap reference. Stale handles are ignored.
    pub fn retain_value(&mut self, value: Value) {
        if let Value::Ref(id) = value {
            let _ = self.retain(id);
        }
    }

    /// Drop one reference. Returns `true` if the object was freed.
    pub fn release(&mut self, id: ObjectId) -> Result<bool, HeapError> {
        if id == self.root {
            return Ok(false);
        }
        let entry = self.entry_mut(id).ok_or(HeapError::StaleHandle(id))?;
        entry.refs -= 1;
        if entry.refs > 0 {
            return Ok(false);
        }
        self.free_cascade(id);
        Ok(true)
    }

    /// Release if `value` is a heap reference. Stale handles are ignored.
    pub fn release_value(&mut self, value: Value) {
        if let Value::Ref(id) = value {
            let _ = self.release(id);
        }
    }

    fn free_cascade(&mut self, start: ObjectId) {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let slot = &mut self.slots[id.index() as usize];
            let Some(entry) = slot.entry.take() else {
                continue;
            };
            slot.generation = match slot.generation.wrapping_add(1) {
                0 => 1,
                g => g,
            };
            self.free.push(id.index());
            self.live -= 1;

            if let (Some(table), Some(observer)) = (entry.object.native, &self.observer) {
                observer.native_object_freed(id, table);
            }

            for child in entry.object.owned_refs() {
                if child == self.root {
                    continue;
                }
                if let Some(child_entry) = self.entry_mut(child) {
                    child_entry.refs -= 1;
                    if child_entry.refs == 0 {
                        pending.push(child);
                    }
                }
            }
        }
    }

    pub fn set_native_tag(&mut self, id: ObjectId, table: TableIndex) -> Result<(), HeapError> {
        let entry = self.entry_mut(id).ok_or(HeapError::StaleHandle(id))?;
        entry.object.native = Some(table);
        Ok(())
    }

    pub fn native_tag(&self, id: ObjectId) -> Option<TableIndex> {
        self.get(id)?.native
    }

    pub fn field(&self, id: ObjectId, name: &str) -> Option<Value> {
        self.get(id)?.field(name)
    }

    /// Store `value` under `name`, taking over the caller's reference. The
    /// previous value, if any, is released.
    pub fn set_field(&mut self, id: ObjectId, name: &str, value: Value) -> Result<(), HeapError> {
        let entry = self.entry_mut(id).ok_or(HeapError::StaleHandle(id))?;
        let previous = entry.object.fields.insert(name.to_owned(), value);
        if let Some(previous) = previous {
            self.release_value(previous);
        }
        Ok(())
    }

    pub fn string(&self, id: ObjectId) -> Option<&str> {
        match self.get(id)?.kind() {
            ObjectKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn array(&self, id: ObjectId) -> Option<&[Value]> {
        match self.get(id)?.kind() {
            ObjectKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn bytes(&self, id: ObjectId) -> Option<&[u8]> {
        match self.get(id)?.kind() {
            ObjectKind::ArrayBuffer { bytes, .. } => Some(bytes),
            ObjectKind::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &HeapObject)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let entry = slot.entry.as_ref()?;
            Some((ObjectId::new(index as u32, slot.generation), &entry.object))
        })
    }

    /// Representation class of `value`.
    pub fn kind(&self, value: Value) -> ValueKind {
        let id = match value {
            Value::Undefined => return ValueKind::Undefined,
            Value::Null => return ValueKind::Null,
            Value::Bool(_) => return ValueKind::Bool,
            Value::Int(_) => return ValueKind::Int,
            Value::Float(_) => return ValueKind::Float,
            Value::Pin(_) => return ValueKind::Pin,
            Value::Ref(id) => id,
        };
        let Some(object) = self.get(id) else {
            return ValueKind::Undefined;
        };
        if let Some(table) = object.native {
            return ValueKind::NativeObject(table);
        }
        match object.kind() {
            ObjectKind::Object => ValueKind::Object,
            ObjectKind::Root => ValueKind::Root,
            ObjectKind::String(_) => ValueKind::String,
            ObjectKind::Array(_) => ValueKind::Array,
            ObjectKind::ArrayBuffer { view, .. } => ValueKind::ArrayBuffer(*view),
            ObjectKind::NativeFunction { .. } => ValueKind::Function,
        }
    }

    pub fn to_bool(&self, value: Value) -> bool {
        match value {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => b,
            Value::Int(n) => n != 0,
            Value::Float(f) => f != 0.0 && !f.is_nan(),
            Value::Pin(_) => true,
            Value::Ref(id) => match self.get(id) {
                Some(HeapObject {
                    kind: ObjectKind::String(s),
                    ..
                }) => !s.is_empty(),
                Some(_) => true,
                None => false,
            },
        }
    }

    pub fn to_float(&self, value: Value) -> f64 {
        match value {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => b as i32 as f64,
            Value::Int(n) => n as f64,
            Value::Float(f) => f,
            Value::Pin(p) => p as f64,
            Value::Ref(id) => match self.string(id) {
                Some(s) => s.trim().parse().unwrap_or(f64::NAN),
                None => f64::NAN,
            },
        }
    }

    pub fn to_int(&self, value: Value) -> i32 {
        match value {
            Value::Int(n) => n,
            other => {
                let f = self.to_float(other);
                if f.is_finite() { f as i32 } else { 0 }
            }
        }
    }

    /// Render a value as JSON. Cycles and deep nesting are cut off.
    pub fn to_json(&self, value: Value) -> serde_json::Value {
        self.to_json_at(value, 0)
    }

    fn to_json_at(&self, value: Value, depth: usize) -> serde_json::Value {
        use serde_json::Value as Json;

        const MAX_DEPTH: usize = 32;

        match value {
            Value::Undefined | Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Int(n) => Json::from(n),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Pin(p) => Json::from(p),
            Value::Ref(id) => {
                let Some(object) = self.get(id) else {
                    return Json::Null;
                };
                if depth >= MAX_DEPTH {
                    return Json::Null;
                }
                match object.kind() {
                    ObjectKind::String(s) => Json::String(s.clone()),
                    ObjectKind::Array(items) => Json::Array(
                        items
                            .iter()
                            .map(|v| self.to_json_at(*v, depth + 1))
                            .collect(),
                    ),
                    ObjectKind::ArrayBuffer { bytes, .. } => {
                        Json::Array(bytes.iter().map(|b| Json::from(*b)).collect())
                    }
                    ObjectKind::NativeFunction { function, .. } => {
                        Json::String(format!("[native {function}]"))
                    }
                    ObjectKind::Object | ObjectKind::Root => Json::Object(
                        object
                            .fields()
                            .map(|(k, v)| (k.to_owned(), self.to_json_at(v, depth + 1)))
                            .collect(),
                    ),
                }
            }
        }
    }
}
