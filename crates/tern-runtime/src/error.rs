//! Errors raised while building the registry and catalogs or running
//! built-ins. Lookups never error; a miss is `None`.

use tern_core::{FunctionId, HeapError, TableIndex};

/// Class registry construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("class `{0}` is declared twice")]
    DuplicateClass(String),
    #[error("class `{0}` is not declared")]
    UnknownClass(String),
    #[error("class `{class}` names unknown prototype `{prototype}`")]
    UnknownPrototype { class: String, prototype: String },
    #[error("`{owner}` refers to table {table}, which the image does not have")]
    UnknownTable { owner: String, table: TableIndex },
    #[error("prototype chain of `{0}` loops back on itself")]
    PrototypeCycle(String),
    #[error("prototype chain of `{class}` is {depth} deep (maximum {max})")]
    ChainTooDeep {
        class: String,
        depth: usize,
        max: usize,
    },
}

/// Module catalog construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("module `{0}` is declared twice")]
    Duplicate(String),
    #[error("module name `{0}` is reserved for the startup script")]
    Reserved(String),
    #[error("invalid module name {0:?}")]
    InvalidName(String),
    #[error("library `{name}` refers to missing table {table}")]
    UnknownTable { name: String, table: TableIndex },
}

/// Native call error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CallError {
    #[error("no native function bound to {0}")]
    UnknownFunction(FunctionId),
    #[error("value is not a native function")]
    NotCallable,
    #[error("{0}")]
    Heap(#[from] HeapError),
    /// Raised by the native itself.
    #[error("{0}")]
    Thrown(String),
}

/// Runtime error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown symbol table {0}")]
    UnknownTable(TableIndex),
    #[error("`{name}` in table `{table}` is bound to missing native {function}")]
    UnboundFunction {
        table: String,
        name: String,
        function: FunctionId,
    },
    #[error("hardware init must run before engine init")]
    HardwareNotInitialized,
    #[error("engine is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error(transparent)]
    Call(#[from] CallError),
}
