//! Built-in resolution runtime for tern.
//!
//! This crate turns a symbol image into script-visible behavior:
//! - `ClassRegistry`: which table belongs to which built-in class, and the
//!   prototype links between classes
//! - `PrototypeChainResolver`: own table → prototype tables → base table
//! - `Runtime`: native objects, member materialization and native calls,
//!   built-in modules, and the lifecycle hooks the host loop drives

mod config;
mod error;
mod hooks;
mod instances;
mod modules;
mod natives;
mod registry;
mod resolve;
mod runtime;
mod trace;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod instances_tests;
#[cfg(test)]
mod natives_tests;
#[cfg(test)]
mod resolve_tests;

pub use config::RuntimeConfig;
pub use error::{CallError, ModuleError, RegistryError, RuntimeError};
pub use hooks::{CharDispatch, CharHandler, CharQueue, Hooks, NoScriptHost, ScriptHost};
pub use instances::Instantiations;
pub use modules::{BOOT_SCRIPT, ModuleCatalog, ModuleCatalogBuilder};
pub use natives::{NativeCall, NativeFn, NativeTable, invoke};
pub use registry::{ClassBinding, ClassCheck, ClassId, ClassRegistry, ClassRegistryBuilder};
pub use resolve::{Origin, PrototypeChainResolver, Resolution};
pub use runtime::{Builtins, Lifecycle, ResolvedModule, Runtime};
pub use trace::{NoopTracer, PrintTracer, Tracer};
