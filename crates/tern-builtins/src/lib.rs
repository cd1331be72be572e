//! Built-in catalog of the emulated board.
//!
//! The catalog is built once per process behind a `LazyLock` and shared;
//! each runtime gets fresh hooks.

use std::sync::{Arc, LazyLock};

use tern_runtime::{Builtins, Hooks, Runtime, RuntimeConfig};

pub mod board;
mod natives;


pub use board::{BoardError, CONSOLE, build, hooks};

/// The board catalog without bundled scripts.
pub fn builtins() -> Arc<Builtins> {
    static BUILTINS: LazyLock<Arc<Builtins>> = LazyLock::new(|| {
        let builtins = build(&[], None).expect("board catalog is consistent");
        Arc::new(builtins)
    });
    Arc::clone(&BUILTINS)
}

/// A runtime over the shared catalog with the board's hooks installed.
pub fn runtime(config: RuntimeConfig) -> Runtime {
    Runtime::new(builtins(), hooks(), config)
}

/// Like [`runtime`], over a catalog that also bundles `scripts`.
pub fn runtime_with_scripts(
    scripts: &[(String, String)],
    boot: Option<&str>,
    config: RuntimeConfig,
) -> Result<Runtime, BoardError> {
    let builtins = Arc::new(build(scripts, boot)?);
    Ok(Runtime::new(builtins, hooks(), config))
}
