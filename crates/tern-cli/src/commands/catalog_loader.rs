//! Loading bundled script modules named on the command line.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tern_builtins::BoardError;
use tern_runtime::{NoScriptHost, Runtime, RuntimeConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid module '{0}': expected NAME:FILE")]
    InvalidSpec(String),
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Script sources read from disk, in command-line order.
#[derive(Debug, Default)]
pub struct Scripts {
    pub modules: Vec<(String, String)>,
    pub boot: Option<String>,
}

impl Scripts {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.boot.is_none()
    }
}

/// Split `NAME:FILE`. The name may not be empty; the file is everything
/// after the first colon.
pub fn parse_module_spec(spec: &str) -> Result<(String, PathBuf), LoadError> {
    match spec.split_once(':') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_owned(), PathBuf::from(path)))
        }
        _ => Err(LoadError::InvalidSpec(spec.to_owned())),
    }
}

pub fn load_scripts(specs: &[String], boot: Option<&Path>) -> Result<Scripts, LoadError> {
    let mut scripts = Scripts::default();
    for spec in specs {
        let (name, path) = parse_module_spec(spec)?;
        let source = read(&path)?;
        scripts.modules.push((name, source));
    }
    if let Some(path) = boot {
        scripts.boot = Some(read(path)?);
    }
    Ok(scripts)
}

/// Board runtime with `scripts` bundled, after hardware and engine init.
///
/// The startup script is handed to a host that does not evaluate it.
pub fn start_runtime(scripts: &Scripts) -> Result<Runtime, String> {
    let config = RuntimeConfig::new();
    let mut runtime = if scripts.is_empty() {
        tern_builtins::runtime(config)
    } else {
        tern_builtins::runtime_with_scripts(&scripts.modules, scripts.boot.as_deref(), config)
            .map_err(|e| LoadError::from(e).to_string())?
    };
    runtime.hw_init();
    runtime
        .init(&mut NoScriptHost)
        .map_err(|e| e.to_string())?;
    Ok(runtime)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}
