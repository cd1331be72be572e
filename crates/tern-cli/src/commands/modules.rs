use std::path::PathBuf;

use tern_runtime::{ResolvedModule, Runtime};

use super::catalog_loader::{load_scripts, start_runtime};

pub struct ModulesArgs {
    pub name: Option<String>,
    pub modules: Vec<String>,
    pub boot: Option<PathBuf>,
}

pub fn run(args: ModulesArgs) {
    let mut runtime = match load_scripts(&args.modules, args.boot.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|scripts| start_runtime(&scripts))
    {
        Ok(runtime) => runtime,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let Some(name) = args.name else {
        println!("{}", runtime.list_loadable_module_names());
        return;
    };

    match describe_module(&mut runtime, &name) {
        Ok(text) => print!("{}", text),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

/// Native libraries print their table; scripts print their source.
pub fn describe_module(runtime: &mut Runtime, name: &str) -> Result<String, String> {
    let resolved = runtime.resolve_module(name).map_err(|e| e.to_string())?;
    let native = match resolved {
        Some(ResolvedModule::Script(source)) => {
            let mut text = format!("script {}\n", name);
            text.push_str(source);
            if !source.ends_with('\n') {
                text.push('\n');
            }
            return Ok(text);
        }
        Some(ResolvedModule::Native(value)) => value,
        None => return Err(format!("no module named '{}'", name)),
    };

    let table = native
        .as_object()
        .and_then(|id| runtime.heap().native_tag(id));
    runtime.release(native);
    let Some(table) = table.and_then(|index| runtime.builtins().image().table(index)) else {
        return Err(format!("library '{}' has no symbol table", name));
    };

    let mut text = format!("library {} ({} {})\n", name, table.index(), table.name());
    for (member, entry) in table.iter() {
        text.push_str(&format!("  {}  {}\n", member, entry.spec));
    }
    Ok(text)
}
