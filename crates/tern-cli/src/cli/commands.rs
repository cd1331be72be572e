//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Bundled-script flags shared by commands that build a runtime.
fn with_module_args(cmd: Command) -> Command {
    cmd.arg(module_arg()).arg(boot_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("tern")
        .about("Inspect and exercise built-in symbol tables")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(emit_command())
        .subcommand(check_command())
        .subcommand(lookup_command())
        .subcommand(call_command())
        .subcommand(modules_command())
        .subcommand(classes_command())
}

/// List the tables of a symbol image.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("List the tables of a symbol image")
        .after_help(
            r#"EXAMPLES:
  tern dump                   # built-in board image
  tern dump --image out.tsym  # image file"#,
        )
        .arg(image_arg())
        .arg(color_arg())
}

/// Write the built-in image to a file.
pub fn emit_command() -> Command {
    Command::new("emit")
        .about("Write the built-in symbol image to a file")
        .arg(output_arg())
}

/// Validate an image file.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a symbol image file")
        .after_help(
            r#"EXAMPLES:
  tern check board.tsym       # silent on success"#,
        )
        .arg(image_path_arg())
}

/// Resolve a member on a built-in class.
pub fn lookup_command() -> Command {
    Command::new("lookup")
        .about("Resolve a member on a built-in class")
        .after_help(
            r#"EXAMPLES:
  tern lookup NRF getAddress
  tern lookup Uint8Array hasOwnProperty --trace"#,
        )
        .arg(class_arg())
        .arg(member_arg())
        .arg(trace_arg())
        .arg(max_depth_arg())
        .arg(color_arg())
}

/// Call a built-in function.
pub fn call_command() -> Command {
    let cmd = Command::new("call")
        .about("Call a built-in function reached from the global object")
        .after_help(
            r#"EXAMPLES:
  tern call NRF.getAddress
  tern call hash.crc32 '"hello"'"#,
        )
        .arg(path_arg())
        .arg(call_args_arg());
    with_module_args(cmd)
}

/// List or resolve loadable modules.
pub fn modules_command() -> Command {
    let cmd = Command::new("modules")
        .about("List loadable built-in modules, or resolve one")
        .after_help(
            r#"EXAMPLES:
  tern modules
  tern modules --module greet:greet.js greet
  TERN_MODULE_SOURCES=a:a.js,b:b.js tern modules"#,
        )
        .arg(module_name_arg());
    with_module_args(cmd)
}

/// Show the class registry.
pub fn classes_command() -> Command {
    Command::new("classes")
        .about("Show built-in classes and the tables each one probes")
        .arg(json_arg())
        .arg(color_arg())
}
