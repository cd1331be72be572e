//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands compose the same
//! definitions.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Symbol image file (--image).
pub fn image_arg() -> Arg {
    Arg::new("image")
        .long("image")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Symbol image file (defaults to the built-in board image)")
}

/// Symbol image file (positional, required).
pub fn image_path_arg() -> Arg {
    Arg::new("image_path")
        .value_name("IMAGE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Symbol image file")
}

/// Output file (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Write the image to FILE")
}

/// Built-in class name (positional).
pub fn class_arg() -> Arg {
    Arg::new("class")
        .value_name("CLASS")
        .required(true)
        .help("Built-in class name, e.g. NRF")
}

/// Member name (positional).
pub fn member_arg() -> Arg {
    Arg::new("member")
        .value_name("NAME")
        .required(true)
        .help("Member name, e.g. getAddress")
}

/// Dotted member path from the global object (positional).
pub fn path_arg() -> Arg {
    Arg::new("path")
        .value_name("PATH")
        .required(true)
        .help("Member path from the global object, e.g. NRF.getAddress")
}

/// Call arguments as JSON literals (positional, trailing).
pub fn call_args_arg() -> Arg {
    Arg::new("args")
        .value_name("ARG")
        .num_args(0..)
        .trailing_var_arg(true)
        .allow_hyphen_values(true)
        .help("Arguments as JSON literals, e.g. 42 '\"text\"' '[1,2]'")
}

/// Module name (positional, optional).
pub fn module_name_arg() -> Arg {
    Arg::new("name")
        .value_name("NAME")
        .help("Resolve NAME instead of listing every module")
}

/// Bundled script modules (--module name:path.js, repeatable).
pub fn module_arg() -> Arg {
    Arg::new("module")
        .long("module")
        .value_name("NAME:FILE")
        .env("TERN_MODULE_SOURCES")
        .value_delimiter(',')
        .action(ArgAction::Append)
        .help("Bundle FILE as script module NAME")
}

/// Startup script (--boot).
pub fn boot_arg() -> Arg {
    Arg::new("boot")
        .long("boot")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Startup script bundled under the reserved name `_`")
}

/// Print each table probe (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Print every table probed")
}

/// Prototype depth bound (--max-depth).
pub fn max_depth_arg() -> Arg {
    Arg::new("max_depth")
        .long("max-depth")
        .value_name("N")
        .default_value("8")
        .value_parser(value_parser!(usize))
        .help("Maximum prototype links followed per lookup")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
