//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the raw color
//! choice; the `From` impls resolve it against the terminal.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::call::CallArgs;
use crate::commands::check::CheckArgs;
use crate::commands::classes::ClassesArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::emit::EmitArgs;
use crate::commands::lookup::LookupArgs;
use crate::commands::modules::ModulesArgs;

pub struct DumpParams {
    pub image_path: Option<PathBuf>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            image_path: m.get_one::<PathBuf>("image").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            image_path: p.image_path,
            color: p.color.should_colorize(),
        }
    }
}

pub struct EmitParams {
    pub output: PathBuf,
}

impl EmitParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            output: m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl From<EmitParams> for EmitArgs {
    fn from(p: EmitParams) -> Self {
        Self { output: p.output }
    }
}

pub struct CheckParams {
    pub image_path: PathBuf,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            image_path: m
                .get_one::<PathBuf>("image_path")
                .cloned()
                .unwrap_or_default(),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            image_path: p.image_path,
        }
    }
}

pub struct LookupParams {
    pub class: String,
    pub member: String,
    pub trace: bool,
    pub max_depth: usize,
    pub color: ColorChoice,
}

impl LookupParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            class: m.get_one::<String>("class").cloned().unwrap_or_default(),
            member: m.get_one::<String>("member").cloned().unwrap_or_default(),
            trace: m.get_flag("trace"),
            max_depth: m.get_one::<usize>("max_depth").copied().unwrap_or(8),
            color: parse_color(m),
        }
    }
}

impl From<LookupParams> for LookupArgs {
    fn from(p: LookupParams) -> Self {
        Self {
            class: p.class,
            member: p.member,
            trace: p.trace,
            max_depth: p.max_depth,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CallParams {
    pub path: String,
    pub args: Vec<String>,
    pub modules: Vec<String>,
    pub boot: Option<PathBuf>,
}

impl CallParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            path: m.get_one::<String>("path").cloned().unwrap_or_default(),
            args: strings(m, "args"),
            modules: strings(m, "module"),
            boot: m.get_one::<PathBuf>("boot").cloned(),
        }
    }
}

impl From<CallParams> for CallArgs {
    fn from(p: CallParams) -> Self {
        Self {
            path: p.path,
            args: p.args,
            modules: p.modules,
            boot: p.boot,
        }
    }
}

pub struct ModulesParams {
    pub name: Option<String>,
    pub modules: Vec<String>,
    pub boot: Option<PathBuf>,
}

impl ModulesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            name: m.get_one::<String>("name").cloned(),
            modules: strings(m, "module"),
            boot: m.get_one::<PathBuf>("boot").cloned(),
        }
    }
}

impl From<ModulesParams> for ModulesArgs {
    fn from(p: ModulesParams) -> Self {
        Self {
            name: p.name,
            modules: p.modules,
            boot: p.boot,
        }
    }
}

pub struct ClassesParams {
    pub json: bool,
    pub color: ColorChoice,
}

impl ClassesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            json: m.get_flag("json"),
            color: parse_color(m),
        }
    }
}

impl From<ClassesParams> for ClassesArgs {
    fn from(p: ClassesParams) -> Self {
        Self {
            json: p.json,
            color: p.color.should_colorize(),
        }
    }
}

fn strings(m: &ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
