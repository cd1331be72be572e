mod cli;
mod commands;

use cli::{
    CallParams, CheckParams, ClassesParams, DumpParams, EmitParams, LookupParams, ModulesParams,
    build_cli,
};

fn main() {
    env_logger::init();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("emit", m)) => {
            let params = EmitParams::from_matches(m);
            commands::emit::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("lookup", m)) => {
            let params = LookupParams::from_matches(m);
            commands::lookup::run(params.into());
        }
        Some(("call", m)) => {
            let params = CallParams::from_matches(m);
            commands::call::run(params.into());
        }
        Some(("modules", m)) => {
            let params = ModulesParams::from_matches(m);
            commands::modules::run(params.into());
        }
        Some(("classes", m)) => {
            let params = ClassesParams::from_matches(m);
            commands::classes::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
