use std::fs;
use std::path::PathBuf;

pub struct EmitArgs {
    pub output: PathBuf,
}

pub fn run(args: EmitArgs) {
    let builtins = tern_builtins::builtins();
    let bytes = builtins.image().bytes();

    if let Err(e) = fs::write(&args.output, bytes) {
        eprintln!("error: failed to write '{}': {}", args.output.display(), e);
        std::process::exit(1);
    }
    log::info!("wrote {} bytes to {}", bytes.len(), args.output.display());
}
