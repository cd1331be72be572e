use std::path::PathBuf;

use tern_symbols::{SymbolImage, verify};

pub struct CheckArgs {
    pub image_path: PathBuf,
}

pub fn run(args: CheckArgs) {
    let image = match SymbolImage::from_path(&args.image_path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    // Loading checks framing; verify checks ordering and cross references.
    if let Err(e) = verify(&image) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
