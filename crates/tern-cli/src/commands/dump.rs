use std::path::PathBuf;

use tern_core::Colors;
use tern_symbols::{SymbolImage, dump};

pub struct DumpArgs {
    pub image_path: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let colors = Colors::new(args.color);

    let Some(path) = args.image_path else {
        let builtins = tern_builtins::builtins();
        print!("{}", dump(builtins.image(), colors));
        return;
    };

    let image = match SymbolImage::from_path(&path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: failed to load '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };
    print!("{}", dump(&image, colors));
}
