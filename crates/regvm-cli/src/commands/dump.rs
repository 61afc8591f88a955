//! Disassemble a program image.

use std::path::PathBuf;

use regvm_bytecode::{Colors, dump, dump_with_labels};

use super::image::{load_image, load_labels};

pub struct DumpArgs {
    pub image_path: PathBuf,
    pub hex: bool,
    pub labels: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let image = match load_image(&args.image_path, args.hex) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let colors = Colors::new(args.color);
    let text = match args.labels.as_deref().map(load_labels) {
        None => dump(&image, colors),
        Some(Ok(labels)) => dump_with_labels(&image, &labels, colors),
        Some(Err(e)) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    print!("{}", text);
}
