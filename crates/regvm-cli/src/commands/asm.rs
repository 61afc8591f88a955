//! Assemble a source file into a program image.

use std::path::{Path, PathBuf};

use regvm_bytecode::{Assembled, assemble_program, format_hex};

use super::image::{HEX_EXTENSION, read_text};

/// Extension of binary images written by default.
const BIN_EXTENSION: &str = "bin";

pub struct AsmArgs {
    pub source_path: PathBuf,
    pub output: Option<PathBuf>,
    pub hex: bool,
    pub labels: Option<PathBuf>,
}

pub fn run(args: AsmArgs) {
    let source = match read_text(&args.source_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let assembled = match assemble_program(&source) {
        Ok(assembled) => assembled,
        Err(e) => {
            eprintln!("error: {}: {}", args.source_path.display(), e);
            std::process::exit(1);
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.source_path, args.hex));
    if let Err(e) = write_outputs(&assembled, &output, args.hex, args.labels.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// `SOURCE` with its extension replaced by `.bin`, or `.hex` for hex output.
pub fn default_output(source: &Path, hex: bool) -> PathBuf {
    let ext = if hex { HEX_EXTENSION } else { BIN_EXTENSION };
    source.with_extension(ext)
}

/// Write the image and, when requested, its label table.
pub fn write_outputs(
    assembled: &Assembled,
    output: &Path,
    hex: bool,
    labels: Option<&Path>,
) -> std::io::Result<()> {
    if hex {
        std::fs::write(output, format_hex(&assembled.bytes))?;
    } else {
        std::fs::write(output, &assembled.bytes)?;
    }

    if let Some(path) = labels {
        std::fs::write(path, assembled.labels.format())?;
    }
    Ok(())
}
