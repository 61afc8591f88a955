//! Loading program images and label tables from disk.

use std::path::{Path, PathBuf};

use regvm_bytecode::{HexError, LabelError, LabelTable, parse_hex};

/// File extension that selects the hex text format.
pub const HEX_EXTENSION: &str = "hex";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("`{}`: {source}", path.display())]
    Hex { path: PathBuf, source: HexError },

    #[error("`{}`: {source}", path.display())]
    Labels { path: PathBuf, source: LabelError },
}

/// Whether `path` names a hex text image.
pub fn is_hex_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(HEX_EXTENSION))
}

/// Read an image, parsing it as hex text when `hex` is set or the file
/// ends in `.hex`.
pub fn load_image(path: &Path, hex: bool) -> Result<Vec<u8>, LoadError> {
    if !(hex || is_hex_path(path)) {
        return std::fs::read(path).map_err(|source| io_error(path, source));
    }

    let text = read_text(path)?;
    parse_hex(&text).map_err(|source| LoadError::Hex {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a label table file.
pub fn load_labels(path: &Path) -> Result<LabelTable, LoadError> {
    let text = read_text(path)?;
    LabelTable::parse(&text).map_err(|source| LoadError::Labels {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}
