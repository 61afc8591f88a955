use std::path::Path;

use regvm_bytecode::HexError;

use super::image::{LoadError, is_hex_path, load_image, load_labels};

#[test]
fn hex_extension_detection() {
    assert!(is_hex_path(Path::new("prog.hex")));
    assert!(is_hex_path(Path::new("dir/PROG.HEX")));
    assert!(!is_hex_path(Path::new("prog.bin")));
    assert!(!is_hex_path(Path::new("hex")));
}

#[test]
fn binary_image_is_read_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.bin");
    std::fs::write(&path, [0x2f, 0x00, 0x00, 0x00, 0x00]).unwrap();

    assert_eq!(load_image(&path, false).unwrap(), [0x2f, 0, 0, 0, 0]);
}

#[test]
fn hex_image_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.hex");
    std::fs::write(&path, "2f 00 00\n00 00\n").unwrap();

    assert_eq!(load_image(&path, false).unwrap(), [0x2f, 0, 0, 0, 0]);
}

#[test]
fn hex_image_by_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.txt");
    std::fs::write(&path, "07 00 2a 00 00 00").unwrap();

    assert_eq!(load_image(&path, true).unwrap(), [7, 0, 0x2a, 0, 0, 0]);
    assert_eq!(
        load_image(&path, false).unwrap(),
        b"07 00 2a 00 00 00".to_vec()
    );
}

#[test]
fn invalid_hex_names_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.hex");
    std::fs::write(&path, "2f 00\n0g\n").unwrap();

    let err = load_image(&path, false).unwrap_err();
    let LoadError::Hex { source, .. } = &err else {
        panic!("expected hex error, got {err:?}");
    };
    assert_eq!(
        *source,
        HexError::InvalidByte {
            line: 2,
            token: "0g".to_string()
        }
    );
    assert!(err.to_string().ends_with("bad.hex`: line 2: invalid hex byte `0g`"));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let err = load_image(&path, false).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().starts_with("cannot read `"));
}

#[test]
fn label_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.labels");
    std::fs::write(&path, "00000005   main\n0000001a   loop\n").unwrap();

    let labels = load_labels(&path).unwrap();
    assert_eq!(labels.name_at(5), Some("main"));
    assert_eq!(labels.address_of("loop"), Some(0x1a));
}

#[test]
fn malformed_label_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.labels");
    std::fs::write(&path, "main\n").unwrap();

    let err = load_labels(&path).unwrap_err();
    assert!(matches!(err, LoadError::Labels { .. }));
}
