use indoc::indoc;

use super::hex::{HexError, format_hex, parse_hex};

#[test]
fn parse_accepts_any_layout() {
    let text = indoc! {"
        1f 00 00 00 00
        07 00 2A 00
          00 00

        1f 00 00 00 00
    "};
    let bytes = parse_hex(text).unwrap();
    assert_eq!(
        bytes,
        [
            0x1f, 0, 0, 0, 0, 0x07, 0, 0x2a, 0, 0, 0, 0x1f, 0, 0, 0, 0
        ]
    );
}

#[test]
fn parse_rejects_bad_tokens() {
    assert_eq!(
        parse_hex("1f 00\n0g"),
        Err(HexError::InvalidByte {
            line: 2,
            token: "0g".to_string()
        })
    );
    assert_eq!(
        parse_hex("123"),
        Err(HexError::InvalidByte {
            line: 1,
            token: "123".to_string()
        })
    );
    assert_eq!(
        parse_hex("+1"),
        Err(HexError::InvalidByte {
            line: 1,
            token: "+1".to_string()
        })
    );
}

#[test]
fn format_wraps_at_sixteen_bytes() {
    let bytes: Vec<u8> = (0..20).collect();
    insta::assert_snapshot!(format_hex(&bytes), @r"
    00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f
    10 11 12 13
    ");
}

#[test]
fn format_then_parse() {
    let bytes = vec![0xde, 0xad, 0xbe, 0xef];
    assert_eq!(parse_hex(&format_hex(&bytes)).unwrap(), bytes);
    assert_eq!(format_hex(&[]), "");
}
