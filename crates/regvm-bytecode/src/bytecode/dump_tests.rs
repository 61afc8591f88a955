//! Tests for image disassembly.

use indoc::indoc;

use crate::asm::assemble_program;
use crate::colors::Colors;

use super::dump::{dump, dump_with_labels};
use super::labels::LabelTable;

const COUNTDOWN: &str = indoc! {"
        mov r1, 3
    loop:
        sub r1, 1
        cmp r1, 0
        jmpnz loop
        call done
        ret
    done:
        ret
"};

#[test]
fn dump_generates_labels_for_targets() {
    let image = assemble_program(COUNTDOWN).unwrap().bytes;

    insta::assert_snapshot!(dump(&image, Colors::OFF), @r"
    [trampoline]
    .l1:
      0x00000000  1f 00 00 00 00     jmp .l1

    [code]
      0x00000005  07 10 03 00 00 00  mov r1, 3
    .l2:
      0x0000000b  0b 10 01 00 00 00  sub r1, 1
      0x00000011  15 10 00 00 00 00  cmp r1, 0
      0x00000017  23 0b 00 00 00     jmpnz .l2
      0x0000001c  1b 22 00 00 00     call .l3
      0x00000021  1c                 ret
    .l3:
      0x00000022  1c                 ret
    ");
}

#[test]
fn dump_uses_label_table() {
    let assembled = assemble_program(COUNTDOWN).unwrap();

    insta::assert_snapshot!(dump_with_labels(&assembled.bytes, &assembled.labels, Colors::OFF), @r"
    [trampoline]
      0x00000000  1f 00 00 00 00     jmp 0x00000000

    [code]
      0x00000005  07 10 03 00 00 00  mov r1, 3
    loop:
      0x0000000b  0b 10 01 00 00 00  sub r1, 1
      0x00000011  15 10 00 00 00 00  cmp r1, 0
      0x00000017  23 0b 00 00 00     jmpnz loop
      0x0000001c  1b 22 00 00 00     call done
      0x00000021  1c                 ret
    done:
      0x00000022  1c                 ret
    ");
}

#[test]
fn dump_continues_past_undecodable_bytes() {
    let mut image = vec![0x1f, 0x00, 0x00, 0x00, 0x00];
    image.extend_from_slice(&[0x00, 0x17, 0x1c, 0x1b, 0x00]);

    insta::assert_snapshot!(dump(&image, Colors::OFF), @r"
    [trampoline]
    .l1:
      0x00000000  1f 00 00 00 00     jmp .l1

    [code]
      0x00000005  00                 .byte 0x00
      0x00000006  17                 .byte 0x17
      0x00000007  1c                 ret
      0x00000008  1b                 .byte 0x1b
      0x00000009  00                 .byte 0x00
    ");
}

#[test]
fn dump_short_image() {
    assert_eq!(dump(&[], Colors::OFF), "");
    insta::assert_snapshot!(dump(&[0x1c], Colors::OFF), @r"
    [trampoline]
      0x00000000  1c                 ret
    ");
}

#[test]
fn dump_ignores_table_labels_inside_instructions() {
    let image = assemble_program("mov r0, 1\nret").unwrap().bytes;
    let mut labels = LabelTable::new();
    labels.insert(6, "middle".to_string());
    labels.insert(11, "tail".to_string());

    let out = dump_with_labels(&image, &labels, Colors::OFF);
    assert!(!out.contains("middle:"));
    assert!(out.contains("tail:"));
}
