//! Tests for opcode and operand byte layout.

use super::opcode::{
    Opcode, OperandForm, join_opcode_byte, join_operand_byte, split_opcode_byte,
    split_operand_byte,
};
use super::register::Register;

#[test]
fn opcode_numbers() {
    assert_eq!(Opcode::Load as u8, 1);
    assert_eq!(Opcode::Cmp as u8, 10);
    assert_eq!(Opcode::Call as u8, 13);
    assert_eq!(Opcode::Ret as u8, 14);
    assert_eq!(Opcode::Jmp as u8, 15);
    assert_eq!(Opcode::Jmple as u8, 23);
}

#[test]
fn from_u8_covers_assigned_range() {
    assert_eq!(Opcode::from_u8(0), None);
    for op in Opcode::ALL {
        assert_eq!(Opcode::from_u8(op as u8), Some(op));
    }
    assert_eq!(Opcode::from_u8(24), None);
    assert_eq!(Opcode::from_u8(127), None);
}

#[test]
fn sizes() {
    assert_eq!(Opcode::Mov.size(OperandForm::Reg), 2);
    assert_eq!(Opcode::Mov.size(OperandForm::Imm), 6);
    assert_eq!(Opcode::Load.size(OperandForm::Reg), 2);
    assert_eq!(Opcode::Push.size(OperandForm::Reg), 2);
    assert_eq!(Opcode::Call.size(OperandForm::Reg), 5);
    assert_eq!(Opcode::Call.size(OperandForm::Imm), 5);
    assert_eq!(Opcode::Jmpge.size(OperandForm::Imm), 5);
    assert_eq!(Opcode::Ret.size(OperandForm::Reg), 1);
    assert_eq!(Opcode::Ret.size(OperandForm::Imm), 1);
}

#[test]
fn classification() {
    assert!(Opcode::Call.is_branch());
    assert!(!Opcode::Call.is_jump());
    assert!(Opcode::Jmp.is_jump());
    assert!(Opcode::Jmple.is_jump());
    assert!(!Opcode::Ret.is_branch());
    assert!(Opcode::Ret.ignores_selector());

    let with_imm: Vec<_> = Opcode::ALL
        .into_iter()
        .filter(|op| op.has_immediate_form())
        .map(|op| op.mnemonic())
        .collect();
    assert_eq!(with_imm, ["mov", "add", "sub", "and", "or", "xor", "cmp"]);
}

#[test]
fn mnemonic_lookup_is_case_insensitive() {
    assert_eq!(Opcode::from_mnemonic("JMPNZ"), Some(Opcode::Jmpnz));
    assert_eq!(Opcode::from_mnemonic("Store"), Some(Opcode::Store));
    assert_eq!(Opcode::from_mnemonic("invoke"), None);
}

#[test]
fn opcode_byte_split_and_join() {
    assert_eq!(split_opcode_byte(0x07), (3, OperandForm::Imm));
    assert_eq!(split_opcode_byte(0x06), (3, OperandForm::Reg));
    assert_eq!(split_opcode_byte(0xff), (127, OperandForm::Imm));

    assert_eq!(join_opcode_byte(Opcode::Mov, OperandForm::Imm), 0x07);
    assert_eq!(join_opcode_byte(Opcode::Jmp, OperandForm::Imm), 0x1f);
    assert_eq!(join_opcode_byte(Opcode::Ret, OperandForm::Reg), 0x1c);
}

#[test]
fn operand_byte_split_and_join() {
    assert_eq!(split_operand_byte(0x1f), (Register::R1, Register::Pc));
    assert_eq!(split_operand_byte(0xd0), (Register::Flags, Register::R0));
    assert_eq!(join_operand_byte(Register::Sp, Register::R12), 0xec);
}

#[test]
fn register_names() {
    assert_eq!(Register::from_nibble(13), Register::Flags);
    assert_eq!(Register::from_nibble(0x1e), Register::Sp);
    assert_eq!(Register::from_name("R10"), Some(Register::R10));
    assert_eq!(Register::from_name("pc"), Some(Register::Pc));
    assert_eq!(Register::from_name("r13"), None);
    assert_eq!(Register::Flags.to_string(), "flags");
    assert_eq!(Register::Pc.index(), 15);
}
