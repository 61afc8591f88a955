//! Instruction set and image tooling for regvm.
//!
//! This crate contains:
//! - Instruction set definitions (opcodes, registers, flags, decoded instructions)
//! - Pure decoder and encoder for the variable-length instruction words
//! - Text assembler and linear-sweep disassembler
//! - Hex image format, label tables and shared line formatting

pub mod asm;
pub mod bytecode;
pub mod colors;

// Re-export commonly used items at crate root
pub use asm::{AsmError, AsmErrorKind, Assembled, assemble, assemble_program};
pub use bytecode::{
    AUTO_LABEL_PREFIX, AluOp, BRANCH_SIZE, BYTES_PER_LINE, DecodeError, ENTRY_POINT, Flags,
    HexError, IMM_FORM_SIZE, Instruction, JumpCondition, LabelError, LabelTable, LineBuilder,
    Opcode, Operand, OperandForm, REG_FORM_SIZE, RET_SIZE, Register, SYSCALL_ENTRY,
    SYSCALL_VM_EXIT, TRAMPOLINE_SIZE, cols, dump, dump_with_labels, format_addr, format_bytes,
    format_hex, format_instruction, join_opcode_byte, join_operand_byte, parse_hex,
    split_opcode_byte, split_operand_byte,
};
pub use colors::Colors;
