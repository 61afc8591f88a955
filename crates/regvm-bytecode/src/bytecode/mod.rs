//! Instruction set definitions and image formatting.
//!
//! Implements the variable-length instruction words executed by the VM.

mod constants;
mod dump;
mod flags;
mod format;
mod hex;
mod instructions;
mod labels;
mod opcode;
mod register;

pub use constants::{
    BRANCH_SIZE, ENTRY_POINT, IMM_FORM_SIZE, REG_FORM_SIZE, RET_SIZE, SYSCALL_ENTRY,
    SYSCALL_VM_EXIT, TRAMPOLINE_SIZE,
};
pub use dump::{AUTO_LABEL_PREFIX, dump, dump_with_labels};
pub use flags::Flags;
pub use format::{LineBuilder, cols, format_addr, format_bytes, format_instruction};
pub use hex::{BYTES_PER_LINE, HexError, format_hex, parse_hex};
pub use instructions::{AluOp, DecodeError, Instruction, JumpCondition, Operand};
pub use labels::{LabelError, LabelTable};
pub use opcode::{
    Opcode, OperandForm, join_opcode_byte, join_operand_byte, split_opcode_byte,
    split_operand_byte,
};
pub use register::Register;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod flags_tests;
#[cfg(test)]
mod hex_tests;
#[cfg(test)]
mod opcode_tests;
