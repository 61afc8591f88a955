//! Opcode byte layout.
//!
//! ```text
//! opcode byte:   | 7 ........ 1 | 0        |
//!                |  operation   | selector |
//! operand byte:  | 7 .. 4 | 3 .. 0 |
//!                |  dst   |  src   |
//! ```

use super::constants::{BRANCH_SIZE, IMM_FORM_SIZE, REG_FORM_SIZE, RET_SIZE};
use super::register::Register;

/// Operation selected by the upper 7 bits of the opcode byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Load = 1,
    Store = 2,
    Mov = 3,
    Add = 4,
    Sub = 5,
    And = 6,
    Or = 7,
    Xor = 8,
    Not = 9,
    Cmp = 10,
    Push = 11,
    Pop = 12,
    Call = 13,
    Ret = 14,
    Jmp = 15,
    Jmpz = 16,
    Jmpnz = 17,
    Jmpeq = 18,
    Jmpne = 19,
    Jmpgt = 20,
    Jmplt = 21,
    Jmpge = 22,
    Jmple = 23,
}

impl Opcode {
    /// All assigned operations in numeric order.
    pub const ALL: [Opcode; 23] = [
        Self::Load,
        Self::Store,
        Self::Mov,
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Not,
        Self::Cmp,
        Self::Push,
        Self::Pop,
        Self::Call,
        Self::Ret,
        Self::Jmp,
        Self::Jmpz,
        Self::Jmpnz,
        Self::Jmpeq,
        Self::Jmpne,
        Self::Jmpgt,
        Self::Jmplt,
        Self::Jmpge,
        Self::Jmple,
    ];

    /// Map an operation number (already shifted out of the opcode byte).
    ///
    /// Returns `None` for 0 and anything above 23.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1..=23 => Some(Self::ALL[(v - 1) as usize]),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Store => "store",
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Not => "not",
            Self::Cmp => "cmp",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Call => "call",
            Self::Ret => "ret",
            Self::Jmp => "jmp",
            Self::Jmpz => "jmpz",
            Self::Jmpnz => "jmpnz",
            Self::Jmpeq => "jmpeq",
            Self::Jmpne => "jmpne",
            Self::Jmpgt => "jmpgt",
            Self::Jmplt => "jmplt",
            Self::Jmpge => "jmpge",
            Self::Jmple => "jmple",
        }
    }

    /// Case-insensitive lookup by mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
    }

    /// CALL or any JMP variant: a bare 4-byte address follows the opcode byte.
    pub fn is_branch(self) -> bool {
        matches!(self, Self::Call) || self.is_jump()
    }

    /// Any JMP variant, conditional or not.
    pub fn is_jump(self) -> bool {
        (Self::Jmp as u8..=Self::Jmple as u8).contains(&(self as u8))
    }

    /// Operations that accept either a register or an immediate source.
    pub fn has_immediate_form(self) -> bool {
        matches!(
            self,
            Self::Mov | Self::Add | Self::Sub | Self::And | Self::Or | Self::Xor | Self::Cmp
        )
    }

    /// Operations whose selector bit carries no meaning on decode.
    pub fn ignores_selector(self) -> bool {
        self.is_branch() || self == Self::Ret
    }

    /// Instruction size in bytes for the given operand form.
    ///
    /// Branches and RET have a fixed size regardless of the selector.
    pub fn size(self, form: OperandForm) -> usize {
        if self.is_branch() {
            BRANCH_SIZE
        } else if self == Self::Ret {
            RET_SIZE
        } else if form == OperandForm::Imm && self.has_immediate_form() {
            IMM_FORM_SIZE
        } else {
            REG_FORM_SIZE
        }
    }
}

/// Selector bit: register or immediate source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum OperandForm {
    #[default]
    Reg = 0,
    Imm = 1,
}

impl OperandForm {
    pub fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 { Self::Reg } else { Self::Imm }
    }

    pub fn bit(self) -> u8 {
        self as u8
    }
}

/// Split an opcode byte into its raw operation number and selector.
pub fn split_opcode_byte(byte: u8) -> (u8, OperandForm) {
    (byte >> 1, OperandForm::from_bit(byte))
}

/// Build an opcode byte from operation and selector.
pub fn join_opcode_byte(op: Opcode, form: OperandForm) -> u8 {
    ((op as u8) << 1) | form.bit()
}

/// Split an operand byte into destination (upper nibble) and source (lower nibble).
pub fn split_operand_byte(byte: u8) -> (Register, Register) {
    (Register::from_nibble(byte >> 4), Register::from_nibble(byte))
}

/// Build an operand byte from destination and source registers.
pub fn join_operand_byte(dst: Register, src: Register) -> u8 {
    ((dst as u8) << 4) | src as u8
}
