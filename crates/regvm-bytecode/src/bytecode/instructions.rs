//! Decoded instructions.
//!
//! Instructions are runtime-friendly enums with `decode`/`encode` methods
//! for the variable-length wire format.

use super::flags::Flags;
use super::opcode::{
    Opcode, OperandForm, join_opcode_byte, join_operand_byte, split_opcode_byte,
    split_operand_byte,
};
use super::register::Register;

/// Read a little-endian u32 from `bytes[offset..offset + 4]`.
///
/// Callers check the length first.
#[inline]
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Errors produced while decoding an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Operation number 0 or above 23.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// Immediate selector on an operation that only takes registers.
    #[error("`{}` has no immediate form", .0.mnemonic())]
    ImmediateNotAllowed(Opcode),

    /// Bytes ran out before the end of the instruction.
    #[error("truncated instruction: needs {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
}

/// Source operand of a two-operand data instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operand {
    Reg(Register),
    Imm(u32),
}

impl Operand {
    pub fn form(self) -> OperandForm {
        match self {
            Self::Reg(_) => OperandForm::Reg,
            Self::Imm(_) => OperandForm::Imm,
        }
    }
}

/// Binary arithmetic and logic operations sharing the `dst op= src` shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
}

impl AluOp {
    pub fn opcode(self) -> Opcode {
        match self {
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::And => Opcode::And,
            Self::Or => Opcode::Or,
            Self::Xor => Opcode::Xor,
        }
    }

    /// Apply the operation. ADD and SUB wrap on overflow.
    pub fn apply(self, dst: u32, src: u32) -> u32 {
        match self {
            Self::Add => dst.wrapping_add(src),
            Self::Sub => dst.wrapping_sub(src),
            Self::And => dst & src,
            Self::Or => dst | src,
            Self::Xor => dst ^ src,
        }
    }
}

/// Condition tested by a jump.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JumpCondition {
    Always,
    Zero,
    NotZero,
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl JumpCondition {
    pub const ALL: [JumpCondition; 9] = [
        Self::Always,
        Self::Zero,
        Self::NotZero,
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::Less,
        Self::GreaterEqual,
        Self::LessEqual,
    ];

    pub fn opcode(self) -> Opcode {
        match self {
            Self::Always => Opcode::Jmp,
            Self::Zero => Opcode::Jmpz,
            Self::NotZero => Opcode::Jmpnz,
            Self::Equal => Opcode::Jmpeq,
            Self::NotEqual => Opcode::Jmpne,
            Self::Greater => Opcode::Jmpgt,
            Self::Less => Opcode::Jmplt,
            Self::GreaterEqual => Opcode::Jmpge,
            Self::LessEqual => Opcode::Jmple,
        }
    }

    /// Whether the jump is taken under `flags`.
    pub fn is_satisfied(self, flags: Flags) -> bool {
        match self {
            Self::Always => true,
            Self::Zero => flags.zero(),
            Self::NotZero => !flags.zero(),
            Self::Equal => flags.equal(),
            Self::NotEqual => !flags.equal(),
            Self::Greater => flags.greater(),
            Self::Less => flags.less(),
            Self::GreaterEqual => flags.greater() || flags.equal(),
            Self::LessEqual => flags.less() || flags.equal(),
        }
    }
}

/// A decoded instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Instruction {
    /// `dst ← mem32[src]`
    Load { dst: Register, src: Register },
    /// `mem32[dst] ← src`
    Store { dst: Register, src: Register },
    Mov { dst: Register, src: Operand },
    Alu { op: AluOp, dst: Register, src: Operand },
    /// `reg ← !reg`
    Not { reg: Register },
    Cmp { dst: Register, src: Operand },
    Push { reg: Register },
    Pop { reg: Register },
    Call { target: u32 },
    Ret,
    Jump { cond: JumpCondition, target: u32 },
}

impl Instruction {
    /// Decode the instruction starting at `bytes[0]`.
    ///
    /// Trailing bytes beyond the instruction are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let &byte = bytes.first().ok_or(DecodeError::Truncated {
            needed: 1,
            available: 0,
        })?;
        let (op, form) = split_opcode_byte(byte);
        let opcode = Opcode::from_u8(op).ok_or(DecodeError::UnknownOpcode(byte))?;

        if form == OperandForm::Imm && !opcode.has_immediate_form() && !opcode.ignores_selector()
        {
            return Err(DecodeError::ImmediateNotAllowed(opcode));
        }

        let needed = opcode.size(form);
        if bytes.len() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: bytes.len(),
            });
        }

        let regs = || split_operand_byte(bytes[1]);
        let source = || {
            let (_, src) = regs();
            match form {
                OperandForm::Reg => Operand::Reg(src),
                OperandForm::Imm => Operand::Imm(read_u32(bytes, 2)),
            }
        };
        let jump = |cond| Self::Jump {
            cond,
            target: read_u32(bytes, 1),
        };
        let alu = |op| Self::Alu {
            op,
            dst: regs().0,
            src: source(),
        };

        let instr = match opcode {
            Opcode::Load => {
                let (dst, src) = regs();
                Self::Load { dst, src }
            }
            Opcode::Store => {
                let (dst, src) = regs();
                Self::Store { dst, src }
            }
            Opcode::Mov => Self::Mov {
                dst: regs().0,
                src: source(),
            },
            Opcode::Add => alu(AluOp::Add),
            Opcode::Sub => alu(AluOp::Sub),
            Opcode::And => alu(AluOp::And),
            Opcode::Or => alu(AluOp::Or),
            Opcode::Xor => alu(AluOp::Xor),
            Opcode::Not => Self::Not { reg: regs().0 },
            Opcode::Cmp => Self::Cmp {
                dst: regs().0,
                src: source(),
            },
            Opcode::Push => Self::Push { reg: regs().0 },
            Opcode::Pop => Self::Pop { reg: regs().0 },
            Opcode::Call => Self::Call {
                target: read_u32(bytes, 1),
            },
            Opcode::Ret => Self::Ret,
            Opcode::Jmp => jump(JumpCondition::Always),
            Opcode::Jmpz => jump(JumpCondition::Zero),
            Opcode::Jmpnz => jump(JumpCondition::NotZero),
            Opcode::Jmpeq => jump(JumpCondition::Equal),
            Opcode::Jmpne => jump(JumpCondition::NotEqual),
            Opcode::Jmpgt => jump(JumpCondition::Greater),
            Opcode::Jmplt => jump(JumpCondition::Less),
            Opcode::Jmpge => jump(JumpCondition::GreaterEqual),
            Opcode::Jmple => jump(JumpCondition::LessEqual),
        };
        Ok(instr)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Load { .. } => Opcode::Load,
            Self::Store { .. } => Opcode::Store,
            Self::Mov { .. } => Opcode::Mov,
            Self::Alu { op, .. } => op.opcode(),
            Self::Not { .. } => Opcode::Not,
            Self::Cmp { .. } => Opcode::Cmp,
            Self::Push { .. } => Opcode::Push,
            Self::Pop { .. } => Opcode::Pop,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Jump { cond, .. } => cond.opcode(),
        }
    }

    /// Selector bit as written by the encoder.
    ///
    /// Branches always carry the immediate selector.
    pub fn form(&self) -> OperandForm {
        match self {
            Self::Mov { src, .. } | Self::Alu { src, .. } | Self::Cmp { src, .. } => src.form(),
            Self::Call { .. } | Self::Jump { .. } => OperandForm::Imm,
            _ => OperandForm::Reg,
        }
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> usize {
        self.opcode().size(self.form())
    }

    /// Address operand of CALL and JMP variants.
    pub fn branch_target(&self) -> Option<u32> {
        match self {
            Self::Call { target } | Self::Jump { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Append the encoded bytes to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(join_opcode_byte(self.opcode(), self.form()));
        match *self {
            Self::Load { dst, src } | Self::Store { dst, src } => {
                out.push(join_operand_byte(dst, src));
            }
            Self::Mov { dst, src } | Self::Alu { dst, src, .. } | Self::Cmp { dst, src } => {
                match src {
                    Operand::Reg(src) => out.push(join_operand_byte(dst, src)),
                    Operand::Imm(iv) => {
                        out.push(join_operand_byte(dst, Register::R0));
                        out.extend_from_slice(&iv.to_le_bytes());
                    }
                }
            }
            Self::Not { reg } | Self::Push { reg } | Self::Pop { reg } => {
                out.push(join_operand_byte(reg, Register::R0));
            }
            Self::Call { target } | Self::Jump { target, .. } => {
                out.extend_from_slice(&target.to_le_bytes());
            }
            Self::Ret => {}
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode(&mut out);
        out
    }
}
