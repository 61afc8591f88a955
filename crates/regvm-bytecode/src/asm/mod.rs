//! Two-pass assembler from text to a program image.
//!
//! # Syntax
//!
//! ```text
//! label:  mnemonic operand, operand   ; comment
//! ```
//!
//! - Mnemonics and register names are case-insensitive
//! - Registers: `r0`..`r12`, `flags`, `sp`, `pc`
//! - Memory operands of `load`/`store` are written `[reg]`
//! - Immediates are decimal (`42`, `-1`), hex (`0x2a`) or a label name
//! - Directives: `.org ADDR`, `.word VALUE`, `.byte VALUE`
//! - Comments start with `;` or `#`

mod parser;


use std::collections::HashMap;

use crate::bytecode::{
    AluOp, ENTRY_POINT, Instruction, JumpCondition, LabelTable, Opcode, Operand,
    SYSCALL_ENTRY,
};

use parser::{Arg, Statement, Value, parse_line};

/// Assembly failure, tagged with its 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    pub line: usize,
    pub kind: AsmErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AsmErrorKind {
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),

    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    #[error("invalid operand `{0}`")]
    InvalidOperand(String),

    #[error("expected register, found `{0}`")]
    ExpectedRegister(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("value {0:#x} does not fit in a byte")]
    ByteOutOfRange(u32),

    #[error("invalid label name `{0}`")]
    InvalidLabel(String),

    #[error("label `{0}` is already defined")]
    DuplicateLabel(String),

    #[error("undefined label `{0}`")]
    UndefinedLabel(String),

    #[error(".org {target:#x} is behind the current address {current:#x}")]
    OrgBackwards { current: u32, target: u32 },

    #[error("usage: {0}")]
    Usage(String),
}

/// Output of the assembler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembled {
    /// Image bytes, starting at address 0.
    pub bytes: Vec<u8>,
    /// Labels by address; when several share an address, the first one
    /// defined in the source.
    pub labels: LabelTable,
}

/// Assemble `source` starting at address 0.
pub fn assemble(source: &str) -> Result<Assembled, AsmError> {
    Assembler::new(0).run(source)
}

/// Assemble a complete program: the trampoline slot (`jmp 0`) followed by
/// `source` starting at the entry point.
pub fn assemble_program(source: &str) -> Result<Assembled, AsmError> {
    let mut asm = Assembler::new(ENTRY_POINT);
    Instruction::Jump {
        cond: JumpCondition::Always,
        target: SYSCALL_ENTRY,
    }
    .encode(&mut asm.bytes);
    asm.run(source)
}

struct Assembler {
    /// Image bytes from address 0.
    bytes: Vec<u8>,
    /// Address of the first source statement.
    origin: u32,
    labels: HashMap<String, u32>,
    /// Label names in definition order.
    order: Vec<String>,
}

impl Assembler {
    fn new(origin: u32) -> Self {
        Self {
            bytes: Vec::new(),
            origin,
            labels: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn run(mut self, source: &str) -> Result<Assembled, AsmError> {
        let lines = source
            .lines()
            .enumerate()
            .map(|(idx, text)| {
                parse_line(text).map_err(|kind| AsmError {
                    line: idx + 1,
                    kind,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Pass 1: label addresses. Sizes never depend on label values.
        let mut addr = self.origin;
        for (idx, line) in lines.iter().enumerate() {
            let at = |kind| AsmError {
                line: idx + 1,
                kind,
            };
            for name in &line.labels {
                if self.labels.insert(name.clone(), addr).is_some() {
                    return Err(at(AsmErrorKind::DuplicateLabel(name.clone())));
                }
                self.order.push(name.clone());
            }
            if let Some(stmt) = &line.statement {
                addr = self.advance(addr, stmt).map_err(at)?;
            }
        }

        // Pass 2: emit.
        for (idx, line) in lines.iter().enumerate() {
            if let Some(stmt) = &line.statement {
                self.emit(stmt).map_err(|kind| AsmError {
                    line: idx + 1,
                    kind,
                })?;
            }
        }

        // First definition wins when several labels share an address.
        let mut labels = LabelTable::new();
        for name in self.order {
            let addr = self.labels[&name];
            if labels.name_at(addr).is_none() {
                labels.insert(addr, name);
            }
        }
        Ok(Assembled {
            bytes: self.bytes,
            labels,
        })
    }

    /// Address following `stmt` when it starts at `addr`.
    fn advance(&self, addr: u32, stmt: &Statement) -> Result<u32, AsmErrorKind> {
        let size = match stmt {
            Statement::Instr { opcode, args } => lower(*opcode, args, |_| Ok(0))?.size() as u32,
            Statement::Word(_) => 4,
            Statement::Byte(_) => 1,
            Statement::Org(value) => {
                // Only labels defined above are known here.
                let target = self.resolve(value)?;
                if target < addr {
                    return Err(AsmErrorKind::OrgBackwards {
                        current: addr,
                        target,
                    });
                }
                return Ok(target);
            }
        };
        Ok(addr.wrapping_add(size))
    }

    fn resolve(&self, value: &Value) -> Result<u32, AsmErrorKind> {
        match value {
            Value::Number(n) => Ok(*n),
            Value::Label(name) => self
                .labels
                .get(name)
                .copied()
                .ok_or_else(|| AsmErrorKind::UndefinedLabel(name.clone())),
        }
    }

    fn emit(&mut self, stmt: &Statement) -> Result<(), AsmErrorKind> {
        match stmt {
            Statement::Instr { opcode, args } => {
                let instr = lower(*opcode, args, |v| self.resolve(v))?;
                instr.encode(&mut self.bytes);
            }
            Statement::Word(value) => {
                let word = self.resolve(value)?;
                self.bytes.extend_from_slice(&word.to_le_bytes());
            }
            Statement::Byte(value) => {
                let byte = self.resolve(value)?;
                let byte = u8::try_from(byte).map_err(|_| AsmErrorKind::ByteOutOfRange(byte))?;
                self.bytes.push(byte);
            }
            Statement::Org(value) => {
                let target = self.resolve(value)? as usize;
                self.bytes.resize(target.max(self.bytes.len()), 0);
            }
        }
        Ok(())
    }
}

/// Build an instruction from a mnemonic and its written operands.
fn lower(
    opcode: Opcode,
    args: &[Arg],
    resolve: impl Fn(&Value) -> Result<u32, AsmErrorKind>,
) -> Result<Instruction, AsmErrorKind> {
    let bad_shape = || AsmErrorKind::Usage(usage(opcode));
    let source = |arg: &Arg| match arg {
        Arg::Reg(r) => Ok(Operand::Reg(*r)),
        Arg::Value(v) => resolve(v).map(Operand::Imm),
        Arg::Deref(_) => Err(bad_shape()),
    };
    let jump = |cond| match args {
        [Arg::Value(v)] => Ok(Instruction::Jump {
            cond,
            target: resolve(v)?,
        }),
        _ => Err(bad_shape()),
    };
    let alu = |op| match args {
        [Arg::Reg(dst), src] => Ok(Instruction::Alu {
            op,
            dst: *dst,
            src: source(src)?,
        }),
        _ => Err(bad_shape()),
    };

    match opcode {
        Opcode::Load => match args {
            [Arg::Reg(dst), Arg::Deref(src)] => Ok(Instruction::Load {
                dst: *dst,
                src: *src,
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Store => match args {
            [Arg::Deref(dst), Arg::Reg(src)] => Ok(Instruction::Store {
                dst: *dst,
                src: *src,
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Mov => match args {
            [Arg::Reg(dst), src] => Ok(Instruction::Mov {
                dst: *dst,
                src: source(src)?,
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Add => alu(AluOp::Add),
        Opcode::Sub => alu(AluOp::Sub),
        Opcode::And => alu(AluOp::And),
        Opcode::Or => alu(AluOp::Or),
        Opcode::Xor => alu(AluOp::Xor),
        Opcode::Cmp => match args {
            [Arg::Reg(dst), src] => Ok(Instruction::Cmp {
                dst: *dst,
                src: source(src)?,
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Not | Opcode::Push | Opcode::Pop => match args {
            [Arg::Reg(reg)] => Ok(match opcode {
                Opcode::Not => Instruction::Not { reg: *reg },
                Opcode::Push => Instruction::Push { reg: *reg },
                _ => Instruction::Pop { reg: *reg },
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Call => match args {
            [Arg::Value(v)] => Ok(Instruction::Call {
                target: resolve(v)?,
            }),
            _ => Err(bad_shape()),
        },
        Opcode::Ret => match args {
            [] => Ok(Instruction::Ret),
            _ => Err(bad_shape()),
        },
        Opcode::Jmp => jump(JumpCondition::Always),
        Opcode::Jmpz => jump(JumpCondition::Zero),
        Opcode::Jmpnz => jump(JumpCondition::NotZero),
        Opcode::Jmpeq => jump(JumpCondition::Equal),
        Opcode::Jmpne => jump(JumpCondition::NotEqual),
        Opcode::Jmpgt => jump(JumpCondition::Greater),
        Opcode::Jmplt => jump(JumpCondition::Less),
        Opcode::Jmpge => jump(JumpCondition::GreaterEqual),
        Opcode::Jmple => jump(JumpCondition::LessEqual),
    }
}

/// Operand syntax for `opcode`, shown on shape errors.
fn usage(opcode: Opcode) -> String {
    let m = opcode.mnemonic();
    match opcode {
        Opcode::Load => format!("{m} REG, [REG]"),
        Opcode::Store => format!("{m} [REG], REG"),
        Opcode::Not | Opcode::Push | Opcode::Pop => format!("{m} REG"),
        Opcode::Ret => m.to_string(),
        op if op.is_branch() => format!("{m} ADDR"),
        _ => format!("{m} REG, REG|IMM"),
    }
}
