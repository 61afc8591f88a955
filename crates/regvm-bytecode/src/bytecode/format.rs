//! Shared formatting utilities for dump and execution trace.
//!
//! Both dump and trace use the same column layout:
//! ```text
//! | 2 | addr (10) | 2 | raw bytes (17) | 2 | mnemonic and operands |
//! ```

use crate::colors::Colors;

use super::instructions::{Instruction, Operand};

/// Column widths for instruction line formatting.
pub mod cols {
    /// Leading indentation (2 spaces).
    pub const INDENT: usize = 2;
    /// Address column (`0x` + 8 hex digits).
    pub const ADDR: usize = 10;
    /// Gap between columns (2 spaces).
    pub const GAP: usize = 2;
    /// Raw bytes column: the longest instruction is 6 bytes, `xx ` each.
    pub const BYTES: usize = 17;
}

/// Format an address as `0x` followed by 8 lowercase hex digits.
pub fn format_addr(addr: u32) -> String {
    format!("{addr:#010x}")
}

/// Format raw bytes as space-separated lowercase hex pairs.
pub fn format_bytes(bytes: &[u8]) -> String {
    let parts: Vec<_> = bytes.iter().map(|b| format!("{b:02x}")).collect();
    parts.join(" ")
}

/// Format an instruction as assembly text.
///
/// `target_label` replaces the numeric address of a CALL or JMP operand.
pub fn format_instruction(
    instr: &Instruction,
    target_label: Option<&str>,
    colors: Colors,
) -> String {
    let c = colors;
    let mnemonic = instr.opcode().mnemonic();
    let operand = |src: Operand| match src {
        Operand::Reg(r) => r.to_string(),
        Operand::Imm(iv) => c.paint(c.green, &iv.to_string()),
    };

    match *instr {
        Instruction::Load { dst, src } => format!("{mnemonic} {dst}, [{src}]"),
        Instruction::Store { dst, src } => format!("{mnemonic} [{dst}], {src}"),
        Instruction::Mov { dst, src }
        | Instruction::Alu { dst, src, .. }
        | Instruction::Cmp { dst, src } => format!("{mnemonic} {dst}, {}", operand(src)),
        Instruction::Not { reg } | Instruction::Push { reg } | Instruction::Pop { reg } => {
            format!("{mnemonic} {reg}")
        }
        Instruction::Call { target } | Instruction::Jump { target, .. } => {
            let shown = match target_label {
                Some(name) => name.to_string(),
                None => format_addr(target),
            };
            format!("{}{mnemonic}{} {}", c.blue, c.reset, shown)
        }
        Instruction::Ret => format!("{}{mnemonic}{}", c.blue, c.reset),
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_instruction(self, None, Colors::OFF))
    }
}

/// Builder for formatted output lines.
///
/// Constructs lines following the column layout:
/// `<indent><addr><gap><bytes><gap><content>`
#[derive(Clone, Copy, Debug, Default)]
pub struct LineBuilder {
    colors: Colors,
}

impl LineBuilder {
    pub fn new(colors: Colors) -> Self {
        Self { colors }
    }

    /// Build an instruction line: address, raw bytes, then `content`.
    pub fn instruction_line(&self, addr: u32, raw: &[u8], content: &str) -> String {
        let c = &self.colors;
        let bytes = format_bytes(raw);
        format!(
            "{:indent$}{}{}{}{:gap$}{}{:<bw$}{}{:gap$}{content}",
            "",
            c.dim,
            format_addr(addr),
            c.reset,
            "",
            c.dim,
            bytes,
            c.reset,
            "",
            indent = cols::INDENT,
            gap = cols::GAP,
            bw = cols::BYTES,
        )
    }

    /// Build a sub-line aligned under the content column.
    pub fn subline(&self, content: &str) -> String {
        let width = cols::INDENT + cols::ADDR + cols::GAP + cols::BYTES + cols::GAP;
        format!("{:width$}{content}", "")
    }

    /// Build a label line (`name:`), flush left.
    pub fn label_line(&self, name: &str) -> String {
        let c = &self.colors;
        format!("{}{name}{}:", c.blue, c.reset)
    }
}
