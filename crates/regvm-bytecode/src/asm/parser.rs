//! Line-level parsing of assembly source.

use crate::bytecode::{Opcode, Register};

use super::AsmErrorKind;

/// Characters that start a comment running to end of line.
const COMMENT_CHARS: [char; 2] = [';', '#'];
const LABEL_SUFFIX: char = ':';

/// A numeric literal or a label reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Value {
    Number(u32),
    Label(String),
}

/// One operand as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Arg {
    Reg(Register),
    /// `[reg]`, the memory operand of LOAD/STORE.
    Deref(Register),
    Value(Value),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Statement {
    Instr { opcode: Opcode, args: Vec<Arg> },
    Org(Value),
    Word(Value),
    Byte(Value),
}

/// A parsed source line: label definitions plus an optional statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Line {
    pub labels: Vec<String>,
    pub statement: Option<Statement>,
}

pub(crate) fn parse_line(text: &str) -> Result<Line, AsmErrorKind> {
    let text = match text.find(COMMENT_CHARS) {
        Some(idx) => &text[..idx],
        None => text,
    };
    let mut rest = text.trim();
    let mut line = Line::default();

    while let Some((head, tail)) = rest.split_once(LABEL_SUFFIX) {
        let head = head.trim();
        if head.contains(char::is_whitespace) {
            break;
        }
        if !is_identifier(head) || Register::from_name(head).is_some() {
            return Err(AsmErrorKind::InvalidLabel(head.to_string()));
        }
        line.labels.push(head.to_string());
        rest = tail.trim();
    }

    if rest.is_empty() {
        return Ok(line);
    }

    let (word, operands) = match rest.split_once(char::is_whitespace) {
        Some((word, operands)) => (word, operands.trim()),
        None => (rest, ""),
    };
    let args: Vec<&str> = if operands.is_empty() {
        Vec::new()
    } else {
        operands.split(',').map(str::trim).collect()
    };

    line.statement = Some(if let Some(directive) = word.strip_prefix('.') {
        parse_directive(directive, &args)?
    } else {
        let opcode = Opcode::from_mnemonic(word)
            .ok_or_else(|| AsmErrorKind::UnknownMnemonic(word.to_string()))?;
        let args = args
            .into_iter()
            .map(parse_arg)
            .collect::<Result<Vec<_>, _>>()?;
        Statement::Instr { opcode, args }
    });
    Ok(line)
}

fn parse_directive(name: &str, args: &[&str]) -> Result<Statement, AsmErrorKind> {
    let single = || match args {
        [arg] => parse_value(arg),
        _ => Err(AsmErrorKind::Usage(directive_usage(name))),
    };
    match name.to_ascii_lowercase().as_str() {
        "org" => Ok(Statement::Org(single()?)),
        "word" => Ok(Statement::Word(single()?)),
        "byte" => Ok(Statement::Byte(single()?)),
        _ => Err(AsmErrorKind::UnknownDirective(format!(".{name}"))),
    }
}

fn directive_usage(name: &str) -> String {
    format!(".{} VALUE", name.to_ascii_lowercase())
}

fn parse_arg(text: &str) -> Result<Arg, AsmErrorKind> {
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let inner = inner.trim();
        return Register::from_name(inner)
            .map(Arg::Deref)
            .ok_or_else(|| AsmErrorKind::ExpectedRegister(inner.to_string()));
    }
    if let Some(reg) = Register::from_name(text) {
        return Ok(Arg::Reg(reg));
    }
    parse_value(text).map(Arg::Value)
}

fn parse_value(text: &str) -> Result<Value, AsmErrorKind> {
    if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return parse_number(text).map(Value::Number);
    }
    if is_identifier(text) {
        return Ok(Value::Label(text.to_string()));
    }
    Err(AsmErrorKind::InvalidOperand(text.to_string()))
}

/// Parse a decimal (optionally negative) or `0x` hex literal into a u32.
///
/// Negative values are stored as two's complement.
pub(crate) fn parse_number(text: &str) -> Result<u32, AsmErrorKind> {
    let invalid = || AsmErrorKind::InvalidNumber(text.to_string());
    let (negative, digits) = match text.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).map_err(|_| invalid())?,
        None => digits.parse::<u64>().map_err(|_| invalid())?,
    };

    if negative {
        if magnitude > 1 << 31 {
            return Err(invalid());
        }
        Ok((magnitude as i64).wrapping_neg() as u32)
    } else {
        u32::try_from(magnitude).map_err(|_| invalid())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
