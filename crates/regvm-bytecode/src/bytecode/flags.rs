//! Condition flags produced by CMP and consumed by conditional jumps.

use std::fmt;

/// Contents of the FLAGS register.
///
/// Only the low four bits are ever set by CMP; anything else a program
/// writes into FLAGS through MOV is kept but ignored by jumps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct Flags(u32);

impl Flags {
    /// Destination operand was zero.
    pub const Z: u32 = 0b0001;
    /// Operands were equal.
    pub const EQ: u32 = 0b0010;
    /// Destination was less than source (signed).
    pub const LT: u32 = 0b0100;
    /// Destination was greater than source (signed).
    pub const GT: u32 = 0b1000;

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Flags for `CMP dst, src`: Z from `dst == 0`, plus exactly one of EQ/LT/GT.
    pub fn compare(dst: u32, src: u32) -> Self {
        let mut bits = if dst == 0 { Self::Z } else { 0 };
        bits |= match (dst as i32).cmp(&(src as i32)) {
            std::cmp::Ordering::Equal => Self::EQ,
            std::cmp::Ordering::Less => Self::LT,
            std::cmp::Ordering::Greater => Self::GT,
        };
        Self(bits)
    }

    pub fn zero(self) -> bool {
        self.0 & Self::Z != 0
    }

    pub fn equal(self) -> bool {
        self.0 & Self::EQ != 0
    }

    pub fn less(self) -> bool {
        self.0 & Self::LT != 0
    }

    pub fn greater(self) -> bool {
        self.0 & Self::GT != 0
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.zero(), "Z"),
            (self.equal(), "EQ"),
            (self.less(), "LT"),
            (self.greater(), "GT"),
        ];
        let set: Vec<_> = names
            .into_iter()
            .filter_map(|(on, name)| on.then_some(name))
            .collect();
        if set.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&set.join(" "))
        }
    }
}
