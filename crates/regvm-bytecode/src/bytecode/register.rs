//! Register identifiers.

use std::fmt;

/// One of the 16 architectural registers.
///
/// The discriminant is the 4-bit encoding used in operand bytes and the
/// slot index in the register file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    Flags = 13,
    Sp = 14,
    Pc = 15,
}

impl Register {
    /// Number of registers in the file.
    pub const COUNT: usize = 16;

    /// All registers in encoding order.
    pub const ALL: [Register; Self::COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::Flags,
        Self::Sp,
        Self::Pc,
    ];

    /// Decode a 4-bit register field. Upper bits are ignored.
    pub fn from_nibble(n: u8) -> Self {
        Self::ALL[(n & 0x0f) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Assembly name, lowercase (`r0`, `flags`, `sp`, `pc`).
    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "r11",
            Self::R12 => "r12",
            Self::Flags => "flags",
            Self::Sp => "sp",
            Self::Pc => "pc",
        }
    }

    /// Parse an assembly register name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
