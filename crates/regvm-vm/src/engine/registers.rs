//! Register file and its reportable snapshot.

use std::fmt;

use regvm_bytecode::{ENTRY_POINT, Flags, Register};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The 16 architectural registers, indexed by [`Register`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile([u32; Register::COUNT]);

impl RegisterFile {
    /// Reset state: all zero except SP at the top of memory and PC at the
    /// entry point.
    pub fn new(sp: u32) -> Self {
        let mut regs = Self::default();
        regs.set(Register::Sp, sp);
        regs.set(Register::Pc, ENTRY_POINT);
        regs
    }

    pub fn get(&self, reg: Register) -> u32 {
        self.0[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: u32) {
        self.0[reg.index()] = value;
    }

    pub fn pc(&self) -> u32 {
        self.get(Register::Pc)
    }

    pub fn set_pc(&mut self, value: u32) {
        self.set(Register::Pc, value);
    }

    pub fn sp(&self) -> u32 {
        self.get(Register::Sp)
    }

    pub fn set_sp(&mut self, value: u32) {
        self.set(Register::Sp, value);
    }

    pub fn flags(&self) -> Flags {
        Flags::from_bits(self.get(Register::Flags))
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.set(Register::Flags, flags.bits());
    }

    /// Registers whose value differs from `before`, in encoding order.
    pub fn changed_since(&self, before: &RegisterFile) -> Vec<Register> {
        Register::ALL
            .into_iter()
            .filter(|&r| self.get(r) != before.get(r))
            .collect()
    }

    pub fn state(&self) -> RegisterState {
        RegisterState(self.0)
    }
}

/// Final register values reported when a run ends.
///
/// Displays as the register dump (`Registers:` then one `NAME = 0x........`
/// line per register) and serializes as a map from lowercase register name
/// to value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterState([u32; Register::COUNT]);

impl RegisterState {
    pub fn get(&self, reg: Register) -> u32 {
        self.0[reg.index()]
    }

    pub fn values(&self) -> &[u32; Register::COUNT] {
        &self.0
    }
}

impl fmt::Display for RegisterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registers:")?;
        for reg in Register::ALL {
            let name = reg.name().to_ascii_uppercase();
            writeln!(f, "\t{name:<5} = {:#010x}", self.get(reg))?;
        }
        Ok(())
    }
}

impl Serialize for RegisterState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Register::COUNT))?;
        for reg in Register::ALL {
            map.serialize_entry(reg.name(), &self.get(reg))?;
        }
        map.end()
    }
}
