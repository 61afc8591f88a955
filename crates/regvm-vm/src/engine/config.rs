//! Engine selection and memory sizing.

use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;
use super::limits::ExecLimits;

/// Smallest memory an engine is given, in MiB.
pub const MIN_RAM_MIB: u32 = 4;
/// Largest memory an engine accepts, in MiB. The initial SP equals the
/// memory length, which must fit in a 32-bit register.
pub const MAX_RAM_MIB: u32 = 2048;

/// Round a requested memory size up to a power of two MiB, at least
/// [`MIN_RAM_MIB`].
pub fn round_ram_mib(requested: u32) -> Result<u32, ConfigError> {
    if requested > MAX_RAM_MIB {
        return Err(ConfigError::RamTooLarge(requested));
    }
    Ok(requested.max(MIN_RAM_MIB).next_power_of_two())
}

/// Available execution engine implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineKind {
    #[default]
    Interpreter,
}

impl EngineKind {
    pub const ALL: [EngineKind; 1] = [Self::Interpreter];

    pub fn name(self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
        }
    }
}

impl FromStr for EngineKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownEngine(s.to_string()))
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated engine parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    ram_mib: u32,
    limits: ExecLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ram_mib: MIN_RAM_MIB,
            limits: ExecLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration for `requested_mib` of memory, rounded with
    /// [`round_ram_mib`].
    pub fn new(requested_mib: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            ram_mib: round_ram_mib(requested_mib)?,
            ..Self::default()
        })
    }

    /// Set the execution limits.
    pub fn limits(mut self, limits: ExecLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the instruction budget.
    pub fn instruction_budget(mut self, budget: u64) -> Self {
        self.limits = self.limits.instruction_budget(budget);
        self
    }

    /// Memory size after rounding, in MiB.
    pub fn ram_mib(&self) -> u32 {
        self.ram_mib
    }

    /// Memory size in bytes.
    pub fn ram_bytes(&self) -> usize {
        (self.ram_mib as usize) << 20
    }

    pub fn get_limits(&self) -> ExecLimits {
        self.limits
    }
}
