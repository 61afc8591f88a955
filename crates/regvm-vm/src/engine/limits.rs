//! Runtime limits for guest execution.

/// Runtime limits for a single run.
///
/// The default is unbounded: a guest that never reaches the exit syscall
/// runs forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecLimits {
    /// Maximum number of fetches, syscall entries included.
    pub(crate) instruction_budget: Option<u64>,
}

impl ExecLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of executed instructions.
    pub fn instruction_budget(mut self, budget: u64) -> Self {
        self.instruction_budget = Some(budget);
        self
    }

    pub fn get_instruction_budget(&self) -> Option<u64> {
        self.instruction_budget
    }
}
