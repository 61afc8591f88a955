//! Host side of the syscall trampoline.
//!
//! A guest enters a syscall by transferring control to address 0 with the
//! syscall identifier on the stack, one slot above the return address:
//!
//! ```text
//! SP + 8 + 4*i   argument i
//! SP + 4         syscall identifier
//! SP             return address
//! ```
//!
//! Identifier 0 halts the VM and never reaches the host. Every other
//! identifier is handed to a [`SyscallHandler`]; on success the engine pops
//! the return address and resumes the caller.

use std::collections::BTreeMap;

use super::error::{ConfigError, RuntimeError};
use super::memory::{Memory, WORD_SIZE};
use super::registers::RegisterFile;

/// Failure reported by a syscall handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyscallError {
    /// The handler does not know this identifier.
    #[error("unhandled syscall")]
    Unhandled,

    #[error("{0}")]
    Failed(String),

    /// Guest state access failed, e.g. an argument outside memory.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Engine state lent to a handler for the duration of one syscall.
pub struct SyscallContext<'a> {
    registers: &'a mut RegisterFile,
    memory: &'a mut Memory,
}

impl<'a> SyscallContext<'a> {
    pub fn new(registers: &'a mut RegisterFile, memory: &'a mut Memory) -> Self {
        Self { registers, memory }
    }

    pub fn registers(&self) -> &RegisterFile {
        self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        self.registers
    }

    pub fn memory(&self) -> &Memory {
        self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        self.memory
    }

    /// Syscall argument `index`, the word at `SP + 8 + 4 * index`.
    pub fn arg(&self, index: u32) -> Result<u32, RuntimeError> {
        let addr = self
            .registers
            .sp()
            .wrapping_add(2 * WORD_SIZE as u32)
            .wrapping_add(index.wrapping_mul(WORD_SIZE as u32));
        self.memory.read_u32(addr)
    }
}

/// Host services reachable through the trampoline.
pub trait SyscallHandler {
    /// Service syscall `id`. Return [`SyscallError::Unhandled`] for an
    /// identifier this handler does not provide.
    fn syscall(&mut self, id: u32, ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError>;
}

/// Handler that provides no syscalls; only VM exit works.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSyscalls;

impl SyscallHandler for NoSyscalls {
    fn syscall(&mut self, _id: u32, _ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError> {
        Err(SyscallError::Unhandled)
    }
}

type SyscallFn = Box<dyn FnMut(&mut SyscallContext<'_>) -> Result<(), SyscallError>>;

/// Handler dispatching by identifier to registered closures.
#[derive(Default)]
pub struct SyscallTable {
    entries: BTreeMap<u32, SyscallFn>,
}

impl SyscallTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` as syscall `id`, replacing any previous entry.
    pub fn register<F>(&mut self, id: u32, f: F) -> Result<(), ConfigError>
    where
        F: FnMut(&mut SyscallContext<'_>) -> Result<(), SyscallError> + 'static,
    {
        if id == regvm_bytecode::SYSCALL_VM_EXIT {
            return Err(ConfigError::ReservedSyscall);
        }
        self.entries.insert(id, Box::new(f));
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, id: u32, f: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&mut SyscallContext<'_>) -> Result<(), SyscallError> + 'static,
    {
        self.register(id, f)?;
        Ok(self)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Registered identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }
}

impl SyscallHandler for SyscallTable {
    fn syscall(&mut self, id: u32, ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError> {
        match self.entries.get_mut(&id) {
            Some(f) => f(ctx),
            None => Err(SyscallError::Unhandled),
        }
    }
}

impl std::fmt::Debug for SyscallTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<H: SyscallHandler + ?Sized> SyscallHandler for &mut H {
    fn syscall(&mut self, id: u32, ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError> {
        (**self).syscall(id, ctx)
    }
}

impl<H: SyscallHandler + ?Sized> SyscallHandler for Box<H> {
    fn syscall(&mut self, id: u32, ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError> {
        (**self).syscall(id, ctx)
    }
}
