//! Errors that can occur while configuring or running a guest program.

use regvm_bytecode::DecodeError;

/// Rejected before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown engine kind `{0}` (expected `interpreter`)")]
    UnknownEngine(String),

    #[error("requested {0} MiB of memory, at most 2048 MiB is supported")]
    RamTooLarge(u32),

    #[error("program image of {size} bytes does not fit in {memory} bytes of memory")]
    ImageTooLarge { size: usize, memory: usize },

    /// Syscall 0 terminates the VM and cannot be taken over by the host.
    #[error("syscall 0 is reserved for VM exit")]
    ReservedSyscall,
}

/// Fatal condition raised by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("cannot decode instruction at {addr:#010x}: {source}")]
    Decode { addr: u32, source: DecodeError },

    #[error("unhandled syscall {0}")]
    UnhandledSyscall(u32),

    #[error("syscall {id} failed: {message}")]
    Syscall { id: u32, message: String },

    #[error("access of {size} bytes at {addr:#010x} is outside memory of {len:#x} bytes")]
    OutOfBounds { addr: u32, size: usize, len: usize },

    #[error("instruction budget of {0} exhausted")]
    ExecFuelExhausted(u64),
}

/// Any failure of [`run`](super::run) and friends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
