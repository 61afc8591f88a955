//! Execution engine for regvm program images.
//!
//! The interpreter loads a flat image at address 0, starts at the entry
//! point and executes until the guest reaches the exit syscall through the
//! trampoline at address 0.

mod config;
mod error;
mod execution;
mod interpreter;
mod limits;
mod memory;
mod registers;
mod syscall;
mod trace;

#[cfg(test)]
mod execution_tests;
#[cfg(test)]
mod interpreter_tests;

pub use config::{EngineConfig, EngineKind, MAX_RAM_MIB, MIN_RAM_MIB, round_ram_mib};
pub use error::{ConfigError, RuntimeError, VmError};
pub use execution::{ExecutionEngine, RunOptions, create_engine, run, run_with};
pub use interpreter::{Interpreter, Step};
pub use limits::ExecLimits;
pub use memory::{Memory, WORD_SIZE};
pub use registers::{RegisterFile, RegisterState};
pub use syscall::{NoSyscalls, SyscallContext, SyscallError, SyscallHandler, SyscallTable};
pub use trace::{NoopTracer, PrintTracer, PrintTracerBuilder, Tracer, Verbosity};
