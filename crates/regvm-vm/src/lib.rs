//! Register-based virtual machine for regvm program images.
//!
//! This crate provides guest memory, the register file, the dispatch loop,
//! the syscall trampoline and the tracer.

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    ConfigError, EngineConfig, EngineKind, ExecLimits, ExecutionEngine, Interpreter, Memory,
    NoSyscalls, NoopTracer, PrintTracer, RegisterFile, RegisterState, RunOptions, RuntimeError,
    SyscallContext, SyscallError, SyscallHandler, SyscallTable, Tracer, Verbosity, VmError,
    create_engine, round_ram_mib, run, run_with,
};
