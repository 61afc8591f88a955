//! Syscalls the CLI provides to guest programs.

use std::io::Write;

use regvm_vm::{SyscallContext, SyscallError, SyscallHandler};

/// Write the low byte of argument 0.
pub const SYSCALL_PUTC: u32 = 1;
/// Write argument 0 as a signed decimal followed by a newline.
pub const SYSCALL_PUTN: u32 = 2;

/// Host syscall handler writing guest output to `out`.
#[derive(Debug)]
pub struct HostSyscalls<W> {
    out: W,
}

impl HostSyscalls<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> HostSyscalls<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SyscallHandler for HostSyscalls<W> {
    fn syscall(&mut self, id: u32, ctx: &mut SyscallContext<'_>) -> Result<(), SyscallError> {
        let written = match id {
            SYSCALL_PUTC => {
                let byte = ctx.arg(0)? as u8;
                self.out.write_all(&[byte])
            }
            SYSCALL_PUTN => {
                let value = ctx.arg(0)? as i32;
                writeln!(self.out, "{value}")
            }
            _ => return Err(SyscallError::Unhandled),
        };
        written.map_err(|err| SyscallError::Failed(err.to_string()))
    }
}
