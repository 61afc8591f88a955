//! Tracing infrastructure for debugging guest execution.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The engine is generic over its tracer. With `NoopTracer` every trait
//! method is an `#[inline(always)]` empty function, so the calls and their
//! arguments vanish from the dispatch loop.
//!
//! # Design: Tracer-Owned State
//!
//! State needed only for display (the register file before the current
//! instruction, used for change sub-lines) lives in the tracer. The engine
//! hands over borrowed views and never stores anything on the tracer's
//! behalf.

use std::io::{self, Write};

use regvm_bytecode::{Colors, Instruction, LineBuilder, Register, format_instruction};

use super::config::EngineKind;
use super::registers::{RegisterFile, RegisterState};

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Default: lifecycle lines, one line per instruction, final registers.
    #[default]
    Default,
    /// Verbose (-v): adds a sub-line for every register an instruction or
    /// syscall changed.
    Verbose,
    /// Very verbose (-vv): change sub-lines include PC.
    VeryVerbose,
}

/// Tracer trait for engine instrumentation.
///
/// Methods are called at fixed points of a run:
/// - `trace_configure` - before anything else, with the engine parameters
/// - `trace_init_memory` / `trace_init_registers` - during initialization
/// - `trace_load_program` - before the image is copied into memory
/// - `trace_run` - when the dispatch loop starts
/// - `trace_instruction` - after decoding, before executing
/// - `trace_syscall` - when control reaches the trampoline
/// - `trace_retired` - after an instruction or syscall completed
/// - `trace_halt` - after the exit syscall, with the final registers
pub trait Tracer {
    fn trace_configure(&mut self, kind: EngineKind, image_len: usize, ram_mib: u32);

    fn trace_init_memory(&mut self, len: usize);

    fn trace_init_registers(&mut self, regs: &RegisterFile);

    fn trace_load_program(&mut self, image_len: usize);

    fn trace_run(&mut self);

    /// `raw` holds exactly the bytes of `instr`.
    fn trace_instruction(
        &mut self,
        addr: u32,
        raw: &[u8],
        instr: &Instruction,
        regs: &RegisterFile,
    );

    fn trace_syscall(&mut self, id: u32, regs: &RegisterFile);

    fn trace_retired(&mut self, regs: &RegisterFile);

    fn trace_halt(&mut self, state: &RegisterState);
}

/// No-op tracer that gets optimized away completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_configure(&mut self, _kind: EngineKind, _image_len: usize, _ram_mib: u32) {}

    #[inline(always)]
    fn trace_init_memory(&mut self, _len: usize) {}

    #[inline(always)]
    fn trace_init_registers(&mut self, _regs: &RegisterFile) {}

    #[inline(always)]
    fn trace_load_program(&mut self, _image_len: usize) {}

    #[inline(always)]
    fn trace_run(&mut self) {}

    #[inline(always)]
    fn trace_instruction(
        &mut self,
        _addr: u32,
        _raw: &[u8],
        _instr: &Instruction,
        _regs: &RegisterFile,
    ) {
    }

    #[inline(always)]
    fn trace_syscall(&mut self, _id: u32, _regs: &RegisterFile) {}

    #[inline(always)]
    fn trace_retired(&mut self, _regs: &RegisterFile) {}

    #[inline(always)]
    fn trace_halt(&mut self, _state: &RegisterState) {}
}

/// Tracer that writes human-readable trace lines to a sink as they are
/// produced.
///
/// The default sink is an in-memory buffer, read back with
/// [`lines`](PrintTracer::lines). Write failures stop further output and
/// are reported by [`finish`](PrintTracer::finish).
pub struct PrintTracer<W: Write = Vec<u8>> {
    /// Verbosity level for output filtering.
    verbosity: Verbosity,
    /// Destination of trace lines.
    out: W,
    /// First write failure, if any.
    error: Option<io::Error>,
    /// Line builder for formatting.
    builder: LineBuilder,
    /// Registers as they were before the current instruction.
    before: Option<RegisterFile>,
    /// Color palette.
    colors: Colors,
}

/// Builder for [`PrintTracer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintTracerBuilder {
    verbosity: Verbosity,
    colored: bool,
}

impl PrintTracerBuilder {
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Build a tracer that buffers lines in memory.
    pub fn build(self) -> PrintTracer {
        self.build_with(Vec::new())
    }

    /// Build a tracer that writes each line to `out`.
    pub fn build_with<W: Write>(self, out: W) -> PrintTracer<W> {
        let colors = Colors::new(self.colored);
        PrintTracer {
            verbosity: self.verbosity,
            out,
            error: None,
            builder: LineBuilder::new(colors),
            before: None,
            colors,
        }
    }
}

impl Default for PrintTracer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PrintTracer {
    pub fn builder() -> PrintTracerBuilder {
        PrintTracerBuilder::default()
    }

    /// Buffered lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.output().lines().map(str::to_string).collect()
    }

    /// All buffered lines joined with newlines.
    pub fn output(&self) -> String {
        let text = String::from_utf8_lossy(&self.out);
        let text: &str = &text;
        text.strip_suffix('\n').unwrap_or(text).to_string()
    }
}

impl<W: Write> PrintTracer<W> {
    /// Flush the sink and hand it back, or return the first write failure.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn push(&mut self, line: impl AsRef<str>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", line.as_ref()) {
            self.error = Some(err);
        }
    }

    /// Add one sub-line per register changed since the last instruction.
    fn add_changes(&mut self, regs: &RegisterFile) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let Some(before) = self.before.take() else {
            return;
        };
        let c = self.colors;
        for reg in regs.changed_since(&before) {
            if reg == Register::Pc && self.verbosity != Verbosity::VeryVerbose {
                continue;
            }
            let value = c.paint(c.green, &format!("{:#010x}", regs.get(reg)));
            let content = if reg == Register::Flags {
                format!("{reg} = {value} ({})", regs.flags())
            } else {
                format!("{reg} = {value}")
            };
            let line = self.builder.subline(&content);
            self.push(line);
        }
    }
}

impl<W: Write> Tracer for PrintTracer<W> {
    fn trace_configure(&mut self, kind: EngineKind, image_len: usize, ram_mib: u32) {
        self.push("Initializing VM with:");
        self.push(format!("\tprogram size {image_len} bytes"));
        self.push(format!("\tmemory {ram_mib} MiB"));
        self.push(format!("\ttype '{kind}'"));
    }

    fn trace_init_memory(&mut self, len: usize) {
        self.push("Initializing memory ...");
        self.push(format!("\tmemory [{len:#010x}]"));
    }

    fn trace_init_registers(&mut self, _regs: &RegisterFile) {
        self.push("Initializing registers ...");
    }

    fn trace_load_program(&mut self, _image_len: usize) {
        self.push("Loading program ...");
    }

    fn trace_run(&mut self) {
        self.push("Running program ...");
    }

    fn trace_instruction(
        &mut self,
        addr: u32,
        raw: &[u8],
        instr: &Instruction,
        regs: &RegisterFile,
    ) {
        let content = format_instruction(instr, None, self.colors);
        let line = self.builder.instruction_line(addr, raw, &content);
        self.push(line);
        self.before = Some(*regs);
    }

    fn trace_syscall(&mut self, id: u32, regs: &RegisterFile) {
        let c = self.colors;
        let content = format!("{}syscall{} {id}", c.blue, c.reset);
        let line = self.builder.instruction_line(regs.pc(), &[], &content);
        self.push(line);
        self.before = Some(*regs);
    }

    fn trace_retired(&mut self, regs: &RegisterFile) {
        self.add_changes(regs);
    }

    fn trace_halt(&mut self, state: &RegisterState) {
        self.before = None;
        for line in state.to_string().lines() {
            self.push(line);
        }
    }
}
