//! Engine capability, factory and run entry points.

use super::config::{EngineConfig, EngineKind};
use super::error::{ConfigError, RuntimeError, VmError};
use super::interpreter::Interpreter;
use super::limits::ExecLimits;
use super::registers::RegisterState;
use super::syscall::{NoSyscalls, SyscallHandler};
use super::trace::{NoopTracer, PrintTracer, Tracer};

/// A way of executing program images.
///
/// The four phases run in order through the provided [`execute`](Self::execute).
pub trait ExecutionEngine {
    fn kind(&self) -> EngineKind;

    fn config(&self) -> &EngineConfig;

    /// Allocate memory and reset registers.
    fn init_execution(&mut self, tracer: &mut dyn Tracer);

    /// Copy the image to address 0.
    fn load_program(&mut self, image: &[u8], tracer: &mut dyn Tracer) -> Result<(), ConfigError>;

    /// Run until the exit syscall.
    fn exec_program(
        &mut self,
        syscalls: &mut dyn SyscallHandler,
        tracer: &mut dyn Tracer,
    ) -> Result<(), RuntimeError>;

    /// Report the final registers.
    fn fini_execution(&mut self, tracer: &mut dyn Tracer) -> RegisterState;

    fn execute(
        &mut self,
        image: &[u8],
        syscalls: &mut dyn SyscallHandler,
        tracer: &mut dyn Tracer,
    ) -> Result<RegisterState, VmError> {
        tracer.trace_configure(self.kind(), image.len(), self.config().ram_mib());
        self.init_execution(tracer);
        self.load_program(image, tracer)?;
        self.exec_program(syscalls, tracer)?;
        Ok(self.fini_execution(tracer))
    }
}

/// Construct the engine selected by `kind`.
pub fn create_engine(kind: EngineKind, config: EngineConfig) -> Box<dyn ExecutionEngine> {
    match kind {
        EngineKind::Interpreter => Box::new(Interpreter::new(config)),
    }
}

/// Parameters of [`run_with`].
pub struct RunOptions<'a> {
    ram_mib: u32,
    engine: EngineKind,
    limits: ExecLimits,
    syscalls: Option<&'a mut dyn SyscallHandler>,
    tracer: Option<&'a mut dyn Tracer>,
}

impl Default for RunOptions<'_> {
    fn default() -> Self {
        Self {
            ram_mib: super::config::MIN_RAM_MIB,
            engine: EngineKind::default(),
            limits: ExecLimits::default(),
            syscalls: None,
            tracer: None,
        }
    }
}

impl<'a> RunOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested memory size in MiB, rounded up when the engine is built.
    pub fn ram_mib(mut self, mib: u32) -> Self {
        self.ram_mib = mib;
        self
    }

    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.engine = kind;
        self
    }

    pub fn limits(mut self, limits: ExecLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn instruction_budget(mut self, budget: u64) -> Self {
        self.limits = self.limits.instruction_budget(budget);
        self
    }

    /// Host syscalls. Without one, only the exit syscall works.
    pub fn syscalls(mut self, syscalls: &'a mut dyn SyscallHandler) -> Self {
        self.syscalls = Some(syscalls);
        self
    }

    pub fn tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }
}

/// Run `image` to completion.
///
/// With `debug`, the execution trace is streamed to stdout as the program
/// runs. Failures writing the trace do not affect the result.
pub fn run(
    image: &[u8],
    requested_ram_mib: u32,
    engine: EngineKind,
    debug: bool,
) -> Result<RegisterState, VmError> {
    let options = RunOptions::new().ram_mib(requested_ram_mib).engine(engine);
    if !debug {
        return run_with(image, options);
    }

    let mut tracer = PrintTracer::builder().build_with(std::io::stdout());
    let result = run_with(image, options.tracer(&mut tracer));
    let _ = tracer.finish();
    result
}

/// Run `image` with explicit syscalls, tracer and limits.
pub fn run_with(image: &[u8], options: RunOptions<'_>) -> Result<RegisterState, VmError> {
    let RunOptions {
        ram_mib,
        engine,
        limits,
        syscalls,
        tracer,
    } = options;

    let config = EngineConfig::new(ram_mib)?.limits(limits);
    let mut engine = create_engine(engine, config);

    let mut no_syscalls = NoSyscalls;
    let mut noop = NoopTracer;
    let syscalls: &mut dyn SyscallHandler = match syscalls {
        Some(syscalls) => syscalls,
        None => &mut no_syscalls,
    };
    let tracer: &mut dyn Tracer = match tracer {
        Some(tracer) => tracer,
        None => &mut noop,
    };
    engine.execute(image, syscalls, tracer)
}
