//! Dispatch-loop interpreter.

use regvm_bytecode::{Flags, Instruction, Operand, SYSCALL_ENTRY, SYSCALL_VM_EXIT};

use super::config::{EngineConfig, EngineKind};
use super::execution::ExecutionEngine;
use super::error::{ConfigError, RuntimeError};
use super::memory::{Memory, WORD_SIZE};
use super::registers::{RegisterFile, RegisterState};
use super::syscall::{SyscallContext, SyscallError, SyscallHandler};
use super::trace::{NoopTracer, Tracer};

/// Outcome of a single [`Interpreter::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The exit syscall was reached.
    Halted,
}

/// Fetch/decode/execute interpreter over a flat memory.
///
/// Lifecycle: [`init`](Self::init) allocates memory and resets registers,
/// [`load`](Self::load) copies the image to address 0, then
/// [`run_loop`](Self::run_loop) executes until the exit syscall.
#[derive(Debug)]
pub struct Interpreter {
    config: EngineConfig,
    memory: Memory,
    registers: RegisterFile,
    /// Fetches so far, syscall entries included.
    executed: u64,
}

impl Interpreter {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            memory: Memory::new(0),
            registers: RegisterFile::default(),
            executed: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Allocate zeroed memory and reset the register file.
    pub fn init<T: Tracer + ?Sized>(&mut self, tracer: &mut T) {
        let len = self.config.ram_bytes();
        tracer.trace_init_memory(len);
        self.memory = Memory::new(len);

        // MAX_RAM_MIB keeps the length within u32.
        self.registers = RegisterFile::new(len as u32);
        self.executed = 0;
        tracer.trace_init_registers(&self.registers);
    }

    /// Copy `image` to address 0.
    pub fn load<T: Tracer + ?Sized>(
        &mut self,
        image: &[u8],
        tracer: &mut T,
    ) -> Result<(), ConfigError> {
        tracer.trace_load_program(image.len());
        self.memory.load_image(image)
    }

    /// Run until the exit syscall, without tracing.
    pub fn run_to_halt<S: SyscallHandler + ?Sized>(
        &mut self,
        syscalls: &mut S,
    ) -> Result<(), RuntimeError> {
        self.run_loop(syscalls, &mut NoopTracer)
    }

    /// Run until the exit syscall, a fatal error or the instruction budget.
    pub fn run_loop<S, T>(&mut self, syscalls: &mut S, tracer: &mut T) -> Result<(), RuntimeError>
    where
        S: SyscallHandler + ?Sized,
        T: Tracer + ?Sized,
    {
        tracer.trace_run();
        let budget = self.config.get_limits().get_instruction_budget();
        loop {
            if let Some(budget) = budget
                && self.executed >= budget
            {
                return Err(RuntimeError::ExecFuelExhausted(budget));
            }
            self.executed += 1;

            if self.step(syscalls, tracer)? == Step::Halted {
                return Ok(());
            }
        }
    }

    /// Execute one instruction, or one trampoline entry when PC is 0.
    pub fn step<S, T>(&mut self, syscalls: &mut S, tracer: &mut T) -> Result<Step, RuntimeError>
    where
        S: SyscallHandler + ?Sized,
        T: Tracer + ?Sized,
    {
        let pc = self.registers.pc();
        if pc == SYSCALL_ENTRY {
            return self.enter_syscall(syscalls, tracer);
        }

        let window = self.memory.fetch(pc)?;
        let instr = Instruction::decode(window)
            .map_err(|source| RuntimeError::Decode { addr: pc, source })?;
        tracer.trace_instruction(pc, &window[..instr.size()], &instr, &self.registers);

        self.exec(instr)?;
        tracer.trace_retired(&self.registers);
        Ok(Step::Continue)
    }

    fn enter_syscall<S, T>(&mut self, syscalls: &mut S, tracer: &mut T) -> Result<Step, RuntimeError>
    where
        S: SyscallHandler + ?Sized,
        T: Tracer + ?Sized,
    {
        let id_addr = self.registers.sp().wrapping_add(WORD_SIZE as u32);
        let id = self.memory.read_u32(id_addr)?;
        tracer.trace_syscall(id, &self.registers);
        if id == SYSCALL_VM_EXIT {
            return Ok(Step::Halted);
        }

        let mut ctx = SyscallContext::new(&mut self.registers, &mut self.memory);
        syscalls.syscall(id, &mut ctx).map_err(|err| match err {
            SyscallError::Unhandled => RuntimeError::UnhandledSyscall(id),
            SyscallError::Failed(message) => RuntimeError::Syscall { id, message },
            SyscallError::Runtime(err) => err,
        })?;

        self.ret()?;
        tracer.trace_retired(&self.registers);
        Ok(Step::Continue)
    }

    /// Execute a decoded instruction at the current PC.
    ///
    /// Control transfers set PC and return early. Everything else advances
    /// PC by the instruction size, starting from the value PC holds after
    /// the instruction's own effect (so `mov pc, r1` continues at `r1 + 2`).
    fn exec(&mut self, instr: Instruction) -> Result<(), RuntimeError> {
        let pc = self.registers.pc();
        let size = instr.size() as u32;

        match instr {
            Instruction::Load { dst, src } => {
                let value = self.memory.read_u32(self.registers.get(src))?;
                self.registers.set(dst, value);
            }
            Instruction::Store { dst, src } => {
                self.memory
                    .write_u32(self.registers.get(dst), self.registers.get(src))?;
            }
            Instruction::Mov { dst, src } => {
                let value = self.operand(src);
                self.registers.set(dst, value);
            }
            Instruction::Alu { op, dst, src } => {
                let value = op.apply(self.registers.get(dst), self.operand(src));
                self.registers.set(dst, value);
            }
            Instruction::Not { reg } => {
                self.registers.set(reg, !self.registers.get(reg));
            }
            Instruction::Cmp { dst, src } => {
                let flags = Flags::compare(self.registers.get(dst), self.operand(src));
                self.registers.set_flags(flags);
            }
            Instruction::Push { reg } => {
                let sp = self.registers.sp().wrapping_sub(WORD_SIZE as u32);
                self.registers.set_sp(sp);
                self.memory.write_u32(sp, self.registers.get(reg))?;
            }
            Instruction::Pop { reg } => {
                let value = self.memory.read_u32(self.registers.sp())?;
                self.registers.set(reg, value);
                let sp = self.registers.sp().wrapping_add(WORD_SIZE as u32);
                self.registers.set_sp(sp);
            }
            Instruction::Call { target } => {
                let sp = self.registers.sp().wrapping_sub(WORD_SIZE as u32);
                self.memory.write_u32(sp, pc.wrapping_add(size))?;
                self.registers.set_sp(sp);
                self.registers.set_pc(target);
                return Ok(());
            }
            Instruction::Ret => return self.ret(),
            Instruction::Jump { cond, target } => {
                let next = if cond.is_satisfied(self.registers.flags()) {
                    target
                } else {
                    pc.wrapping_add(size)
                };
                self.registers.set_pc(next);
                return Ok(());
            }
        }

        let next = self.registers.pc().wrapping_add(size);
        self.registers.set_pc(next);
        Ok(())
    }

    fn operand(&self, src: Operand) -> u32 {
        match src {
            Operand::Reg(reg) => self.registers.get(reg),
            Operand::Imm(iv) => iv,
        }
    }

    /// Pop the return address into PC.
    fn ret(&mut self) -> Result<(), RuntimeError> {
        let sp = self.registers.sp();
        let addr = self.memory.read_u32(sp)?;
        self.registers.set_sp(sp.wrapping_add(WORD_SIZE as u32));
        self.registers.set_pc(addr);
        Ok(())
    }
}

impl ExecutionEngine for Interpreter {
    fn kind(&self) -> EngineKind {
        EngineKind::Interpreter
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn init_execution(&mut self, tracer: &mut dyn Tracer) {
        self.init(tracer);
    }

    fn load_program(&mut self, image: &[u8], tracer: &mut dyn Tracer) -> Result<(), ConfigError> {
        self.load(image, tracer)
    }

    fn exec_program(
        &mut self,
        syscalls: &mut dyn SyscallHandler,
        tracer: &mut dyn Tracer,
    ) -> Result<(), RuntimeError> {
        self.run_loop(syscalls, tracer)
    }

    fn fini_execution(&mut self, tracer: &mut dyn Tracer) -> RegisterState {
        let state = self.registers.state();
        tracer.trace_halt(&state);
        state
    }
}
