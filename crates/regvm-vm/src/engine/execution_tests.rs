use regvm_bytecode::{Register, assemble_program};

use super::config::{EngineConfig, EngineKind};
use super::error::{ConfigError, RuntimeError, VmError};
use super::execution::{RunOptions, create_engine, run, run_with};
use super::syscall::NoSyscalls;
use super::trace::{NoopTracer, PrintTracer};

fn answer() -> Vec<u8> {
    assemble_program("mov r0, 42\nmov r12, 0\npush r12\ncall 0")
        .unwrap()
        .bytes
}

#[test]
fn run_returns_final_registers() {
    let state = run(&answer(), 3, EngineKind::Interpreter, false).unwrap();

    assert_eq!(state.get(Register::R0), 42);
    assert_eq!(state.get(Register::Sp), (4 << 20) - 8);
    assert_eq!(state.get(Register::Pc), 0);
}

#[test]
fn requested_ram_is_rounded() {
    let state = run_with(&answer(), RunOptions::new().ram_mib(5)).unwrap();
    assert_eq!(state.get(Register::Sp), (8 << 20) - 8);
}

#[test]
fn config_errors_come_before_execution() {
    let mut tracer = PrintTracer::builder().build();
    let err = run_with(
        &answer(),
        RunOptions::new().ram_mib(4096).tracer(&mut tracer),
    )
    .unwrap_err();

    assert_eq!(err, VmError::Config(ConfigError::RamTooLarge(4096)));
    assert!(tracer.lines().is_empty());
}

#[test]
fn image_must_fit_in_memory() {
    let image = vec![0; (4 << 20) + 1];
    let err = run(&image, 4, EngineKind::Interpreter, false).unwrap_err();
    assert_eq!(
        err,
        VmError::Config(ConfigError::ImageTooLarge {
            size: (4 << 20) + 1,
            memory: 4 << 20
        })
    );
}

#[test]
fn runtime_errors_are_wrapped() {
    let image = assemble_program("loop: jmp loop").unwrap().bytes;
    let err = run_with(&image, RunOptions::new().instruction_budget(100)).unwrap_err();

    assert_eq!(err, VmError::Runtime(RuntimeError::ExecFuelExhausted(100)));
    assert_eq!(err.to_string(), "instruction budget of 100 exhausted");
}

#[test]
fn factory_builds_interpreter() {
    let config = EngineConfig::new(16).unwrap();
    let mut engine = create_engine("interpreter".parse().unwrap(), config);

    assert_eq!(engine.kind(), EngineKind::Interpreter);
    assert_eq!(engine.config().ram_mib(), 16);

    let state = engine
        .execute(&answer(), &mut NoSyscalls, &mut NoopTracer)
        .unwrap();
    assert_eq!(state.get(Register::R0), 42);
}

#[test]
fn engine_phases_in_order() {
    let mut engine = create_engine(EngineKind::Interpreter, EngineConfig::default());
    let mut tracer = NoopTracer;

    engine.init_execution(&mut tracer);
    engine.load_program(&answer(), &mut tracer).unwrap();
    engine.exec_program(&mut NoSyscalls, &mut tracer).unwrap();
    let state = engine.fini_execution(&mut tracer);

    assert_eq!(state.get(Register::R0), 42);
}
