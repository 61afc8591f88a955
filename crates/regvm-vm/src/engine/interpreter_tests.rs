//! Tests for instruction semantics and the trampoline.

use indoc::{formatdoc, indoc};
use regvm_bytecode::{DecodeError, Flags, Instruction, JumpCondition, Register, assemble_program};

use super::config::EngineConfig;
use super::error::RuntimeError;
use super::interpreter::{Interpreter, Step};
use super::syscall::NoSyscalls;
use super::trace::NoopTracer;

const RAM: u32 = 4 << 20;

/// Guest code that halts through the exit syscall.
const EXIT: &str = indoc! {"
    mov r12, 0
    push r12
    call 0
"};

fn boot_image(image: &[u8]) -> Interpreter {
    let mut vm = Interpreter::new(EngineConfig::default());
    vm.init(&mut NoopTracer);
    vm.load(image, &mut NoopTracer).unwrap();
    vm
}

fn boot(source: &str) -> Interpreter {
    boot_image(&assemble_program(source).unwrap().bytes)
}

fn step(vm: &mut Interpreter) -> Step {
    vm.step(&mut NoSyscalls, &mut NoopTracer).unwrap()
}

fn run(source: &str) -> Interpreter {
    let mut vm = boot(source);
    vm.run_to_halt(&mut NoSyscalls).unwrap();
    vm
}

fn run_err(source: &str) -> (Interpreter, RuntimeError) {
    let mut vm = boot(source);
    let err = vm.run_to_halt(&mut NoSyscalls).unwrap_err();
    (vm, err)
}

#[test]
fn mov_then_exit_halts_with_result() {
    let vm = run(&format!("mov r0, 42\n{EXIT}"));
    let regs = vm.registers();

    assert_eq!(regs.get(Register::R0), 42);
    assert_eq!(regs.pc(), 0);
    assert_eq!(regs.sp(), RAM - 8);
    assert_eq!(vm.executed(), 5);
}

#[test]
fn add_wraps_around() {
    let vm = run(&format!("mov r0, 1\nadd r0, 0xffffffff\n{EXIT}"));
    assert_eq!(vm.registers().get(Register::R0), 0);

    let vm = run(&format!("mov r0, 0\nsub r0, 1\n{EXIT}"));
    assert_eq!(vm.registers().get(Register::R0), 0xffff_ffff);
}

#[test]
fn register_and_immediate_forms_agree() {
    let dst = 0x1234_5678u32;
    let src = 0x8f0f_f0f0u32;

    for op in ["mov", "add", "sub", "and", "or", "xor", "cmp"] {
        let setup = format!("mov r0, {dst}\nmov r1, {src}");
        let reg_form = run(&format!("{setup}\n{op} r0, r1\n{EXIT}"));
        let imm_form = run(&format!("{setup}\n{op} r0, {src}\n{EXIT}"));

        for reg in [Register::R0, Register::Flags] {
            assert_eq!(
                reg_form.registers().get(reg),
                imm_form.registers().get(reg),
                "{op} {reg}"
            );
        }
    }
}

#[test]
fn logic_ops() {
    let vm = run(&formatdoc! {"
        mov r0, 0x0f0f0f0f
        not r0
        mov r1, 12
        mov r2, 12
        mov r3, 12
        and r1, 10
        or r2, 10
        xor r3, 10
        {EXIT}
    "});
    let regs = vm.registers();

    assert_eq!(regs.get(Register::R0), 0xf0f0_f0f0);
    assert_eq!(regs.get(Register::R1), 8);
    assert_eq!(regs.get(Register::R2), 14);
    assert_eq!(regs.get(Register::R3), 6);
}

#[test]
fn cmp_is_signed_and_repeatable() {
    let cases = [
        (0u32, 0u32, Flags::Z | Flags::EQ),
        (5, 3, Flags::GT),
        (3, 5, Flags::LT),
        (0xffff_ffff, 1, Flags::LT),
        (1, 0xffff_ffff, Flags::GT),
        (0, 1, Flags::Z | Flags::LT),
    ];

    for (a, b, expected) in cases {
        let mut vm = boot(&format!("mov r0, {a}\nmov r1, {b}\ncmp r0, r1\ncmp r0, r1"));
        for _ in 0..3 {
            step(&mut vm);
        }
        let first = vm.registers().flags();
        step(&mut vm);

        assert_eq!(first.bits(), expected, "cmp {a}, {b}");
        assert_eq!(vm.registers().flags(), first, "cmp {a}, {b} twice");
    }
}

#[test]
fn cmp_replaces_all_flags() {
    let vm = run(&format!("mov flags, 0xff\nmov r0, 2\ncmp r0, 1\n{EXIT}"));
    assert_eq!(vm.registers().get(Register::Flags), Flags::GT);
}

#[test]
fn push_then_pop_restores() {
    let mut vm = boot("mov r3, 77\npush r3\nmov r3, 0\npop r3");

    step(&mut vm);
    step(&mut vm);
    assert_eq!(vm.registers().sp(), RAM - 4);
    assert_eq!(vm.memory().read_u32(RAM - 4).unwrap(), 77);

    step(&mut vm);
    step(&mut vm);
    assert_eq!(vm.registers().get(Register::R3), 77);
    assert_eq!(vm.registers().sp(), RAM);
    assert_eq!(vm.registers().pc(), 5 + 6 + 2 + 6 + 2);
}

#[test]
fn call_then_ret_returns_after_call() {
    let mut vm = boot(indoc! {"
        call f
        mov r0, 1
    f:  ret
    "});

    step(&mut vm);
    assert_eq!(vm.registers().pc(), 16);
    assert_eq!(vm.registers().sp(), RAM - 4);
    assert_eq!(vm.memory().read_u32(RAM - 4).unwrap(), 10);

    step(&mut vm);
    assert_eq!(vm.registers().pc(), 10);
    assert_eq!(vm.registers().sp(), RAM);
}

#[test]
fn conditional_jumps() {
    use JumpCondition::*;

    let cases = [
        (Always, 0, true),
        (Zero, Flags::Z, true),
        (Zero, Flags::EQ, false),
        (NotZero, Flags::GT, true),
        (NotZero, Flags::Z | Flags::EQ, false),
        (Equal, Flags::EQ, true),
        (Equal, Flags::LT, false),
        (NotEqual, Flags::GT, true),
        (NotEqual, Flags::EQ, false),
        (Greater, Flags::GT, true),
        (Greater, Flags::EQ, false),
        (Less, Flags::LT, true),
        (Less, Flags::GT, false),
        (GreaterEqual, Flags::GT, true),
        (GreaterEqual, Flags::EQ, true),
        (GreaterEqual, Flags::LT, false),
        (LessEqual, Flags::LT, true),
        (LessEqual, Flags::EQ, true),
        (LessEqual, Flags::GT, false),
    ];

    for (cond, flags, taken) in cases {
        let mut image = vec![0x1f, 0, 0, 0, 0];
        Instruction::Jump { cond, target: 0x40 }.encode(&mut image);
        let mut vm = boot_image(&image);
        vm.registers_mut().set_flags(Flags::from_bits(flags));

        step(&mut vm);
        let expected = if taken { 0x40 } else { 10 };
        assert_eq!(vm.registers().pc(), expected, "{cond:?} with {flags:#06b}");
    }
}

#[test]
fn loop_counts_down() {
    let vm = run(&formatdoc! {"
            mov r0, 0
            mov r1, 5
        loop:
            add r0, r1
            sub r1, 1
            cmp r1, 0
            jmpgt loop
            {EXIT}
    "});
    assert_eq!(vm.registers().get(Register::R0), 15);
    assert_eq!(vm.registers().get(Register::R1), 0);
}

#[test]
fn store_then_load() {
    let vm = run(&format!(
        "mov r1, 0x100\nmov r2, 0xdeadbeef\nstore [r1], r2\nload r3, [r1]\n{EXIT}"
    ));

    assert_eq!(vm.registers().get(Register::R3), 0xdead_beef);
    assert_eq!(
        vm.memory().slice(0x100, 4).unwrap(),
        [0xef, 0xbe, 0xad, 0xde]
    );
}

#[test]
fn write_to_pc_is_followed_by_fixed_advance() {
    let mut vm = boot("mov r1, 20\nmov pc, r1");
    step(&mut vm);
    step(&mut vm);
    assert_eq!(vm.registers().pc(), 22);
}

#[test]
fn unknown_opcode_stops_before_any_effect() {
    let (vm, err) = run_err("mov r0, 1\n.byte 0\nmov r0, 2");

    assert_eq!(
        err,
        RuntimeError::Decode {
            addr: 11,
            source: DecodeError::UnknownOpcode(0)
        }
    );
    assert_eq!(vm.registers().get(Register::R0), 1);
    assert_eq!(vm.registers().pc(), 11);
}

#[test]
fn immediate_on_register_only_op_is_rejected() {
    let (_, err) = run_err(".byte 0x17\n.byte 0x00");
    assert_eq!(
        err,
        RuntimeError::Decode {
            addr: 5,
            source: DecodeError::ImmediateNotAllowed(regvm_bytecode::Opcode::Push)
        }
    );
}

#[test]
fn truncated_at_end_of_memory() {
    let mut vm = boot("");
    vm.memory_mut().write_u32(RAM - 4, 0x0007_0000).unwrap();
    vm.registers_mut().set_pc(RAM - 2);

    let err = vm.run_to_halt(&mut NoSyscalls).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Decode {
            addr: RAM - 2,
            source: DecodeError::Truncated {
                needed: 6,
                available: 2
            }
        }
    );
}

#[test]
fn memory_access_outside_ram() {
    let (_, err) = run_err("mov r1, 0x3ffffe\nload r0, [r1]");
    assert_eq!(
        err,
        RuntimeError::OutOfBounds {
            addr: RAM - 2,
            size: 4,
            len: RAM as usize
        }
    );

    let (vm, err) = run_err("pop r0");
    assert_eq!(
        err,
        RuntimeError::OutOfBounds {
            addr: RAM,
            size: 4,
            len: RAM as usize
        }
    );
    assert_eq!(vm.registers().sp(), RAM);
}

#[test]
fn fetch_outside_ram() {
    let (_, err) = run_err("jmp 0x400000");
    assert_eq!(
        err,
        RuntimeError::OutOfBounds {
            addr: RAM,
            size: 1,
            len: RAM as usize
        }
    );
}

#[test]
fn trampoline_reached_by_ret() {
    let vm = run("mov r12, 0\npush r12\npush r12\npush r12\nret");
    assert_eq!(vm.registers().pc(), 0);
    assert_eq!(vm.registers().sp(), RAM - 8);
}

#[test]
fn trampoline_reached_by_jumps() {
    let vm = run("mov r12, 0\npush r12\npush r12\njmp 0");
    assert_eq!(vm.registers().pc(), 0);

    let vm = run("mov r12, 0\npush r12\npush r12\ncmp r12, 0\njmpeq 0");
    assert_eq!(vm.registers().pc(), 0);
}

#[test]
fn unknown_syscall_is_fatal() {
    let (_, err) = run_err("mov r0, 9\npush r0\ncall 0");
    assert_eq!(err, RuntimeError::UnhandledSyscall(9));
}

#[test]
fn instruction_budget() {
    let image = assemble_program("loop: jmp loop").unwrap().bytes;
    let mut vm = Interpreter::new(EngineConfig::default().instruction_budget(10));
    vm.init(&mut NoopTracer);
    vm.load(&image, &mut NoopTracer).unwrap();

    let err = vm.run_to_halt(&mut NoSyscalls).unwrap_err();
    assert_eq!(err, RuntimeError::ExecFuelExhausted(10));
    assert_eq!(vm.executed(), 10);
}

#[test]
fn budget_large_enough_to_halt() {
    let image = assemble_program(EXIT).unwrap().bytes;
    let mut vm = Interpreter::new(EngineConfig::default().instruction_budget(4));
    vm.init(&mut NoopTracer);
    vm.load(&image, &mut NoopTracer).unwrap();

    vm.run_to_halt(&mut NoSyscalls).unwrap();
    assert_eq!(vm.executed(), 4);
}
