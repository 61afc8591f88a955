//! Fixed layout constants of the instruction set and program image.

/// Size of a register-form instruction (opcode byte + operand byte).
pub const REG_FORM_SIZE: usize = 2;

/// Size of an immediate-form data instruction (opcode + operand + 4-byte immediate).
pub const IMM_FORM_SIZE: usize = 6;

/// Size of CALL and every JMP variant (opcode + 4-byte address).
pub const BRANCH_SIZE: usize = 5;

/// Size of RET (opcode byte only).
pub const RET_SIZE: usize = 1;

/// Address whose fetch is intercepted as a syscall entry.
pub const SYSCALL_ENTRY: u32 = 0;

/// Size of the reserved slot at the syscall entry address.
pub const TRAMPOLINE_SIZE: usize = 5;

/// Address where guest code starts executing.
pub const ENTRY_POINT: u32 = TRAMPOLINE_SIZE as u32;

/// Reserved syscall identifier that halts the machine.
pub const SYSCALL_VM_EXIT: u32 = 0;
