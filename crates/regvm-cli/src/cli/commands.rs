//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.
//! `trace` accepts every `run` flag so switching between them only means
//! changing the subcommand name.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("regvm")
        .about("Register VM with assembler, disassembler and tracer")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(run_command())
        .subcommand(trace_command())
        .subcommand(asm_command())
        .subcommand(dump_command())
}

/// Add the flags shared by `run` and `trace`.
fn with_exec_args(cmd: Command) -> Command {
    cmd.arg(image_path_arg())
        .arg(ram_arg())
        .arg(engine_arg())
        .arg(fuel_arg())
        .arg(hex_arg())
        .arg(json_arg())
}

/// Run a program image until it exits.
pub fn run_command() -> Command {
    with_exec_args(Command::new("run"))
        .about("Run a program image")
        .override_usage("regvm run <IMAGE> [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  regvm run prog.bin
  regvm run prog.hex --ram 16
  regvm run prog.bin --fuel 100000 --json
  regvm run prog.bin --debug"#,
        )
        .arg(debug_arg())
        .arg(verbose_arg().hide(true))
        .arg(color_arg().hide(true))
}

/// Run a program image with the execution trace.
pub fn trace_command() -> Command {
    with_exec_args(Command::new("trace"))
        .about("Trace execution of a program image")
        .override_usage("regvm trace <IMAGE> [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  regvm trace prog.bin
  regvm trace prog.bin -v
  regvm trace prog.hex -vv --fuel 50"#,
        )
        .arg(debug_arg().hide(true))
        .arg(verbose_arg())
        .arg(color_arg())
}

/// Assemble a source file into an image.
pub fn asm_command() -> Command {
    Command::new("asm")
        .about("Assemble source into a program image")
        .override_usage("regvm asm <SOURCE> [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  regvm asm prog.s
  regvm asm prog.s -o prog.hex --hex
  regvm asm prog.s --labels prog.labels"#,
        )
        .arg(source_path_arg())
        .arg(output_file_arg())
        .arg(hex_output_arg())
        .arg(labels_arg().help("Write the label table to file"))
}

/// Disassemble an image.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Disassemble a program image")
        .override_usage("regvm dump <IMAGE> [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  regvm dump prog.bin
  regvm dump prog.hex --labels prog.labels
  regvm dump prog.bin --color never"#,
        )
        .arg(image_path_arg())
        .arg(hex_arg())
        .arg(labels_arg().help("Name branch targets from a label table"))
        .arg(color_arg())
}
