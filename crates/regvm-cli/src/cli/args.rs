//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands,
//! so `run` and `trace` declare their common flags once.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Program image file (positional).
pub fn image_path_arg() -> Arg {
    Arg::new("image_path")
        .value_name("IMAGE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program image (binary, or hex text when ending in .hex)")
}

/// Assembly source file (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Assembly source file")
}

/// Requested memory size (--ram).
pub fn ram_arg() -> Arg {
    Arg::new("ram")
        .long("ram")
        .value_name("MIB")
        .default_value("4")
        .value_parser(value_parser!(u32))
        .help("Memory size in MiB (rounded up to a power of two, 4..=2048)")
}

/// Execution engine (--engine).
pub fn engine_arg() -> Arg {
    Arg::new("engine")
        .long("engine")
        .value_name("KIND")
        .default_value("interpreter")
        .help("Execution engine")
}

/// Instruction budget (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Stop after N instructions (default: unlimited)")
}

/// Print the execution trace (--debug).
pub fn debug_arg() -> Arg {
    Arg::new("debug")
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Print the execution trace")
}

/// Treat images as hex text (--hex).
pub fn hex_arg() -> Arg {
    Arg::new("hex")
        .long("hex")
        .action(ArgAction::SetTrue)
        .help("Read the image as hex text regardless of extension")
}

/// Write hex text instead of binary (--hex), for `asm`.
pub fn hex_output_arg() -> Arg {
    Arg::new("hex")
        .long("hex")
        .action(ArgAction::SetTrue)
        .help("Write the image as hex text")
}

/// Print final registers as JSON (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print final registers as JSON")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for changed registers, -vv to include PC)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write the image to file (default: SOURCE with .bin or .hex)")
}

/// Label table file (--labels).
pub fn labels_arg() -> Arg {
    Arg::new("labels")
        .long("labels")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Label table file")
}
