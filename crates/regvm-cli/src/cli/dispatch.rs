//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors that pull the fields each command uses
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use regvm_vm::Verbosity;

use super::ColorChoice;
use crate::commands::asm::AsmArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::run::RunArgs;
use crate::commands::run_common::ExecInput;
use crate::commands::trace::TraceArgs;

/// Flags shared by `run` and `trace`.
#[derive(Debug, PartialEq, Eq)]
pub struct ExecParams {
    pub image_path: PathBuf,
    pub hex: bool,
    pub ram: u32,
    pub engine: String,
    pub fuel: Option<u64>,
    pub json: bool,
}

impl ExecParams {
    fn from_matches(m: &ArgMatches) -> Self {
        Self {
            image_path: m
                .get_one::<PathBuf>("image_path")
                .cloned()
                .unwrap_or_default(),
            hex: m.get_flag("hex"),
            ram: m.get_one::<u32>("ram").copied().unwrap_or(4),
            engine: m
                .get_one::<String>("engine")
                .cloned()
                .unwrap_or_else(|| "interpreter".to_string()),
            fuel: m.get_one::<u64>("fuel").copied(),
            json: m.get_flag("json"),
        }
    }
}

impl From<ExecParams> for ExecInput {
    fn from(p: ExecParams) -> Self {
        Self {
            image_path: p.image_path,
            hex: p.hex,
            ram_mib: p.ram,
            engine: p.engine,
            fuel: p.fuel,
            json: p.json,
        }
    }
}

pub struct RunParams {
    pub exec: ExecParams,
    pub debug: bool,
    // Note: verbose and color are parsed but not extracted (shared with trace)
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            exec: ExecParams::from_matches(m),
            debug: m.get_flag("debug"),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            input: p.exec.into(),
            debug: p.debug,
        }
    }
}

pub struct TraceParams {
    pub exec: ExecParams,
    pub verbose: u8,
    pub color: ColorChoice,
    // Note: debug is parsed but not extracted; trace always traces
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            exec: ExecParams::from_matches(m),
            verbose: m.get_count("verbose"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            input: p.exec.into(),
            verbosity,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AsmParams {
    pub source_path: PathBuf,
    pub output: Option<PathBuf>,
    pub hex: bool,
    pub labels: Option<PathBuf>,
}

impl AsmParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: m
                .get_one::<PathBuf>("source_path")
                .cloned()
                .unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned(),
            hex: m.get_flag("hex"),
            labels: m.get_one::<PathBuf>("labels").cloned(),
        }
    }
}

impl From<AsmParams> for AsmArgs {
    fn from(p: AsmParams) -> Self {
        Self {
            source_path: p.source_path,
            output: p.output,
            hex: p.hex,
            labels: p.labels,
        }
    }
}

pub struct DumpParams {
    pub image_path: PathBuf,
    pub hex: bool,
    pub labels: Option<PathBuf>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            image_path: m
                .get_one::<PathBuf>("image_path")
                .cloned()
                .unwrap_or_default(),
            hex: m.get_flag("hex"),
            labels: m.get_one::<PathBuf>("labels").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            image_path: p.image_path,
            hex: p.hex,
            labels: p.labels,
            color: p.color.should_colorize(),
        }
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
