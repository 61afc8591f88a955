//! Shared setup and reporting for `run` and `trace`.

use std::io::Stdout;
use std::path::PathBuf;

use regvm_vm::{EngineKind, PrintTracer, RegisterState, RunOptions, VmError};

use super::host::HostSyscalls;
use super::image::load_image;

/// Inputs shared by `run` and `trace`.
pub struct ExecInput {
    pub image_path: PathBuf,
    pub hex: bool,
    pub ram_mib: u32,
    pub engine: String,
    pub fuel: Option<u64>,
    pub json: bool,
}

/// Image and engine settings ready to execute.
pub struct PreparedRun {
    pub image: Vec<u8>,
    pub engine: EngineKind,
    pub ram_mib: u32,
    pub fuel: Option<u64>,
}

impl PreparedRun {
    /// Options carrying everything except the tracer.
    pub fn options<'a>(&self, host: &'a mut HostSyscalls<Stdout>) -> RunOptions<'a> {
        let options = RunOptions::new()
            .ram_mib(self.ram_mib)
            .engine(self.engine)
            .syscalls(host);
        match self.fuel {
            Some(budget) => options.instruction_budget(budget),
            None => options,
        }
    }
}

/// Load the image and parse the engine name, exiting with status 1 on failure.
pub fn prepare(input: &ExecInput) -> PreparedRun {
    let engine = match input.engine.parse::<EngineKind>() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let image = match load_image(&input.image_path, input.hex) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    PreparedRun {
        image,
        engine,
        ram_mib: input.ram_mib,
        fuel: input.fuel,
    }
}

/// Flush a streamed trace, reporting a failed write on stderr.
pub fn finish_trace(tracer: PrintTracer<Stdout>) {
    if let Err(e) = tracer.finish() {
        eprintln!("error: cannot write trace: {}", e);
    }
}

/// Exit status for an execution result: 0 on halt, 1 on configuration
/// errors, 2 on runtime errors.
pub fn exit_code(result: &Result<RegisterState, VmError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(VmError::Config(_)) => 1,
        Err(VmError::Runtime(_)) => 2,
    }
}

/// Print the error (if any) and the final registers, then exit on failure.
///
/// `dumped` means a tracer already printed the register dump.
pub fn finish(
    result: Result<RegisterState, VmError>,
    host: &mut HostSyscalls<Stdout>,
    json: bool,
    dumped: bool,
) {
    if let Err(e) = host.flush() {
        eprintln!("error: cannot flush guest output: {}", e);
    }

    let code = exit_code(&result);
    match result {
        Ok(state) => print_state(&state, json, dumped),
        Err(VmError::Runtime(e)) => {
            eprintln!("runtime error: {}", e);
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(code);
        }
    }
}

fn print_state(state: &RegisterState, json: bool, dumped: bool) {
    if json {
        match serde_json::to_string_pretty(state) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    } else if !dumped {
        print!("{}", state);
    }
}
