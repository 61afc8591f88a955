//! Trace execution of a program image.

use regvm_vm::{PrintTracer, Verbosity, run_with};

use super::host::HostSyscalls;
use super::run_common::{self, ExecInput};

pub struct TraceArgs {
    pub input: ExecInput,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let prepared = run_common::prepare(&args.input);
    let mut host = HostSyscalls::stdout();
    let mut tracer = PrintTracer::builder()
        .verbosity(args.verbosity)
        .colored(args.color)
        .build_with(std::io::stdout());

    let result = run_with(
        &prepared.image,
        prepared.options(&mut host).tracer(&mut tracer),
    );
    run_common::finish_trace(tracer);
    run_common::finish(result, &mut host, args.input.json, true);
}
