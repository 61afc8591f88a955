//! Run a program image to completion.

use regvm_vm::{PrintTracer, run_with};

use super::host::HostSyscalls;
use super::run_common::{self, ExecInput};

pub struct RunArgs {
    pub input: ExecInput,
    pub debug: bool,
}

pub fn run(args: RunArgs) {
    let prepared = run_common::prepare(&args.input);
    let mut host = HostSyscalls::stdout();

    if !args.debug {
        let result = run_with(&prepared.image, prepared.options(&mut host));
        run_common::finish(result, &mut host, args.input.json, false);
        return;
    }

    let mut tracer = PrintTracer::builder().build_with(std::io::stdout());
    let result = run_with(
        &prepared.image,
        prepared.options(&mut host).tracer(&mut tracer),
    );
    run_common::finish_trace(tracer);
    run_common::finish(result, &mut host, args.input.json, true);
}
