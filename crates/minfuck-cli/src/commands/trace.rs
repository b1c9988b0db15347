//! Trace program execution for debugging.

use std::io;
use std::path::PathBuf;

use minfuck_core::Colors;
use minfuck_vm::{EofPolicy, PrintTracer, StdPort, VM, Verbosity};

use super::program_loader::load_program;
use super::run::fuel_limits;

pub struct TraceArgs {
    pub program_path: Option<PathBuf>,
    pub eof: EofPolicy,
    pub fuel: Option<u64>,
    pub max_tape: Option<u64>,
    pub verbosity: Verbosity,
    pub color: bool,
}

pub fn run(args: TraceArgs) -> i32 {
    let module = match load_program(args.program_path.as_deref()) {
        Ok(module) => module,
        Err(e) => {
            e.report();
            return 1;
        }
    };

    let colors = Colors::new(args.color);
    // Program output goes to stdout, the trace to stderr.
    let mut tracer = PrintTracer::new(&module, args.verbosity, colors, io::stderr());

    let result = VM::builder(&module, StdPort::stdio())
        .eof_policy(args.eof)
        .limits(fuel_limits(args.fuel, args.max_tape))
        .build()
        .and_then(|vm| vm.execute_with(&mut tracer));

    // A failing stderr leaves nowhere to report the failure.
    let _ = tracer.finish();
    match result {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("runtime error: {}", e);
            2
        }
    }
}
