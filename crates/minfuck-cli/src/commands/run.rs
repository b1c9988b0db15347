//! Execute a program against the standard streams.

use std::path::PathBuf;

use minfuck_vm::{EofPolicy, FuelLimits, Port, StdPort, VM};

use super::program_loader::load_program;

pub struct RunArgs {
    pub program_path: Option<PathBuf>,
    pub eof: EofPolicy,
    pub fuel: Option<u64>,
    pub max_tape: Option<u64>,
}

pub fn run(args: RunArgs) -> i32 {
    run_with_port(args, StdPort::stdio())
}

/// Load and execute, returning the process exit code.
pub fn run_with_port<P: Port>(args: RunArgs, port: P) -> i32 {
    let module = match load_program(args.program_path.as_deref()) {
        Ok(module) => module,
        Err(e) => {
            e.report();
            return 1;
        }
    };

    let result = VM::builder(&module, port)
        .eof_policy(args.eof)
        .limits(fuel_limits(args.fuel, args.max_tape))
        .build()
        .and_then(|vm| vm.execute());

    match result {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("runtime error: {}", e);
            2
        }
    }
}

pub fn fuel_limits(fuel: Option<u64>, max_tape: Option<u64>) -> FuelLimits {
    let mut limits = FuelLimits::new();
    if let Some(n) = fuel {
        limits = limits.exec_fuel(n);
    }
    if let Some(cells) = max_tape {
        limits = limits.tape_limit(cells);
    }
    limits
}
