//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! This allows the same arg definition to be reused across commands with
//! different visibility settings (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Bytecode program file (positional).
pub fn program_path_arg() -> Arg {
    Arg::new("program_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Bytecode program (MF or BF)")
}

/// End-of-input behavior (--eof).
pub fn eof_arg() -> Arg {
    Arg::new("eof")
        .long("eof")
        .value_name("POLICY")
        .default_value("fault")
        .value_parser(["fault", "zero", "unchanged"])
        .help("What reading past end of input does")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u64))
        .help("Stop after N instructions (default: unlimited)")
}

/// Tape size cap (--max-tape).
pub fn max_tape_arg() -> Arg {
    Arg::new("max_tape")
        .long("max-tape")
        .value_name("CELLS")
        .value_parser(value_parser!(u64))
        .help("Refuse programs whose tape exceeds CELLS (default: 2^30)")
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

/// Verbosity level (-v).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v also shows the cell after each step)")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Write output to file")
}
