//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors that pull relevant fields (ignoring hidden ones)
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use minfuck_vm::{EofPolicy, Verbosity};

use super::ColorChoice;
use crate::commands::decompile::DecompileArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::run::RunArgs;
use crate::commands::trace::TraceArgs;

pub struct RunParams {
    pub program_path: Option<PathBuf>,
    pub eof: EofPolicy,
    pub fuel: Option<u64>,
    pub max_tape: Option<u64>,
    // Note: color, verbose, output are parsed but not extracted (unified flags)
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: m.get_one::<PathBuf>("program_path").cloned(),
            eof: parse_eof(m),
            fuel: m.get_one::<u64>("fuel").copied(),
            max_tape: m.get_one::<u64>("max_tape").copied(),
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            program_path: p.program_path,
            eof: p.eof,
            fuel: p.fuel,
            max_tape: p.max_tape,
        }
    }
}

pub struct DumpParams {
    pub program_path: Option<PathBuf>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: m.get_one::<PathBuf>("program_path").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            program_path: p.program_path,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub program_path: Option<PathBuf>,
    pub eof: EofPolicy,
    pub fuel: Option<u64>,
    pub max_tape: Option<u64>,
    pub verbose: u8,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: m.get_one::<PathBuf>("program_path").cloned(),
            eof: parse_eof(m),
            fuel: m.get_one::<u64>("fuel").copied(),
            max_tape: m.get_one::<u64>("max_tape").copied(),
            verbose: m.get_count("verbose"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            _ => Verbosity::Verbose,
        };

        Self {
            program_path: p.program_path,
            eof: p.eof,
            fuel: p.fuel,
            max_tape: p.max_tape,
            verbosity,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DecompileParams {
    pub program_path: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl DecompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: m.get_one::<PathBuf>("program_path").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
        }
    }
}

impl From<DecompileParams> for DecompileArgs {
    fn from(p: DecompileParams) -> Self {
        Self {
            program_path: p.program_path,
            output: p.output,
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

/// Parse --eof flag into EofPolicy. Clap restricts the values.
fn parse_eof(m: &ArgMatches) -> EofPolicy {
    m.get_one::<String>("eof")
        .and_then(|s| EofPolicy::from_name(s))
        .unwrap_or_default()
}
