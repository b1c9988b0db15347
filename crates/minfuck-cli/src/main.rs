mod cli;
mod commands;

use std::io;
use std::process;

use tracing_subscriber::{EnvFilter, fmt};

use cli::{DecompileParams, DumpParams, RunParams, TraceParams, build_cli};

fn main() {
    init_logging();

    let matches = build_cli().get_matches();

    let code = match matches.subcommand() {
        Some(("run", m)) => {
            let params = RunParams::from_matches(m);
            commands::run::run(params.into())
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into())
        }
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into())
        }
        Some(("decompile", m)) => {
            let params = DecompileParams::from_matches(m);
            commands::decompile::run(params.into())
        }
        // `minfuck FILE` runs the program directly.
        _ => {
            let params = RunParams::from_matches(&matches);
            commands::run::run(params.into())
        }
    };

    process::exit(code);
}

/// Install the diagnostics subscriber. `RUST_LOG` overrides the default
/// filter; events go to stderr so stdout carries only program output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
