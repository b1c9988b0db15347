//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! Unified flags: every subcommand accepts every runtime and display flag,
//! with the ones it ignores hidden from `--help`, so switching `run` for
//! `trace` or `dump` never requires editing the rest of the command line.

use clap::Command;

use super::args::*;

/// Add hidden execution args (for commands that don't run the program).
fn with_hidden_exec_args(cmd: Command) -> Command {
    cmd.arg(eof_arg().hide(true))
        .arg(fuel_arg().hide(true))
        .arg(max_tape_arg().hide(true))
}

/// Add hidden display args (for commands that print no listing).
fn with_hidden_display_args(cmd: Command) -> Command {
    cmd.arg(color_arg().hide(true))
        .arg(verbose_arg().hide(true))
}

/// Add hidden output file arg (for commands that only print).
fn with_hidden_output_args(cmd: Command) -> Command {
    cmd.arg(output_file_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
///
/// Without a subcommand, the top-level positional runs the program, so
/// `minfuck prog.mf` keeps working.
pub fn build_cli() -> Command {
    Command::new("minfuck")
        .about("Virtual machine for MinFuck and Brainfuck bytecode")
        .override_usage(
            "\
  minfuck <FILE>
  minfuck <COMMAND> <FILE> [OPTIONS]",
        )
        .args_conflicts_with_subcommands(true)
        .arg(program_path_arg())
        .arg(eof_arg())
        .arg(fuel_arg())
        .arg(max_tape_arg())
        .subcommand(run_command())
        .subcommand(dump_command())
        .subcommand(trace_command())
        .subcommand(decompile_command())
}

/// Execute a program.
pub fn run_command() -> Command {
    let cmd = Command::new("run")
        .about("Execute a program")
        .after_help(
            r#"EXAMPLES:
  minfuck run hello.mf                # stdin -> program -> stdout
  minfuck run cat.bf --eof zero       # read 0 at end of input
  minfuck run loop.mf --fuel 100000   # stop runaway programs"#,
        )
        .arg(program_path_arg())
        .arg(eof_arg())
        .arg(fuel_arg())
        .arg(max_tape_arg());

    // Hidden unified flags
    with_hidden_output_args(with_hidden_display_args(cmd))
}

/// Disassemble a program.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show header and instructions")
        .after_help(
            r#"EXAMPLES:
  minfuck dump hello.mf
  minfuck dump hello.mf --color never"#,
        )
        .arg(program_path_arg())
        .arg(color_arg());

    // Hidden unified flags
    let cmd = cmd.arg(verbose_arg().hide(true));
    with_hidden_output_args(with_hidden_exec_args(cmd))
}

/// Execute a program, listing every step on stderr.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Execute a program and trace every instruction")
        .after_help(
            r#"EXAMPLES:
  minfuck trace hello.mf              # trace to stderr, output to stdout
  minfuck trace hello.mf -v           # include the cell after each step
  minfuck trace loop.mf --fuel 200    # trace the first 200 steps"#,
        )
        .arg(program_path_arg())
        .arg(eof_arg())
        .arg(fuel_arg())
        .arg(max_tape_arg())
        .arg(verbose_arg())
        .arg(color_arg());

    // Hidden unified flags
    with_hidden_output_args(cmd)
}

/// Convert a program back to Brainfuck text.
pub fn decompile_command() -> Command {
    let cmd = Command::new("decompile")
        .about("Convert a program to Brainfuck source")
        .after_help(
            r#"EXAMPLES:
  minfuck decompile hello.mf          # print to stdout
  minfuck decompile hello.mf -o hello.b"#,
        )
        .arg(program_path_arg())
        .arg(output_file_arg());

    // Hidden unified flags
    with_hidden_display_args(with_hidden_exec_args(cmd))
}
