//! Convert a program to Brainfuck source.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use minfuck_bytecode::{DecompileError, Module, check_loops, decompile_to};

use super::program_loader::load_program;

pub struct DecompileArgs {
    pub program_path: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn run(args: DecompileArgs) -> i32 {
    let module = match load_program(args.program_path.as_deref()) {
        Ok(module) => module,
        Err(e) => {
            e.report();
            return 1;
        }
    };

    let result = match &args.output {
        Some(path) => write_file(&module, path),
        None => write_stdout(&module),
    };

    match result {
        Ok(()) => 0,
        Err(DecompileError::Io(e)) => {
            let target = match &args.output {
                Some(path) => format!("'{}'", path.display()),
                None => "stdout".to_string(),
            };
            eprintln!("error: failed to write {target}: {e}");
            1
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}

/// The file is created only once the program is known to decompile.
fn write_file(module: &Module, path: &Path) -> Result<(), DecompileError> {
    check_loops(module)?;
    let mut out = BufWriter::new(File::create(path)?);
    decompile_to(module, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_stdout(module: &Module) -> Result<(), DecompileError> {
    let mut out = BufWriter::new(io::stdout().lock());
    decompile_to(module, &mut out)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
