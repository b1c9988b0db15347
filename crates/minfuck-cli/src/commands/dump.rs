use std::path::PathBuf;

use minfuck_bytecode::dump;
use minfuck_core::Colors;

use super::program_loader::load_program;

pub struct DumpArgs {
    pub program_path: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) -> i32 {
    let module = match load_program(args.program_path.as_deref()) {
        Ok(module) => module,
        Err(e) => {
            e.report();
            return 1;
        }
    };

    let colors = Colors::new(args.color);
    print!("{}", dump(&module, colors));
    0
}
