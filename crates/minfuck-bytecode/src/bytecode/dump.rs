//! Human-readable listing of a loaded program.

use std::fmt::Write as _;

use minfuck_core::Colors;

use super::format::{instruction_line, raw_column};
use super::instructions::DecodeError;
use super::module::Module;

/// Generate a disassembly of the module: header fields, then one line per
/// instruction in linear order from the code start.
pub fn dump(module: &Module, colors: Colors) -> String {
    let mut out = String::new();
    dump_header(&mut out, module, colors);
    out.push('\n');
    dump_code(&mut out, module, colors);
    out
}

fn dump_header(out: &mut String, module: &Module, c: Colors) {
    let header = module.header();
    writeln!(out, "{}[header]{}", c.blue, c.reset).unwrap();
    writeln!(out, "variant = {}", header.variant.name()).unwrap();
    writeln!(out, "memsize = {}", header.memsize).unwrap();
    writeln!(out, "tape    = {}", header.tape_len()).unwrap();
}

fn dump_code(out: &mut String, module: &Module, c: Colors) {
    let bytes = module.bytes();
    writeln!(out, "{}[code]{}", c.blue, c.reset).unwrap();

    for (offset, decoded) in module.instructions() {
        let line = match decoded {
            Ok(instr) => {
                let raw = raw_column(&bytes[offset..offset + instr.size()]);
                instruction_line(offset, &raw, &instr.to_string(), c.blue, c)
            }
            Err(err) => {
                let raw = raw_column(&bytes[offset..]);
                instruction_line(offset, &raw, &decode_error_text(err), c.red, c)
            }
        };
        writeln!(out, "{line}").unwrap();
    }
}

fn decode_error_text(err: DecodeError) -> String {
    match err {
        DecodeError::Truncated {
            needed, available, ..
        } => format!("truncated ({available} of {needed} bytes)"),
        other => other.to_string(),
    }
}
