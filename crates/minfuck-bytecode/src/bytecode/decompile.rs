//! Bytecode to Brainfuck text.
//!
//! Run-length instructions are expanded, jump pairs become brackets and
//! no-ops vanish. Only programs whose jumps form properly nested loops can be
//! expressed as Brainfuck; anything else is rejected rather than rendered
//! with different semantics.
//!
//! A single `fwd` may expand to four billion characters, so text is streamed
//! to a writer in fixed-size chunks. The loop structure is checked in a first
//! pass, and nothing is written for a program that fails it.

use std::io::{self, Write};

use super::control::Control;
use super::instructions::{DecodeError, Extended, ExtendedOpcode, Instruction};
use super::module::Module;

/// Largest slice handed to the writer at once.
const CHUNK: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum DecompileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("unbalanced jump at {offset:#06x}")]
    Unbalanced { offset: usize },
    #[error("jumps at {open:#06x} and {close:#06x} do not form a loop")]
    IrregularJump { open: usize, close: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An open `jz` waiting for its `jnz`.
struct OpenLoop {
    offset: usize,
    /// First offset after the `jz` instruction.
    end: usize,
    target: u32,
}

/// Render the module's instruction stream as Brainfuck source.
pub fn decompile(module: &Module) -> Result<String, DecompileError> {
    let mut out = Vec::with_capacity(module.code().len() * 2);
    decompile_to(module, &mut out)?;
    // Only ASCII bracket and operator characters are ever written.
    Ok(out.into_iter().map(char::from).collect())
}

/// Stream the module's Brainfuck source to `out`.
///
/// Decode and loop errors are found before the first byte is written.
pub fn decompile_to<W: Write>(module: &Module, out: &mut W) -> Result<(), DecompileError> {
    check_loops(module)?;

    for (_, decoded) in module.instructions() {
        match decoded? {
            Instruction::PlainPair(a, b) => {
                write_control(out, a)?;
                write_control(out, b)?;
            }
            Instruction::PlainThenExtended(control, ext) => {
                write_control(out, control)?;
                write_extended(out, ext)?;
            }
            Instruction::Extended(ext) => write_extended(out, ext)?,
        }
    }
    Ok(())
}

/// Check that every `jz` pairs with a `jnz` into a nested loop.
pub fn check_loops(module: &Module) -> Result<(), DecompileError> {
    let mut loops: Vec<OpenLoop> = Vec::new();

    for (offset, decoded) in module.instructions() {
        let instr = decoded?;
        let Some(ext) = instr.extended().filter(|ext| ext.opcode.is_jump()) else {
            continue;
        };
        let end = offset + instr.size();

        if ext.opcode == ExtendedOpcode::JumpIfZero {
            loops.push(OpenLoop {
                offset,
                end,
                target: ext.operand,
            });
            continue;
        }

        let open = loops
            .pop()
            .ok_or(DecompileError::Unbalanced { offset })?;
        // The jz must exit just past this jnz, and the jnz must re-enter the body.
        if open.target as usize != end || ext.operand as usize != open.end {
            return Err(DecompileError::IrregularJump {
                open: open.offset,
                close: offset,
            });
        }
    }

    match loops.last() {
        Some(open) => Err(DecompileError::Unbalanced {
            offset: open.offset,
        }),
        None => Ok(()),
    }
}

fn write_control<W: Write>(out: &mut W, control: Control) -> io::Result<()> {
    match control.brainfuck() {
        Some(c) => out.write_all(&[c as u8]),
        None => Ok(()),
    }
}

fn write_extended<W: Write>(out: &mut W, ext: Extended) -> io::Result<()> {
    match ext.opcode {
        ExtendedOpcode::Add => write_run(out, b'+', ext.low_byte().into()),
        ExtendedOpcode::Sub => write_run(out, b'-', ext.low_byte().into()),
        ExtendedOpcode::Forward => write_run(out, b'>', ext.operand.into()),
        ExtendedOpcode::Back => write_run(out, b'<', ext.operand.into()),
        ExtendedOpcode::JumpIfZero => out.write_all(b"["),
        ExtendedOpcode::JumpIfNonZero => out.write_all(b"]"),
        ExtendedOpcode::Align | ExtendedOpcode::Reserved => Ok(()),
    }
}

/// Write `count` copies of `byte`.
fn write_run<W: Write>(out: &mut W, byte: u8, count: u64) -> io::Result<()> {
    let chunk = [byte; CHUNK];
    let mut left = count;
    while left > 0 {
        let n = left.min(CHUNK as u64) as usize;
        out.write_all(&chunk[..n])?;
        left -= n as u64;
    }
    Ok(())
}
