//! Tracing infrastructure for debugging VM execution.
//!
//! The tracer is a zero-cost abstraction: with `NoopTracer` every trait method
//! is an `#[inline(always)]` empty function and the calls compile away.
//! Tracing-only state lives in the tracer, never in the VM.

use std::io::{self, Write};

use minfuck_bytecode::format::{byte_repr, instruction_line, raw_column, sub_line};
use minfuck_bytecode::{Instruction, Module};
use minfuck_core::Colors;

use super::error::RuntimeError;
use super::tape::Tape;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Default: instructions, jump decisions, I/O bytes.
    #[default]
    Default,
    /// Verbose (-v): also the cursor and cell after every step.
    Verbose,
}

/// Tracer trait for VM execution instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_instruction` - after decoding, before executing
/// - `trace_jump` - after a conditional jump tested its cell
/// - `trace_output` / `trace_input` - after a byte crossed the port
/// - `trace_tape` - after an instruction completed
/// - `trace_fault` / `trace_halt` - once, when the run ends
pub trait Tracer {
    fn trace_instruction(&mut self, pc: usize, instr: &Instruction);

    fn trace_jump(&mut self, target: u32, taken: bool);

    fn trace_output(&mut self, byte: u8);

    /// `None` at end of input.
    fn trace_input(&mut self, byte: Option<u8>);

    fn trace_tape(&mut self, tape: &Tape);

    fn trace_fault(&mut self, error: &RuntimeError);

    fn trace_halt(&mut self, pc: usize, steps: u64);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_instruction(&mut self, _pc: usize, _instr: &Instruction) {}

    #[inline(always)]
    fn trace_jump(&mut self, _target: u32, _taken: bool) {}

    #[inline(always)]
    fn trace_output(&mut self, _byte: u8) {}

    #[inline(always)]
    fn trace_input(&mut self, _byte: Option<u8>) {}

    #[inline(always)]
    fn trace_tape(&mut self, _tape: &Tape) {}

    #[inline(always)]
    fn trace_fault(&mut self, _error: &RuntimeError) {}

    #[inline(always)]
    fn trace_halt(&mut self, _pc: usize, _steps: u64) {}
}

/// Tracer that writes an execution trace line by line.
///
/// Lines use the dump layout, so a trace can be read against `minfuck dump`.
/// Each line reaches the sink as soon as it is produced. The first write
/// failure stops further output and is returned by [`finish`](Self::finish).
pub struct PrintTracer<'m, W> {
    /// Program bytes, for the raw column.
    module: &'m Module,
    verbosity: Verbosity,
    out: W,
    colors: Colors,
    wrote: bool,
    error: Option<io::Error>,
}

impl<'m, W: Write> PrintTracer<'m, W> {
    pub fn new(module: &'m Module, verbosity: Verbosity, colors: Colors, out: W) -> Self {
        Self {
            module,
            verbosity,
            out,
            colors,
            wrote: false,
            error: None,
        }
    }

    /// Give back the sink, or the first write failure.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn line(&mut self, mut text: String) {
        if self.error.is_some() {
            return;
        }
        text.push('\n');
        match self.out.write_all(text.as_bytes()) {
            Ok(()) => self.wrote = true,
            Err(e) => self.error = Some(e),
        }
    }

    fn add_subline(&mut self, color: &str, text: &str) {
        let line = sub_line(&self.colors.paint(color, text));
        self.line(line);
    }
}

impl<W: Write> Tracer for PrintTracer<'_, W> {
    fn trace_instruction(&mut self, pc: usize, instr: &Instruction) {
        let c = self.colors;
        let end = (pc + instr.size()).min(self.module.size());
        let raw = raw_column(&self.module.bytes()[pc..end]);
        let line = instruction_line(pc, &raw, &instr.to_string(), c.blue, c);
        self.line(line);
    }

    fn trace_jump(&mut self, target: u32, taken: bool) {
        let c = self.colors;
        if taken {
            self.add_subline(c.green, &format!("jump {target:04x}"));
        } else {
            self.add_subline(c.dim, "fall through");
        }
    }

    fn trace_output(&mut self, byte: u8) {
        let c = self.colors;
        self.add_subline(c.green, &format!("out {}", byte_repr(byte)));
    }

    fn trace_input(&mut self, byte: Option<u8>) {
        let c = self.colors;
        let text = match byte {
            Some(b) => format!("in  {}", byte_repr(b)),
            None => "in  EOF".to_string(),
        };
        self.add_subline(c.green, &text);
    }

    fn trace_tape(&mut self, tape: &Tape) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        let text = match tape.get() {
            Ok(value) => format!("cell[{}] = {value:02x}", tape.position()),
            Err(_) => format!("cell[{}] off tape", tape.position()),
        };
        self.add_subline(c.dim, &text);
    }

    fn trace_fault(&mut self, error: &RuntimeError) {
        let c = self.colors;
        self.add_subline(c.red, &format!("fault: {error}"));
    }

    fn trace_halt(&mut self, pc: usize, steps: u64) {
        if self.wrote {
            self.line(String::new());
        }
        let c = self.colors;
        let text = format!("halted at {pc:04x} after {steps} steps");
        self.line(c.paint(c.blue, &text));
    }
}
