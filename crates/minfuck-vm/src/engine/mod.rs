//! Runtime engine for executing MinFuck programs.
//!
//! The VM decodes one instruction per step at the program counter, applies it
//! to the tape and halts once the counter runs off the end of the program.

mod boundaries;
mod error;
mod port;
mod tape;
mod trace;
mod vm;

#[cfg(test)]
mod engine_tests;

pub use error::RuntimeError;
pub use port::{Port, StdPort, StreamPort};
pub use tape::{Tape, TapeError};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use vm::{DEFAULT_TAPE_LIMIT, EofPolicy, FuelLimits, Halted, VM, VMBuilder, VmState};
