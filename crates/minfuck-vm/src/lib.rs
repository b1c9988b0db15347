//! Runtime VM for executing MinFuck bytecode.
//!
//! This crate provides the tape machine that runs a loaded
//! [`Module`](minfuck_bytecode::Module) against an injected byte [`Port`].

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    DEFAULT_TAPE_LIMIT, EofPolicy, FuelLimits, Halted, NoopTracer, Port, PrintTracer,
    RuntimeError, StdPort, StreamPort, Tape, TapeError, Tracer, VM, VMBuilder, Verbosity,
    VmState,
};
