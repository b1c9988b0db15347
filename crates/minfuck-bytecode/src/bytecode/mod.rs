//! MinFuck binary format.
//!
//! ```text
//! | offset | size | field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 4    | magic: FF 6D 66 FD (MF) / FF 6D 68 FD (BF) |
//! | 4      | 4    | memsize, u32 big-endian                 |
//! | 8      | rest | instruction stream                      |
//! ```

mod builder;
mod constants;
mod control;
mod decompile;
mod dump;
pub mod format;
mod header;
mod instructions;
mod module;

#[cfg(test)]
mod instructions_tests;
#[cfg(test)]
mod module_tests;

pub use builder::ProgramBuilder;
pub use constants::{BF_MAGIC, CODE_START, EXTENDED_SIZE, HEADER_SIZE, MF_MAGIC, OPERAND_SIZE};
pub use control::Control;
pub use decompile::{DecompileError, check_loops, decompile, decompile_to};
pub use dump::dump;
pub use header::{Header, Variant};
pub use instructions::{DecodeError, EncodeError, Extended, ExtendedOpcode, Instruction};
pub use module::{ByteStorage, Instructions, Module, ModuleError};
