//! Bytecode format for MinFuck and its Brainfuck-compatible variant.
//!
//! This crate contains:
//! - Format definitions (magic, [`Header`], [`Variant`])
//! - The nibble-packed instruction decoder ([`Instruction`], [`Control`], [`Extended`])
//! - [`Module`], an immutable loaded program
//! - Tooling: [`ProgramBuilder`], [`dump`] and [`decompile`]

pub mod bytecode;

// Re-export commonly used items at crate root
pub use bytecode::{
    BF_MAGIC, ByteStorage, CODE_START, Control, DecodeError, DecompileError, EXTENDED_SIZE,
    EncodeError, Extended, ExtendedOpcode, HEADER_SIZE, Header, Instruction, Instructions,
    MF_MAGIC, Module, ModuleError, OPERAND_SIZE, ProgramBuilder, Variant, check_loops,
    decompile, decompile_to, dump, format,
};
