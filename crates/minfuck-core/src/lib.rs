//! Shared helpers for the MinFuck toolchain.
//!
//! Kept dependency-free so that both the bytecode and VM crates can use it.

mod colors;


pub use colors::Colors;
