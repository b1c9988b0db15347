//! Loaded program with unified storage.
//!
//! The [`Module`] owns the whole file (header included) so that program
//! counters and jump targets index it directly.

use std::io;
use std::ops::Deref;
use std::path::Path;

use super::header::Header;
use super::instructions::{DecodeError, Instruction};
use super::CODE_START;

/// Storage for program bytes.
#[derive(Debug)]
pub struct ByteStorage(Vec<u8>);

impl Deref for ByteStorage {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ByteStorage {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self(bytes))
    }
}

/// Module load error.
///
/// The messages of the format errors are the ones the command line prints.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Invalid MF binary(file too small)")]
    FileTooSmall(usize),
    #[error("Invalid MF binary(magic mismatch)")]
    BadMagic([u8; 4]),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A loaded program.
///
/// Never mutated after load. Instructions are decoded on demand via
/// [`decode_at`](Self::decode_at).
#[derive(Debug)]
pub struct Module {
    storage: ByteStorage,
    header: Header,
}

impl Module {
    /// Load a module from owned bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ModuleError> {
        Self::from_storage(ByteStorage::from_vec(bytes))
    }

    /// Load a module by copying a byte slice.
    pub fn load(bytes: &[u8]) -> Result<Self, ModuleError> {
        Self::from_storage(ByteStorage::copy_from_slice(bytes))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModuleError> {
        let storage = ByteStorage::from_file(&path)?;
        Self::from_storage(storage)
    }

    fn from_storage(storage: ByteStorage) -> Result<Self, ModuleError> {
        let header = Header::from_bytes(&storage)?;
        Ok(Self { storage, header })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// The whole program, header included.
    pub fn bytes(&self) -> &[u8] {
        &self.storage
    }

    /// Total program size; execution halts once the program counter reaches it.
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// The instruction stream following the header.
    pub fn code(&self) -> &[u8] {
        &self.storage[CODE_START..]
    }

    /// Decode the instruction at absolute offset `pc`.
    #[inline]
    pub fn decode_at(&self, pc: usize) -> Result<Instruction, DecodeError> {
        Instruction::decode(&self.storage, pc)
    }

    /// Linear sweep over the instruction stream from [`CODE_START`].
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            program: &self.storage,
            offset: CODE_START,
            done: false,
        }
    }
}

/// Iterator returned by [`Module::instructions`].
///
/// Yields `(offset, instruction)` pairs; a decode error is yielded once and
/// ends the sweep.
#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    program: &'a [u8],
    offset: usize,
    done: bool,
}

impl Iterator for Instructions<'_> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.program.len() {
            return None;
        }
        let offset = self.offset;
        let decoded = Instruction::decode(self.program, offset);
        match &decoded {
            Ok(instr) => self.offset += instr.size(),
            Err(_) => self.done = true,
        }
        Some((offset, decoded))
    }
}
