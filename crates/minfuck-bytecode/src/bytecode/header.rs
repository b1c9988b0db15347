//! Bytecode file header (8 bytes).

use super::module::ModuleError;
use super::{BF_MAGIC, HEADER_SIZE, MF_MAGIC};

/// Tape layout selected by the header magic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// MinFuck: `2 * memsize + 8` cells, every even cell from index 2 starts at 1.
    Mf,
    /// Brainfuck: `memsize` zeroed cells.
    Bf,
}

impl Variant {
    pub fn from_magic(magic: [u8; 4]) -> Option<Self> {
        match magic {
            MF_MAGIC => Some(Self::Mf),
            BF_MAGIC => Some(Self::Bf),
            _ => None,
        }
    }

    pub fn magic(self) -> [u8; 4] {
        match self {
            Self::Mf => MF_MAGIC,
            Self::Bf => BF_MAGIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mf => "MF",
            Self::Bf => "BF",
        }
    }

    /// Number of tape cells for a given `memsize`.
    ///
    /// Returned as `u64`: the MF layout of a maximal memsize does not fit in `u32`.
    pub fn tape_len(self, memsize: u32) -> u64 {
        match self {
            Self::Mf => 2 * u64::from(memsize) + 8,
            Self::Bf => u64::from(memsize),
        }
    }

    /// Initial value of the cell at `index`.
    pub fn initial_cell(self, index: usize) -> u8 {
        match self {
            Self::Mf => u8::from(index >= 2 && index % 2 == 0),
            Self::Bf => 0,
        }
    }
}

/// File header - first 8 bytes of a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub variant: Variant,
    /// Requested memory size, interpreted per [`Variant::tape_len`].
    pub memsize: u32,
}

impl Header {
    pub fn new(variant: Variant, memsize: u32) -> Self {
        Self { variant, memsize }
    }

    /// Decode and validate the header at the start of `bytes`.
    ///
    /// The length check runs first: a short buffer is `FileTooSmall` whatever it contains.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModuleError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ModuleError::FileTooSmall(bytes.len()));
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let variant = Variant::from_magic(magic).ok_or(ModuleError::BadMagic(magic))?;
        let memsize = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Ok(Self { variant, memsize })
    }

    /// Encode header to 8 bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.variant.magic());
        bytes[4..8].copy_from_slice(&self.memsize.to_be_bytes());
        bytes
    }

    pub fn tape_len(&self) -> u64 {
        self.variant.tape_len(self.memsize)
    }
}
