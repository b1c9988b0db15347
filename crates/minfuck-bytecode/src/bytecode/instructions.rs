//! Instruction decoding and encoding.
//!
//! Each instruction starts with one opcode byte split into a high nibble `c1`
//! and a low nibble `c2`:
//!
//! ```text
//! c1 & 8 != 0                  -> Extended(spb = c1 & 7), 4 operand bytes follow
//! c2 & 8 != 0 && c2 & 7 != 6   -> PlainThenExtended(c1, spb = c2 & 7), 4 operand bytes follow
//! otherwise                    -> PlainPair(c1, c2), 1 byte
//! ```
//!
//! Operands are big-endian u32. Nothing is cached: the VM decodes the byte at
//! the program counter on every visit.

use std::fmt;

use super::control::Control;
use super::{EXTENDED_SIZE, OPERAND_SIZE};

/// Extended opcode selector (`spb`, 3 bits).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum ExtendedOpcode {
    /// Add the operand's low byte to the current cell.
    Add = 0,
    /// Subtract the operand's low byte from the current cell.
    Sub = 1,
    /// Move the cursor right by the operand.
    Forward = 2,
    /// Move the cursor left by the operand.
    Back = 3,
    /// Jump to the operand offset if the current cell is zero.
    JumpIfZero = 4,
    /// Jump to the operand offset if the current cell is nonzero.
    JumpIfNonZero = 5,
    /// Alignment padding.
    Align = 6,
    Reserved = 7,
}

impl ExtendedOpcode {
    pub fn from_spb(spb: u8) -> Self {
        match spb & 0x7 {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Forward,
            3 => Self::Back,
            4 => Self::JumpIfZero,
            5 => Self::JumpIfNonZero,
            6 => Self::Align,
            _ => Self::Reserved,
        }
    }

    pub fn spb(self) -> u8 {
        self as u8
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Forward => "fwd",
            Self::Back => "back",
            Self::JumpIfZero => "jz",
            Self::JumpIfNonZero => "jnz",
            Self::Align => "align",
            Self::Reserved => "reserved",
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(self, Self::JumpIfZero | Self::JumpIfNonZero)
    }
}

/// Extended operation with its raw 32-bit operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Extended {
    pub opcode: ExtendedOpcode,
    pub operand: u32,
}

impl Extended {
    pub fn new(opcode: ExtendedOpcode, operand: u32) -> Self {
        Self { opcode, operand }
    }

    pub fn add(n: u8) -> Self {
        Self::new(ExtendedOpcode::Add, u32::from(n))
    }

    pub fn sub(n: u8) -> Self {
        Self::new(ExtendedOpcode::Sub, u32::from(n))
    }

    pub fn forward(n: u32) -> Self {
        Self::new(ExtendedOpcode::Forward, n)
    }

    pub fn back(n: u32) -> Self {
        Self::new(ExtendedOpcode::Back, n)
    }

    pub fn jump_if_zero(target: u32) -> Self {
        Self::new(ExtendedOpcode::JumpIfZero, target)
    }

    pub fn jump_if_nonzero(target: u32) -> Self {
        Self::new(ExtendedOpcode::JumpIfNonZero, target)
    }

    /// Low byte of the operand. `add`/`sub` ignore the upper three bytes.
    pub fn low_byte(self) -> u8 {
        (self.operand & 0xFF) as u8
    }

    fn from_operand_bytes(opcode: ExtendedOpcode, bytes: &[u8]) -> Self {
        let operand = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self { opcode, operand }
    }
}

impl fmt::Display for Extended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode.mnemonic();
        match self.opcode {
            ExtendedOpcode::Add | ExtendedOpcode::Sub => write!(f, "{name} {}", self.low_byte()),
            ExtendedOpcode::Forward | ExtendedOpcode::Back => write!(f, "{name} {}", self.operand),
            ExtendedOpcode::JumpIfZero | ExtendedOpcode::JumpIfNonZero => {
                write!(f, "{name} {:04x}", self.operand)
            }
            ExtendedOpcode::Align | ExtendedOpcode::Reserved => f.write_str(name),
        }
    }
}

/// Decode failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated instruction at {offset:#06x}: needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("offset {offset:#06x} is past the end of the program ({len} bytes)")]
    OutOfRange { offset: usize, len: usize },
}

/// Encode failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("plain code {nibble:#x} would decode as extended")]
    PlainNibble { nibble: u8 },
    #[error("align cannot follow a plain code")]
    AlignAfterPlain,
    #[error("instruction at {offset:#06x} has no operand")]
    NoOperand { offset: usize },
    #[error("program of {len} bytes exceeds the 32-bit address space")]
    TooLarge { len: usize },
}

/// One decoded instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// Two plain codes packed in one byte, applied high nibble first.
    PlainPair(Control, Control),
    /// A plain code in the high nibble, then an extended op from the low nibble.
    PlainThenExtended(Control, Extended),
    /// A standalone extended op; the low nibble is ignored.
    Extended(Extended),
}

impl Instruction {
    /// Decode the instruction starting at `offset` in `program`.
    #[inline]
    pub fn decode(program: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let Some(&byte) = program.get(offset) else {
            return Err(DecodeError::OutOfRange {
                offset,
                len: program.len(),
            });
        };
        let (c1, c2) = (byte >> 4, byte & 0xF);

        if c1 & 0x8 != 0 {
            let ext = read_extended(program, offset, ExtendedOpcode::from_spb(c1))?;
            return Ok(Self::Extended(ext));
        }

        // A low nibble of 0xE (spb 6) stays plain.
        if c2 & 0x8 != 0 && c2 & 0x7 != 6 {
            let ext = read_extended(program, offset, ExtendedOpcode::from_spb(c2))?;
            return Ok(Self::PlainThenExtended(Control::from_nibble(c1), ext));
        }

        Ok(Self::PlainPair(
            Control::from_nibble(c1),
            Control::from_nibble(c2),
        ))
    }

    /// Encoded size in bytes (1 or 5).
    pub fn size(&self) -> usize {
        match self {
            Self::PlainPair(..) => 1,
            Self::PlainThenExtended(..) | Self::Extended(_) => EXTENDED_SIZE,
        }
    }

    pub fn extended(&self) -> Option<Extended> {
        match *self {
            Self::PlainPair(..) => None,
            Self::PlainThenExtended(_, ext) | Self::Extended(ext) => Some(ext),
        }
    }

    /// Canonical opcode byte.
    ///
    /// Fails if the instruction cannot be represented, e.g. a plain nibble
    /// with the extended bit set in a position where it would be read back
    /// as an extended opcode.
    pub fn opcode_byte(&self) -> Result<u8, EncodeError> {
        match *self {
            Self::PlainPair(hi, lo) => {
                let (hi, lo) = (plain_high(hi)?, lo.to_nibble());
                if lo >= 8 && lo != 0xE {
                    return Err(EncodeError::PlainNibble { nibble: lo });
                }
                Ok(hi << 4 | lo)
            }
            Self::PlainThenExtended(control, ext) => {
                let hi = plain_high(control)?;
                if ext.opcode == ExtendedOpcode::Align {
                    return Err(EncodeError::AlignAfterPlain);
                }
                Ok(hi << 4 | 0x8 | ext.opcode.spb())
            }
            Self::Extended(ext) => Ok((0x8 | ext.opcode.spb()) << 4),
        }
    }

    /// Append the encoded instruction to `out`. Nothing is written on failure.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.push(self.opcode_byte()?);
        if let Some(ext) = self.extended() {
            out.extend_from_slice(&ext.operand.to_be_bytes());
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(self.size());
        self.write_to(&mut out)?;
        Ok(out)
    }
}

fn plain_high(control: Control) -> Result<u8, EncodeError> {
    match control.to_nibble() {
        nibble if nibble < 8 => Ok(nibble),
        nibble => Err(EncodeError::PlainNibble { nibble }),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlainPair(a, b) => write!(f, "{a} {b}"),
            Self::PlainThenExtended(c, ext) => write!(f, "{c} {ext}"),
            Self::Extended(ext) => write!(f, "{ext}"),
        }
    }
}

fn read_extended(
    program: &[u8],
    offset: usize,
    opcode: ExtendedOpcode,
) -> Result<Extended, DecodeError> {
    let start = offset + 1;
    let available = program.len() - offset;
    if available < EXTENDED_SIZE {
        return Err(DecodeError::Truncated {
            offset,
            needed: EXTENDED_SIZE,
            available,
        });
    }
    Ok(Extended::from_operand_bytes(
        opcode,
        &program[start..start + OPERAND_SIZE],
    ))
}
