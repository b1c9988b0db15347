//! Instruction-level program builder.
//!
//! Produces loadable binaries from already-chosen instructions. Loops are
//! emitted as a `jz`/`jnz` pair whose targets are patched once the loop end
//! is known.

use super::control::Control;
use super::header::Header;
use super::instructions::{EncodeError, Extended, Instruction};

/// Builds a program: header followed by encoded instructions.
///
/// Appending never fails on the spot. The first encoding failure is kept,
/// later instructions are still placed, and [`build`](Self::build) reports it.
#[derive(Clone, Debug)]
pub struct ProgramBuilder {
    bytes: Vec<u8>,
    error: Option<EncodeError>,
}

impl ProgramBuilder {
    pub fn new(header: Header) -> Self {
        Self {
            bytes: header.to_bytes().to_vec(),
            error: None,
        }
    }

    /// Offset at which the next instruction will be placed.
    ///
    /// Saturates at `u32::MAX`; such a program fails to build.
    pub fn offset(&self) -> u32 {
        u32::try_from(self.bytes.len()).unwrap_or(u32::MAX)
    }

    /// Append an instruction, returning its offset.
    pub fn push(&mut self, instr: Instruction) -> u32 {
        let at = self.offset();
        if let Err(e) = instr.write_to(&mut self.bytes) {
            self.fail(e);
        }
        at
    }

    /// Append a packed pair of plain codes.
    pub fn pair(&mut self, first: Control, second: Control) -> u32 {
        self.push(Instruction::PlainPair(first, second))
    }

    /// Append a standalone extended instruction.
    pub fn extended(&mut self, ext: Extended) -> u32 {
        self.push(Instruction::Extended(ext))
    }

    /// Append raw bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> u32 {
        let at = self.offset();
        self.bytes.extend_from_slice(bytes);
        at
    }

    /// Emit a `jz` with a placeholder target; close it with [`close_loop`](Self::close_loop).
    pub fn open_loop(&mut self) -> u32 {
        self.extended(Extended::jump_if_zero(0))
    }

    /// Emit the `jnz` back to the body of `open`, and point `open` past it.
    pub fn close_loop(&mut self, open: u32) -> u32 {
        let body = open.saturating_add(super::EXTENDED_SIZE as u32);
        let close = self.extended(Extended::jump_if_nonzero(body));
        let exit = self.offset();
        self.patch_operand(open, exit);
        close
    }

    /// Overwrite the operand of the extended instruction at `at`.
    ///
    /// Anything without an operand at `at` is recorded as
    /// [`EncodeError::NoOperand`].
    pub fn patch_operand(&mut self, at: u32, operand: u32) {
        let offset = at as usize;
        let has_operand = Instruction::decode(&self.bytes, offset)
            .ok()
            .and_then(|instr| instr.extended())
            .is_some();
        if !has_operand {
            self.fail(EncodeError::NoOperand { offset });
            return;
        }
        self.bytes[offset + 1..offset + 5].copy_from_slice(&operand.to_be_bytes());
    }

    /// The encoded program, or the first encoding failure.
    pub fn build(self) -> Result<Vec<u8>, EncodeError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if u32::try_from(self.bytes.len()).is_err() {
            return Err(EncodeError::TooLarge {
                len: self.bytes.len(),
            });
        }
        Ok(self.bytes)
    }

    fn fail(&mut self, error: EncodeError) {
        self.error.get_or_insert(error);
    }
}
