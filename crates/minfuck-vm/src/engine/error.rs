//! Errors that can occur during program execution.

use std::io;

use super::tape::TapeError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A cell was read or written with the cursor off the tape.
    #[error("cell {position} is outside the tape ({len} cells) at pc {pc:#06x}")]
    PositionOutOfBounds { pc: usize, position: i64, len: usize },

    #[error("cursor overflow at pc {pc:#06x}")]
    CursorOverflow { pc: usize },

    /// A taken jump left `[CODE_START, len]`.
    #[error("jump target {target:#06x} is outside the program ({len} bytes) at pc {pc:#06x}")]
    JumpTargetOutOfBounds { pc: usize, target: u32, len: usize },

    #[error("jump target {target:#06x} splits an instruction at pc {pc:#06x}")]
    JumpIntoInstruction { pc: usize, target: u32 },

    /// An extended instruction's operand runs past the end of the program.
    #[error("truncated instruction at pc {pc:#06x}")]
    TruncatedInstruction { pc: usize },

    #[error("end of input at pc {pc:#06x}")]
    EndOfInput { pc: usize },

    #[error("cannot allocate a tape of {len} cells")]
    TapeAllocation { len: u64 },

    /// Execution fuel exhausted (too many instructions executed).
    #[error("runtime execution limit exceeded ({0} steps)")]
    ExecFuelExhausted(u64),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RuntimeError {
    pub(crate) fn from_tape(err: TapeError, pc: usize) -> Self {
        match err {
            TapeError::OutOfBounds { position, len } => Self::PositionOutOfBounds {
                pc,
                position,
                len,
            },
            TapeError::CursorOverflow { .. } => Self::CursorOverflow { pc },
            TapeError::Allocation { len } => Self::TapeAllocation { len },
        }
    }
}
