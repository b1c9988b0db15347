//! VM memory: a fixed run of byte cells and a cursor.

use minfuck_bytecode::Header;

/// Tape access failure. The VM attaches the program counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    #[error("cell {position} is outside the tape ({len} cells)")]
    OutOfBounds { position: i64, len: usize },
    #[error("cursor moved past {position} overflows")]
    CursorOverflow { position: i64 },
    #[error("cannot allocate a tape of {len} cells")]
    Allocation { len: u64 },
}

/// Byte cells plus a cursor.
///
/// The cursor may sit anywhere; only cell access checks it against the tape.
/// Cell arithmetic wraps modulo 256.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    position: i64,
}

impl Tape {
    /// Allocate and initialize the tape a header asks for.
    ///
    /// A tape longer than `limit` cells is refused before any allocation.
    pub fn for_header(header: &Header, limit: u64) -> Result<Self, TapeError> {
        let len = header.tape_len();
        if len > limit {
            return Err(TapeError::Allocation { len });
        }
        let size = usize::try_from(len).map_err(|_| TapeError::Allocation { len })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| TapeError::Allocation { len })?;
        cells.extend((0..size).map(|i| header.variant.initial_cell(i)));

        Ok(Self::from_cells(cells))
    }

    /// A tape over explicit cells, cursor at 0.
    pub fn from_cells(cells: Vec<u8>) -> Self {
        Self { cells, position: 0 }
    }

    /// Place the cursor at `position`.
    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value under the cursor.
    pub fn get(&self) -> Result<u8, TapeError> {
        self.index().map(|i| self.cells[i])
    }

    pub fn set(&mut self, value: u8) -> Result<(), TapeError> {
        let i = self.index()?;
        self.cells[i] = value;
        Ok(())
    }

    pub fn increment(&mut self, n: u8) -> Result<(), TapeError> {
        let i = self.index()?;
        self.cells[i] = self.cells[i].wrapping_add(n);
        Ok(())
    }

    pub fn decrement(&mut self, n: u8) -> Result<(), TapeError> {
        let i = self.index()?;
        self.cells[i] = self.cells[i].wrapping_sub(n);
        Ok(())
    }

    /// Move the cursor right by `n` cells.
    pub fn advance(&mut self, n: u32) -> Result<(), TapeError> {
        self.position = self
            .position
            .checked_add(i64::from(n))
            .ok_or(TapeError::CursorOverflow {
                position: self.position,
            })?;
        Ok(())
    }

    /// Move the cursor left by `n` cells.
    pub fn retreat(&mut self, n: u32) -> Result<(), TapeError> {
        self.position = self
            .position
            .checked_sub(i64::from(n))
            .ok_or(TapeError::CursorOverflow {
                position: self.position,
            })?;
        Ok(())
    }

    fn index(&self) -> Result<usize, TapeError> {
        usize::try_from(self.position)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or(TapeError::OutOfBounds {
                position: self.position,
                len: self.cells.len(),
            })
    }
}
