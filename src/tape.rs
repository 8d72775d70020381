//! Implementations of the BF tape
//!
//! The tape starts out with [`DEFAULT_TAPE_SIZE`] zeroed cells and grows by
//! [`TAPE_GROWTH_SIZE`] cells whenever the cursor is advanced past its end.
//! It never shrinks. Moving the cursor left of cell 0 is an error. The C code
//! generator emits the same policy using the same constants.

use thiserror::Error;

use crate::BfNum;

/// Number of cells a fresh tape has.
pub const DEFAULT_TAPE_SIZE: usize = 0x400;
/// Number of cells added each time the tape grows.
pub const TAPE_GROWTH_SIZE: usize = 0x100;

/// Error type for tape operations
#[derive(Debug, Clone, Copy, Error, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum TapeError {
    /// The tape pointer was moved left of the first cell.
    #[error("Stack underflow")]
    StackUnderflow,
    /// Growing the tape failed.
    #[error("Failed to allocate memory for program stack")]
    AllocationError,
}

/// A trait implementing a tape for the BF program memory
pub trait Tape {
    /// Value of the cell under the cursor.
    fn read(&self) -> BfNum;
    /// Overwrite the cell under the cursor.
    fn write(&mut self, value: BfNum);
    /// Move the cursor one cell right, growing the tape if needed.
    fn advance(&mut self) -> Result<(), TapeError>;
    /// Move the cursor one cell left.
    ///
    /// Must leave the tape untouched on failure.
    fn retreat(&mut self) -> Result<(), TapeError>;

    fn cursor(&self) -> usize;
    fn len(&self) -> usize;

    /// Value at an arbitrary index, zero beyond the end of the tape.
    fn cell(&self, index: usize) -> BfNum;
}

/// A tape implemented with a Vec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecTape {
    data: Vec<BfNum>,
    cursor: usize,
    /// Growing past this many cells is reported as an allocation failure.
    max_len: Option<usize>,
}

impl VecTape {
    pub fn new() -> Self {
        Self {
            data: vec![BfNum::ZERO; DEFAULT_TAPE_SIZE],
            cursor: 0,
            #[cfg(fuzzing)]
            max_len: Some(2usize.pow(20)),
            #[cfg(not(fuzzing))]
            max_len: None,
        }
    }

    /// Create a tape that refuses to grow beyond `max_len` cells.
    pub fn with_limit(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            ..Self::new()
        }
    }

    fn grow(&mut self) -> Result<(), TapeError> {
        let new_len = self.data.len() + TAPE_GROWTH_SIZE;
        if self.max_len.is_some_and(|max| new_len > max) {
            return Err(TapeError::AllocationError);
        }
        self.data
            .try_reserve_exact(TAPE_GROWTH_SIZE)
            .map_err(|_| TapeError::AllocationError)?;
        self.data.resize(new_len, BfNum::ZERO);
        Ok(())
    }
}

impl Default for VecTape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape for VecTape {
    fn read(&self) -> BfNum {
        self.data[self.cursor]
    }

    fn write(&mut self, value: BfNum) {
        self.data[self.cursor] = value;
    }

    fn advance(&mut self) -> Result<(), TapeError> {
        if self.cursor + 1 == self.data.len() {
            self.grow()?;
        }
        self.cursor += 1;
        Ok(())
    }

    fn retreat(&mut self) -> Result<(), TapeError> {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .ok_or(TapeError::StackUnderflow)?;
        Ok(())
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn cell(&self, index: usize) -> BfNum {
        self.data.get(index).copied().unwrap_or(BfNum::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::{Tape, TapeError, VecTape, DEFAULT_TAPE_SIZE, TAPE_GROWTH_SIZE};
    use crate::BfNum;

    #[test]
    fn test_vec_tape() {
        let mut tape = VecTape::new();
        assert_eq!(tape.len(), DEFAULT_TAPE_SIZE);
        tape.write(5.into());
        assert_eq!(tape.read(), 5.into());
        tape.write(tape.read().dec().dec().dec().dec().dec().dec());
        assert_eq!(tape.read(), 255.into());
        tape.advance().unwrap();
        tape.advance().unwrap();
        tape.write(200.into());
        tape.retreat().unwrap();
        assert_eq!(tape.read(), 0.into());
        assert_eq!(tape.cursor(), 1);
        assert_eq!(tape.cell(0), 255.into());
        assert_eq!(tape.cell(2), 200.into());
        assert_eq!(tape.cell(1_000_000), 0.into());
    }

    #[test]
    fn test_underflow_does_not_mutate() {
        let mut tape = VecTape::new();
        tape.write(9.into());
        let before = tape.clone();
        assert_eq!(tape.retreat(), Err(TapeError::StackUnderflow));
        assert_eq!(tape, before);
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_growth() {
        let mut tape = VecTape::new();
        for n in 1..=3000 {
            tape.advance().unwrap();
            assert!(tape.len() >= n + 1);
            assert!(tape.cursor() < tape.len());
            // Fresh cells are zero until written
            assert_eq!(tape.read(), BfNum::ZERO);
        }
        // Fixed increments, not geometric
        assert_eq!(tape.len(), DEFAULT_TAPE_SIZE + 8 * TAPE_GROWTH_SIZE);
    }

    #[test]
    fn test_growth_limit() {
        let mut tape = VecTape::with_limit(DEFAULT_TAPE_SIZE);
        for _ in 0..DEFAULT_TAPE_SIZE - 1 {
            tape.advance().unwrap();
        }
        assert_eq!(tape.advance(), Err(TapeError::AllocationError));
        assert_eq!(tape.cursor(), DEFAULT_TAPE_SIZE - 1);
        assert_eq!(tape.len(), DEFAULT_TAPE_SIZE);
    }
}
