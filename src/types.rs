//! Fundamental data types used throughout tbf

use std::{fmt::Display, num::Wrapping};

/// A BF number (u8 with wrapping semantics).
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BfNum(Wrapping<u8>);

impl BfNum {
    pub const ZERO: BfNum = BfNum(Wrapping(0));
    pub const ALL_ONES: BfNum = BfNum(Wrapping(0xff));

    pub fn is_zero(&self) -> bool {
        self.0 .0 == 0
    }

    /// The value one higher, wrapping from 255 to 0.
    pub fn inc(self) -> Self {
        Self(self.0 + Wrapping(1))
    }

    /// The value one lower, wrapping from 0 to 255.
    pub fn dec(self) -> Self {
        Self(self.0 - Wrapping(1))
    }
}

impl From<u8> for BfNum {
    fn from(value: u8) -> Self {
        Self(Wrapping(value))
    }
}

impl From<i32> for BfNum {
    fn from(value: i32) -> Self {
        Self(Wrapping(value.rem_euclid(256) as u8))
    }
}

impl From<BfNum> for u8 {
    fn from(value: BfNum) -> Self {
        value.0 .0
    }
}

impl Display for BfNum {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable location of a byte in the source code.
///
/// Both fields are 1-based. The column counts bytes since the last newline,
/// so the newline byte itself is the last column of its line.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePos {
    /// Byte offset into the source
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    /// Locate `offset` in `source`.
    ///
    /// Offsets past the end are clamped to the end of the source.
    pub fn locate(source: &[u8], offset: usize) -> Self {
        let prefix = &source[..offset.min(source.len())];
        let line = 1 + prefix.iter().filter(|&&c| c == b'\n').count();
        let line_start = prefix
            .iter()
            .rposition(|&c| c == b'\n')
            .map_or(0, |nl| nl + 1);
        Self {
            offset,
            line,
            column: offset - line_start + 1,
        }
    }
}

impl Display for SourcePos {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
