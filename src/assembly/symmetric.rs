//! Expansion of half-stored symmetric matrices

use crate::assembly::CoordinateAssembler;
use crate::error::Result;
use crate::Value;

/// Which triangle a symmetric file stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// No off-diagonal entry seen yet
    Unknown,
    /// Entries satisfy `col < row`
    Lower,
    /// Entries satisfy `col > row`
    Upper,
}

/// Tracks the stored triangle of a symmetric matrix.
///
/// The first off-diagonal entry fixes the orientation; every later entry
/// must lie in the same triangle.
#[derive(Debug, Clone)]
pub struct SymmetricExpansion {
    orientation: Orientation,
    diagonal: usize,
    off_diagonal: usize,
}

impl Default for SymmetricExpansion {
    fn default() -> Self {
        Self::new()
    }
}

impl SymmetricExpansion {
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Unknown,
            diagonal: 0,
            off_diagonal: 0,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of physical entries produced so far
    pub fn expanded_len(&self) -> usize {
        self.diagonal + 2 * self.off_diagonal
    }

    /// Checks `(row, col)` against the stored triangle.
    ///
    /// On violation the returned message names the offending coordinates as
    /// they appear in the file (`base` is added back to both).
    pub fn observe(&mut self, row: usize, col: usize, base: usize) -> std::result::Result<(), String> {
        match (self.orientation, col.cmp(&row)) {
            (_, std::cmp::Ordering::Equal) => {
                self.diagonal += 1;
                return Ok(());
            }
            (Orientation::Unknown, std::cmp::Ordering::Greater) => {
                self.orientation = Orientation::Upper;
            }
            (Orientation::Unknown, std::cmp::Ordering::Less) => {
                self.orientation = Orientation::Lower;
            }
            (Orientation::Lower, std::cmp::Ordering::Greater) => {
                return Err(format!(
                    "Non-zero in upper triangle: ({}, {}) when lower triangle non-zeros have been found",
                    row + base,
                    col + base
                ));
            }
            (Orientation::Upper, std::cmp::Ordering::Less) => {
                return Err(format!(
                    "Non-zero in lower triangle: ({}, {}) when upper triangle non-zeros have been found",
                    row + base,
                    col + base
                ));
            }
            _ => {}
        }
        self.off_diagonal += 1;
        Ok(())
    }
}

/// Pushes `(row, col, value)` and, off the diagonal, its mirror `(col, row, value)`
pub fn push_mirrored(
    assembler: &mut CoordinateAssembler<'_>,
    row: usize,
    col: usize,
    value: Value,
) -> Result<()> {
    assembler.push(row, col, value)?;
    if row != col {
        assembler.push(col, row, value)?;
    }
    Ok(())
}
