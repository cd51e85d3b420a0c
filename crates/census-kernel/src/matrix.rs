// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dense square `i64` matrices with exact, overflow-checked arithmetic.
//!
//! Storage is row-major. Nothing here wraps: every product and sum is checked
//! and an overflow surfaces as [`KernelError::Overflow`]. Operations that
//! mutate in place validate first, so a failed call leaves the matrix as it was.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{KernelError, KernelResult};
use crate::transfer::Restorable;

/// Plain descriptor an [`IntMatrix`] is compiled from and saved to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixDescriptor {
    /// Side length.
    pub dimension: usize,
    /// `dimension * dimension` entries, row-major.
    pub entries: Vec<i64>,
}

/// Square integer matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntMatrix {
    dimension: usize,
    entries: Vec<i64>,
}

impl IntMatrix {
    /// Builds a matrix from its side length and row-major entries.
    pub fn new(dimension: usize, entries: Vec<i64>) -> KernelResult<Self> {
        let expected = dimension
            .checked_mul(dimension)
            .ok_or(KernelError::Overflow("matrix size"))?;
        if entries.len() != expected {
            return Err(KernelError::EntryCount {
                dimension,
                expected,
                actual: entries.len(),
            });
        }
        debug!(dimension, "matrix compiled");
        Ok(Self { dimension, entries })
    }

    /// Builds a matrix from nested rows; the input must be square.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> KernelResult<Self> {
        let dimension = rows.len();
        if let Some((index, row)) = rows
            .iter()
            .map(AsRef::as_ref)
            .enumerate()
            .find(|(_, row)| row.len() != dimension)
        {
            return Err(KernelError::Config(format!(
                "row {index} has {} entries in a matrix with {dimension} rows",
                row.len()
            )));
        }
        Self::new(dimension, rows.iter().flat_map(|row| row.as_ref().iter().copied()).collect())
    }

    /// The `dimension x dimension` identity.
    pub fn identity(dimension: usize) -> Self {
        let mut entries = vec![0; dimension * dimension];
        for i in 0..dimension {
            entries[i * dimension + i] = 1;
        }
        Self { dimension, entries }
    }

    /// Side length.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Row-major entries.
    pub fn entries(&self) -> &[i64] {
        &self.entries
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.dimension && col < self.dimension {
            Some(self.entries[row * self.dimension + col])
        } else {
            None
        }
    }

    /// Deep copy; same as [`Clone::clone`].
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Self) -> KernelResult<Self> {
        if self.dimension != other.dimension {
            return Err(KernelError::DimensionMismatch {
                left: self.dimension,
                right: other.dimension,
            });
        }
        let d = self.dimension;
        let mut entries = vec![0_i64; d * d];
        for i in 0..d {
            for j in 0..d {
                let mut sum = 0_i64;
                for k in 0..d {
                    sum = self.entries[i * d + k]
                        .checked_mul(other.entries[k * d + j])
                        .and_then(|term| sum.checked_add(term))
                        .ok_or(KernelError::Overflow("multiply"))?;
                }
                entries[i * d + j] = sum;
            }
        }
        Ok(Self {
            dimension: d,
            entries,
        })
    }

    /// Adds `delta` to every diagonal entry.
    pub fn add_diagonal(&mut self, delta: i64) -> KernelResult<()> {
        let d = self.dimension;
        let shifted = (0..d)
            .map(|i| self.entries[i * d + i].checked_add(delta))
            .collect::<Option<Vec<_>>>()
            .ok_or(KernelError::Overflow("add_diagonal"))?;
        for (i, value) in shifted.into_iter().enumerate() {
            self.entries[i * d + i] = value;
        }
        Ok(())
    }

    /// Exact determinant by Bareiss fraction-free elimination.
    ///
    /// Rows are permuted logically; each swap flips the sign. A column with
    /// no usable pivot means the determinant is zero.
    pub fn determinant(&self) -> KernelResult<i64> {
        let d = self.dimension;
        match d {
            0 => return Ok(1),
            1 => return Ok(self.entries[0]),
            _ => {}
        }
        let mut a = self.entries.clone();
        let mut rows: Vec<usize> = (0..d).collect();
        let mut negate = false;
        let mut previous: i64 = 1;

        for i in 0..d - 1 {
            if a[rows[i] * d + i] == 0 {
                let Some(swap) = (i + 1..d).find(|&j| a[rows[j] * d + i] != 0) else {
                    return Ok(0);
                };
                rows.swap(i, swap);
                negate = !negate;
            }
            let pivot_row = rows[i] * d;
            let pivot = i128::from(a[pivot_row + i]);
            for &row in &rows[i + 1..] {
                let row = row * d;
                let lead = i128::from(a[row + i]);
                for k in i + 1..d {
                    // Two i64 products always fit in i128.
                    let numerator =
                        i128::from(a[row + k]) * pivot - lead * i128::from(a[pivot_row + k]);
                    let divisor = i128::from(previous);
                    if numerator % divisor != 0 {
                        return Err(KernelError::InexactDivision {
                            step: i,
                            numerator,
                            pivot: divisor,
                        });
                    }
                    a[row + k] = i64::try_from(numerator / divisor)
                        .map_err(|_| KernelError::Overflow("determinant"))?;
                }
            }
            previous = a[pivot_row + i];
        }

        let last = a[rows[d - 1] * d + d - 1];
        if negate {
            last.checked_neg().ok_or(KernelError::Overflow("determinant"))
        } else {
            Ok(last)
        }
    }

    /// Abelianization of a substitution action on a free group.
    ///
    /// The generators are the lowercase letters of `generators_and_inverses`
    /// in order; a generator's inverse is its uppercase form. Column `i`
    /// records, for each generator `g_j`, the occurrences of `g_j` minus the
    /// occurrences of its inverse in the image of `g_i`. Generators without
    /// an image get a zero column.
    pub fn abelianized_action(
        generators_and_inverses: &str,
        action: &BTreeMap<u8, Vec<u8>>,
    ) -> KernelResult<Self> {
        let alphabet = Alphabet::new(generators_and_inverses)?;
        let generators: Vec<u8> = alphabet
            .symbols()
            .iter()
            .copied()
            .filter(u8::is_ascii_lowercase)
            .collect();
        let d = generators.len();
        let mut entries = vec![0_i64; d * d];
        for (i, generator) in generators.iter().enumerate() {
            let Some(image) = action.get(generator) else {
                continue;
            };
            for (j, &counted) in generators.iter().enumerate() {
                let inverse = counted.to_ascii_uppercase();
                let tally = |letter: u8| {
                    i64::try_from(image.iter().filter(|&&b| b == letter).count())
                        .map_err(|_| KernelError::Overflow("abelianized_action"))
                };
                entries[j * d + i] = tally(counted)? - tally(inverse)?;
            }
        }
        Self::new(d, entries)
    }
}

impl fmt::Display for IntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dimension == 0 {
            return Ok(());
        }
        for (index, row) in self.entries.chunks(self.dimension).enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{row:?}")?;
        }
        Ok(())
    }
}

impl Restorable for IntMatrix {
    type Descriptor = MatrixDescriptor;

    fn save(&self) -> Self::Descriptor {
        MatrixDescriptor {
            dimension: self.dimension,
            entries: self.entries.clone(),
        }
    }

    fn from_descriptor(descriptor: Self::Descriptor) -> KernelResult<Self> {
        Self::new(descriptor.dimension, descriptor.entries)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn pivot_swap_flips_sign() {
        let m = IntMatrix::from_rows(&[[0_i64, 1], [1, 0]]).expect("square");
        assert_eq!(m.determinant().expect("det"), -1);
        let m = IntMatrix::from_rows(&[[0_i64, 0, 1], [0, 1, 0], [1, 0, 0]]).expect("square");
        assert_eq!(m.determinant().expect("det"), -1);
    }

    #[test]
    fn zero_column_short_circuits() {
        let m = IntMatrix::from_rows(&[[0_i64, 5], [0, 7]]).expect("square");
        assert_eq!(m.determinant().expect("det"), 0);
    }

    #[test]
    fn get_respects_bounds() {
        let m = IntMatrix::from_rows(&[[1_i64, 2], [3, 4]]).expect("square");
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn display_prints_one_row_per_line() {
        let m = IntMatrix::from_rows(&[[1_i64, -1], [1, 0]]).expect("square");
        assert_eq!(m.to_string(), "[1, -1]\n[1, 0]");
        assert_eq!(IntMatrix::identity(0).to_string(), "");
    }
}
