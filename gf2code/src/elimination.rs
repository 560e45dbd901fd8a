pub(crate) mod parallel;

use crate::bitvec::*;
use crate::bitvector::BitVector;
use crate::error::CodeError;
use std::ops::Index;
use tracing::{debug, trace};

/// Working matrix for reducing generator rows to systematic form
///
/// The matrix is stored in row-major order in a single [`BitVec`], each row taking `col_blocks`
/// blocks. Padding bits past `cols` are 0 in every row. Rows can only be removed, never
/// reordered, and `data` is truncated to `rows * col_blocks` blocks whenever rows are removed.
#[derive(Clone, Debug)]
pub(crate) struct EliminationMatrix {
    /// the number of rows still in the matrix
    rows: usize,

    /// the number of logical columns, i.e. the codeword length
    cols: usize,

    /// the number of [`BitBlock`]s used to store each row
    col_blocks: usize,

    data: BitVec,
}

/// Receives the column swaps performed during reduction
pub(crate) trait ColumnOps {
    fn swap_cols(&mut self, a: usize, b: usize);
}

impl ColumnOps for () {
    #[inline]
    fn swap_cols(&mut self, _: usize, _: usize) {}
}

/// A permutation of coordinates, where entry `j` is the original column now at position `j`
impl ColumnOps for Vec<usize> {
    #[inline]
    fn swap_cols(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }
}

impl EliminationMatrix {
    /// Copies `rows` into a new matrix with `cols` columns
    ///
    /// Every row must have length `cols`.
    pub fn from_rows(cols: usize, rows: &[BitVector]) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == cols));
        let col_blocks = min_blocks(cols);
        let data = rows
            .iter()
            .flat_map(|r| r.as_bits().block_iter())
            .collect();
        EliminationMatrix {
            rows: rows.len(),
            cols,
            col_blocks,
            data,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn bit(&self, i: usize, j: usize) -> bool {
        self.data.bit(self.col_blocks * BLOCKSIZE * i + j)
    }

    #[inline]
    pub fn row(&self, row: usize) -> &BitRange {
        &self.data[row * self.col_blocks..(row + 1) * self.col_blocks]
    }

    /// Swaps columns `a` and `b` in every row
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        let stride = self.col_blocks * BLOCKSIZE;
        for i in 0..self.rows {
            self.data.swap_bits(stride * i + a, stride * i + b);
        }
    }

    /// Returns the column to use as pivot for row `pivot`: `pivot` itself if it holds a 1,
    /// otherwise the first later column holding a 1 in that row
    fn pivot_col(&self, pivot: usize) -> Option<usize> {
        if pivot >= self.cols {
            None
        } else if self.bit(pivot, pivot) {
            Some(pivot)
        } else {
            self.row(pivot).first_one_between(pivot + 1, self.cols)
        }
    }

    /// Adds row `pivot` to every later row with a 1 in column `pivot`
    ///
    /// Row `pivot` is zero in every column before `pivot`, so XORing from the block that
    /// contains `pivot` is the same as XORing over columns `pivot..cols`.
    fn eliminate_below(&mut self, pivot: usize) {
        let cb = self.col_blocks;
        let start = pivot / BLOCKSIZE;
        for i in (pivot + 1)..self.rows {
            if self.bit(i, pivot) {
                self.data
                    .xor_range(pivot * cb + start, i * cb + start, cb - start);
            }
        }
    }

    /// Removes all-zero rows after `pivot`, keeping the rest in order. Returns how many were
    /// removed.
    fn remove_zero_rows_below(&mut self, pivot: usize) -> usize {
        let cb = self.col_blocks;
        let mut kept = pivot + 1;
        for i in (pivot + 1)..self.rows {
            if !self.row(i).is_zero() {
                if kept != i {
                    self.data.copy_range(i * cb, kept * cb, cb);
                }
                kept += 1;
            }
        }

        let removed = self.rows - kept;
        self.rows = kept;
        self.data.truncate(kept * cb);
        removed
    }

    /// Reduce the matrix to systematic form, reporting every column swap to `proxy`
    ///
    /// On success, row `p` has a 1 in column `p` and 0s in all columns before it, and no row
    /// is zero.
    ///
    /// # Errors
    ///
    /// [`CodeError::NotSystematic`] if some row has no 1 at or after its own index.
    pub fn reduce(&mut self, proxy: &mut impl ColumnOps) -> Result<(), CodeError> {
        self.reduce_helper(proxy, Self::eliminate_below)
    }

    /// Main working function for reduction, parameterised over the row elimination step
    fn reduce_helper(
        &mut self,
        proxy: &mut impl ColumnOps,
        eliminate: impl Fn(&mut Self, usize),
    ) -> Result<(), CodeError> {
        debug!(rows = self.rows, cols = self.cols, "reducing to systematic form");
        let mut pivot = 0;
        while pivot < self.rows {
            match self.pivot_col(pivot) {
                Some(col) if col == pivot => {}
                Some(col) => {
                    trace!(pivot, col, "swapping columns");
                    self.swap_cols(pivot, col);
                    proxy.swap_cols(pivot, col);
                }
                None => {
                    debug!(row = pivot, "no pivot column left");
                    return Err(CodeError::NotSystematic { row: pivot });
                }
            }

            eliminate(self, pivot);

            let removed = self.remove_zero_rows_below(pivot);
            if removed > 0 {
                debug!(pivot, removed, remaining = self.rows, "dropped dependent rows");
            }
            pivot += 1;
        }
        Ok(())
    }

    /// Converts the remaining rows back into [`BitVector`]s
    pub fn into_rows(self) -> Vec<BitVector> {
        (0..self.rows)
            .map(|i| BitVector::from_blocks(self.cols, self.row(i)))
            .collect()
    }
}

impl Index<(usize, usize)> for EliminationMatrix {
    type Output = bool;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.bit(index.0, index.1) {
            &true
        } else {
            &false
        }
    }
}
