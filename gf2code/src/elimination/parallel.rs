use super::{ColumnOps, EliminationMatrix};
use crate::bitvec::*;
use crate::error::CodeError;

use rayon::prelude::*;

/// Systematic reduction with the row eliminations spread over the rayon thread pool
///
/// Pivot search, column swaps and removal of zero rows stay sequential, so the result and the
/// swaps reported to the proxy are identical to [`EliminationMatrix::reduce`].
pub(crate) trait ParallelReduce {
    fn par_reduce(&mut self, proxy: &mut impl ColumnOps) -> Result<(), CodeError>;
}

impl EliminationMatrix {
    fn par_eliminate_below(&mut self, pivot: usize) {
        let cb = self.col_blocks;
        let chunk_size = 64 * cb;
        let start = pivot / BLOCKSIZE;
        let pivot_row = self.row(pivot)[start..cb].to_vec();

        let end = self.rows * cb;
        self.data[((pivot + 1) * cb)..end]
            .par_chunks_mut(chunk_size)
            .for_each(|target_chunk| {
                for row_start in (0..target_chunk.len()).step_by(cb) {
                    if target_chunk.bit(BLOCKSIZE * row_start + pivot) {
                        target_chunk.xor_in(&pivot_row, row_start + start);
                    }
                }
            });
    }
}

impl ParallelReduce for EliminationMatrix {
    fn par_reduce(&mut self, proxy: &mut impl ColumnOps) -> Result<(), CodeError> {
        self.reduce_helper(proxy, Self::par_eliminate_below)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elimination::test::{assert_systematic, matrix, random_rows};
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn matches_serial() {
        let mut rng = SmallRng::seed_from_u64(3);
        for (rows_n, cols) in [(10, 12), (100, 70), (300, 200), (150, 700)] {
            let rows = random_rows(&mut rng, rows_n, cols);

            let mut serial = EliminationMatrix::from_rows(cols, &rows);
            let mut serial_perm: Vec<usize> = (0..cols).collect();
            serial.reduce(&mut serial_perm).unwrap();

            let mut par = EliminationMatrix::from_rows(cols, &rows);
            let mut par_perm: Vec<usize> = (0..cols).collect();
            par.par_reduce(&mut par_perm).unwrap();

            assert_systematic(&par);
            assert_eq!(par_perm, serial_perm);
            assert_eq!(par.into_rows(), serial.into_rows());
        }
    }

    #[test]
    fn no_pivot_fails() {
        let mut m = matrix(&["000", "111"]);
        assert_eq!(
            m.par_reduce(&mut ()),
            Err(CodeError::NotSystematic { row: 0 })
        );
    }
}
