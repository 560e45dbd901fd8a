use crate::bitvector::BitVector;
use crate::elimination::{parallel::ParallelReduce, EliminationMatrix};
use crate::error::CodeError;
use std::fmt;
use tracing::debug;

/// A generator matrix in systematic form, as produced by
/// [`GeneratorMatrixBuilder::build_systematic`]
///
/// The `dimension()` rows are linearly independent codewords of length `length()`. Row `p` has
/// a 1 in column `p` and 0s in every column before it.
///
/// Reduction may permute codeword coordinates. The rows are stored in the permuted coordinates,
/// and [`GeneratorMatrix::column_permutation`] records which original coordinate ended up in
/// each column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorMatrix {
    length: usize,
    rows: Vec<BitVector>,
    column_permutation: Vec<usize>,
}

impl GeneratorMatrix {
    /// The codeword length `n`
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The dimension `k` of the code, i.e. the number of rows
    #[inline]
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Returns row `index`
    ///
    /// # Errors
    ///
    /// [`CodeError::IndexOutOfRange`] if `index >= dimension()`.
    pub fn row(&self, index: usize) -> Result<&BitVector, CodeError> {
        self.rows.get(index).ok_or(CodeError::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    #[inline]
    pub fn rows(&self) -> &[BitVector] {
        &self.rows
    }

    /// Entry `j` is the coordinate of the input rows that was moved to column `j`
    #[inline]
    pub fn column_permutation(&self) -> &[usize] {
        &self.column_permutation
    }

    /// Moves the coordinates of `codeword` back to the order of the rows given to the builder
    ///
    /// # Errors
    ///
    /// [`CodeError::LengthMismatch`] if `codeword` does not have length `length()`.
    pub fn to_original_coordinates(&self, codeword: &BitVector) -> Result<BitVector, CodeError> {
        if codeword.len() != self.length {
            return Err(CodeError::LengthMismatch {
                expected: self.length,
                found: codeword.len(),
            });
        }
        let mut out = BitVector::new(self.length)?;
        for j in codeword.ones() {
            out.set(self.column_permutation[j])?;
        }
        Ok(out)
    }

    /// Encodes a message of `dimension()` bits as the sum of the rows it selects
    ///
    /// The codeword is in the permuted coordinates of the matrix.
    ///
    /// # Errors
    ///
    /// [`CodeError::LengthMismatch`] if `message` does not have length `dimension()`.
    pub fn encode(&self, message: &BitVector) -> Result<BitVector, CodeError> {
        if message.len() != self.dimension() {
            return Err(CodeError::LengthMismatch {
                expected: self.dimension(),
                found: message.len(),
            });
        }
        let mut codeword = BitVector::new(self.length)?;
        for i in message.ones() {
            codeword.add_in_place(&self.rows[i])?;
        }
        Ok(codeword)
    }

    /// Give the rate of information transfer.
    /// For a code of dimension `k` and codewords of length `n` this is `k/n`.
    pub fn rate(&self) -> f64 {
        self.dimension() as f64 / self.length as f64
    }
}

/// Rows in canonical form, one per line
impl fmt::Display for GeneratorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Collects candidate generator rows and reduces them to a [`GeneratorMatrix`]
///
/// Rows are checked as they are added; all of the elimination work happens in
/// [`GeneratorMatrixBuilder::build_systematic`], which consumes the builder.
///
/// ```
/// use gf2code::{BitVector, GeneratorMatrixBuilder};
///
/// let g = GeneratorMatrixBuilder::new(4)
///     .add_generator_row("1000".parse::<BitVector>()?)?
///     .add_generator_row("0100".parse::<BitVector>()?)?
///     .add_generator_row("1100".parse::<BitVector>()?)?
///     .build_systematic()?;
/// assert_eq!(g.dimension(), 2);
/// assert_eq!(g.to_string(), "1000\n0100");
/// # Ok::<(), gf2code::CodeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorMatrixBuilder {
    codeword_length: usize,
    generators: Vec<BitVector>,
    parallel: bool,
}

impl GeneratorMatrixBuilder {
    pub fn new(codeword_length: usize) -> Self {
        GeneratorMatrixBuilder {
            codeword_length,
            generators: vec![],
            parallel: false,
        }
    }

    /// Run the row eliminations on the rayon thread pool. Off by default.
    ///
    /// The resulting matrix is the same either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[inline]
    pub fn codeword_length(&self) -> usize {
        self.codeword_length
    }

    /// Number of rows accepted so far
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.generators.len()
    }

    /// Appends a candidate generator row
    ///
    /// # Errors
    ///
    /// [`CodeError::LengthMismatch`] if `codeword` does not have the configured length, then
    /// [`CodeError::ZeroGenerator`] if it is all zeros.
    pub fn add_generator_row(mut self, codeword: BitVector) -> Result<Self, CodeError> {
        if codeword.len() != self.codeword_length {
            return Err(CodeError::LengthMismatch {
                expected: self.codeword_length,
                found: codeword.len(),
            });
        }
        if codeword.is_zero() {
            return Err(CodeError::ZeroGenerator);
        }
        self.generators.push(codeword);
        Ok(self)
    }

    /// Appends every row of `codewords`, stopping at the first one that is rejected
    pub fn add_generator_rows(
        self,
        codewords: impl IntoIterator<Item = BitVector>,
    ) -> Result<Self, CodeError> {
        codewords
            .into_iter()
            .try_fold(self, |builder, cw| builder.add_generator_row(cw))
    }

    /// Reduces the accumulated rows to an independent set in systematic form
    ///
    /// Rows that are linear combinations of earlier rows are dropped, so the dimension of the
    /// result may be smaller than [`GeneratorMatrixBuilder::num_rows`]. Columns are swapped as
    /// needed to find pivots; see [`GeneratorMatrix::column_permutation`].
    ///
    /// # Errors
    ///
    /// [`CodeError::NoGenerators`] if no rows were added, and [`CodeError::NotSystematic`] if
    /// some row has no pivot column.
    pub fn build_systematic(self) -> Result<GeneratorMatrix, CodeError> {
        if self.generators.is_empty() {
            return Err(CodeError::NoGenerators);
        }

        let mut m = EliminationMatrix::from_rows(self.codeword_length, &self.generators);
        let mut column_permutation: Vec<usize> = (0..self.codeword_length).collect();
        if self.parallel {
            m.par_reduce(&mut column_permutation)?;
        } else {
            m.reduce(&mut column_permutation)?;
        }

        debug!(
            length = m.cols(),
            added = self.generators.len(),
            dimension = m.rows(),
            "built systematic generator matrix"
        );

        Ok(GeneratorMatrix {
            length: self.codeword_length,
            rows: m.into_rows(),
            column_permutation,
        })
    }
}
