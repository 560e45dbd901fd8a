//! `gf2code` represents binary linear codes and reduces arbitrary sets of generator rows to a
//! systematic generator matrix. Some features include:
//! - fixed-length vectors over GF(2) with range-checked bit access and XOR addition
//! - validation of candidate generator rows as they are added
//! - Gaussian elimination with column pivoting that drops linearly dependent rows
//! - the column permutation applied during elimination, recorded on the result
//! - optional parallel row elimination using [rayon](https://docs.rs/rayon)
//!
//! The main data structures provided by this crate are:
//! - [`BitVector`]: a codeword of fixed length, stored in 64-bit blocks
//! - [`GeneratorMatrixBuilder`]: accumulates rows and runs the reduction
//! - [`GeneratorMatrix`]: the immutable, reduced result

#![allow(
    clippy::needless_range_loop,
    clippy::uninlined_format_args,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]
pub mod bitvec;
pub mod bitvector;
mod elimination;
pub mod error;
pub mod generator_matrix;

pub use bitvec::{BitBlock, BitRange, BitVec};
pub use bitvector::BitVector;
pub use error::{CodeError, ErrorKind};
pub use generator_matrix::{GeneratorMatrix, GeneratorMatrixBuilder};
