use crate::bitvec::{min_blocks, tail_mask, BitRange, BitVec};
use crate::error::CodeError;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

/// A fixed-length vector over GF(2), e.g. a codeword
///
/// Bits are packed into [`crate::BitBlock`]s. Positions at or beyond `len()` in the last block
/// are always 0, so comparisons and XOR can work a whole block at a time.
///
/// All index-taking methods except [`BitVector::bit`] are range-checked and return a
/// [`CodeError`] instead of panicking.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    bits: BitVec,
}

#[allow(clippy::len_without_is_empty)]
impl BitVector {
    /// Creates a new all-zero `BitVector` of the given length
    ///
    /// # Errors
    ///
    /// [`CodeError::ZeroLength`] if `length` is 0.
    pub fn new(length: usize) -> Result<Self, CodeError> {
        if length == 0 {
            return Err(CodeError::ZeroLength);
        }
        Ok(BitVector {
            len: length,
            bits: BitVec::zeros(min_blocks(length)),
        })
    }

    /// Builds a `BitVector` from a function `f` that determines the value of each bit
    pub fn build(length: usize, f: impl FnMut(usize) -> bool) -> Result<Self, CodeError> {
        if length == 0 {
            return Err(CodeError::ZeroLength);
        }
        Ok(BitVector {
            len: length,
            bits: (0..length).map(f).collect(),
        })
    }

    /// Creates a new `BitVector` from a slice of bools
    pub fn from_bools(data: &[bool]) -> Result<Self, CodeError> {
        Self::build(data.len(), |i| data[i])
    }

    /// Creates a new random `BitVector` of specified length
    pub fn random(rng: &mut impl rand::Rng, length: usize) -> Result<Self, CodeError> {
        let mut v = Self::new(length)?;
        v.bits = BitVec::random(rng, min_blocks(length));
        v.mask_tail();
        Ok(v)
    }

    /// Wraps packed blocks of a row, clearing anything past `length`
    pub(crate) fn from_blocks(length: usize, blocks: &BitRange) -> Self {
        let mut v = BitVector {
            len: length,
            bits: blocks[0..min_blocks(length)].to_vec(),
        };
        v.mask_tail();
        v
    }

    #[inline]
    fn mask_tail(&mut self) {
        let last = self.bits.len() - 1;
        self.bits[last] &= tail_mask(self.len);
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<(), CodeError> {
        if index < self.len {
            Ok(())
        } else {
            Err(CodeError::IndexOutOfRange {
                index,
                len: self.len,
            })
        }
    }

    #[inline]
    fn check_len(&self, other: &BitVector) -> Result<(), CodeError> {
        if self.len == other.len {
            Ok(())
        } else {
            Err(CodeError::LengthMismatch {
                expected: self.len,
                found: other.len,
            })
        }
    }

    /// Returns the length of the vector
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Gets the bit at position `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` lies beyond the last block. Use [`BitVector::get`] for a checked read.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        self.bits.bit(i)
    }

    /// Gets the bit at position `index`
    pub fn get(&self, index: usize) -> Result<bool, CodeError> {
        self.check_index(index)?;
        Ok(self.bits.bit(index))
    }

    /// Sets the bit at position `index` to 1
    pub fn set(&mut self, index: usize) -> Result<(), CodeError> {
        self.assign(index, true)
    }

    /// Sets the bit at position `index` to 0
    pub fn clear(&mut self, index: usize) -> Result<(), CodeError> {
        self.assign(index, false)
    }

    /// Sets the bit at position `index` to `value`
    pub fn assign(&mut self, index: usize, value: bool) -> Result<(), CodeError> {
        self.check_index(index)?;
        self.bits.set_bit(index, value);
        Ok(())
    }

    /// Returns the sum (XOR) of `self` and `other` as a new vector
    ///
    /// # Errors
    ///
    /// [`CodeError::LengthMismatch`] if the lengths differ.
    pub fn add(&self, other: &BitVector) -> Result<BitVector, CodeError> {
        let mut result = self.clone();
        result.add_in_place(other)?;
        Ok(result)
    }

    /// XORs `other` into this vector
    ///
    /// # Errors
    ///
    /// [`CodeError::LengthMismatch`] if the lengths differ. `self` is unchanged in that case.
    pub fn add_in_place(&mut self, other: &BitVector) -> Result<(), CodeError> {
        self.check_len(other)?;
        self.bits.xor_in(&other.bits, 0);
        Ok(())
    }

    /// Checks if the vector consists of all zero bits
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    /// Iterates over the positions of the 1 bits, in increasing order
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .take(self.len)
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
    }

    /// Returns the packed blocks backing this vector
    #[inline]
    pub fn as_bits(&self) -> &BitRange {
        &self.bits
    }
}

/// Formats the vector as `len()` characters `'0'` or `'1'`, in index order
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bits.iter().take(self.len) {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Parses the format produced by [`fmt::Display`]
impl FromStr for BitVector {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bools = Vec::with_capacity(s.len());
        for (position, ch) in s.chars().enumerate() {
            match ch {
                '0' => bools.push(false),
                '1' => bools.push(true),
                _ => return Err(CodeError::InvalidDigit { ch, position }),
            }
        }
        Self::from_bools(&bools)
    }
}

/// Allows indexing into the vector to return the bit at `index`
///
/// `v[i]` is equivalent to `v.bit(i)`.
impl Index<usize> for BitVector {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        if self.bit(index) {
            &true
        } else {
            &false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use rand::{rngs::SmallRng, SeedableRng};

    fn bv(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    #[test]
    fn new_is_zero() {
        for len in [1, 5, 63, 64, 65, 200] {
            let v = BitVector::new(len).unwrap();
            assert_eq!(v.len(), len);
            assert!(v.is_zero());
            assert_eq!(v.to_string(), "0".repeat(len));
        }
    }

    #[test]
    fn zero_length_rejected() {
        assert_eq!(BitVector::new(0), Err(CodeError::ZeroLength));
        assert_eq!(BitVector::from_bools(&[]), Err(CodeError::ZeroLength));
        assert_eq!("".parse::<BitVector>(), Err(CodeError::ZeroLength));
        assert_eq!(
            BitVector::new(0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn set_clear_get() {
        let mut rng = SmallRng::seed_from_u64(1);
        for len in [1, 31, 32, 33, 64, 100] {
            let mut v = BitVector::random(&mut rng, len).unwrap();
            for i in 0..len {
                v.set(i).unwrap();
                assert_eq!(v.get(i), Ok(true));
                v.clear(i).unwrap();
                assert_eq!(v.get(i), Ok(false));
                v.assign(i, true).unwrap();
                assert!(v[i]);
            }
            assert_eq!(v.to_string(), "1".repeat(len));
        }
    }

    #[test]
    fn index_out_of_range() {
        let mut v = BitVector::new(10).unwrap();
        let err = CodeError::IndexOutOfRange { index: 10, len: 10 };
        assert_eq!(v.get(10), Err(err.clone()));
        assert_eq!(v.set(10), Err(err.clone()));
        assert_eq!(v.clear(10), Err(err.clone()));
        assert_eq!(v.assign(10, true), Err(err));
        assert_eq!(v.get(10).unwrap_err().kind(), ErrorKind::IndexOutOfRange);

        // positions in the padding of the last block stay untouched
        assert!(v.is_zero());
    }

    #[test]
    fn add_is_self_inverse() {
        let mut rng = SmallRng::seed_from_u64(2);
        for len in [1, 10, 64, 129] {
            let a = BitVector::random(&mut rng, len).unwrap();
            let b = BitVector::random(&mut rng, len).unwrap();
            assert_eq!(a.add(&b).unwrap().add(&b).unwrap(), a);
            assert!(a.add(&a).unwrap().is_zero());
            assert_eq!(a.add(&a).unwrap().len(), len);
        }
    }

    #[test]
    fn add_matches_bitwise_xor() {
        let a = bv("1100101");
        let b = bv("1010011");
        assert_eq!(a.add(&b).unwrap().to_string(), "0110110");

        // add leaves its receiver alone
        assert_eq!(a.to_string(), "1100101");
    }

    #[test]
    fn add_in_place_matches_add() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut a = BitVector::random(&mut rng, 77).unwrap();
        let b = BitVector::random(&mut rng, 77).unwrap();
        let expected = a.add(&b).unwrap();
        a.add_in_place(&b).unwrap();
        assert_eq!(a, expected);
    }

    #[test]
    fn add_length_mismatch() {
        let mut a = bv("101");
        let b = bv("1010");
        let err = CodeError::LengthMismatch {
            expected: 3,
            found: 4,
        };
        assert_eq!(a.add(&b), Err(err.clone()));
        assert_eq!(a.add_in_place(&b), Err(err));
        assert_eq!(a.to_string(), "101");
    }

    #[test]
    fn clone_is_independent() {
        let a = bv("10010");
        let mut c = a.clone();
        assert_eq!(a, c);
        c.set(1).unwrap();
        c.clear(0).unwrap();
        assert_eq!(a.to_string(), "10010");
        assert_eq!(c.to_string(), "01010");
        assert_ne!(a, c);
    }

    #[test]
    fn display_form() {
        let mut rng = SmallRng::seed_from_u64(4);
        for len in [1, 7, 64, 65, 300] {
            let v = BitVector::random(&mut rng, len).unwrap();
            let s = v.to_string();
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c == '0' || c == '1'));
            assert_eq!(s.parse::<BitVector>().unwrap(), v);
        }

        let mut v = BitVector::new(5).unwrap();
        v.set(0).unwrap();
        v.set(3).unwrap();
        assert_eq!(v.to_string(), "10010");
    }

    #[test]
    fn parse_rejects_other_characters() {
        assert_eq!(
            "10a1".parse::<BitVector>(),
            Err(CodeError::InvalidDigit {
                ch: 'a',
                position: 2
            })
        );
    }

    #[test]
    fn random_keeps_padding_clear() {
        let mut rng = SmallRng::seed_from_u64(5);
        let v = BitVector::random(&mut rng, 70).unwrap();
        assert_eq!(v.as_bits().iter().skip(70).filter(|&b| b).count(), 0);
    }

    #[test]
    fn equality_compares_length_and_bits() {
        let a = BitVector::build(3, |i| i == 1).unwrap();
        let b = bv("010");
        assert_eq!(a, b);
        assert_ne!(bv("010"), bv("0100"));
    }

    #[test]
    fn ones_positions() {
        let v = bv("0110001");
        assert_eq!(v.ones().collect::<Vec<_>>(), vec![1, 2, 6]);
        assert_eq!(BitVector::new(3).unwrap().ones().count(), 0);
    }
}
