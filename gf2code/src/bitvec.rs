use rand::Rng;
use rayon::prelude::*;
use ref_cast::RefCast;
use std::ops::{Deref, DerefMut, Index, IndexMut, Range};

/// A block of bits. This is an alias for [`u64`]
pub type BitBlock = u64;

/// Number of bits in a [`BitBlock`]
pub const BLOCKSIZE: usize = 64;

/// Bitwise AND with this constant to set most signficant bit to zero
pub const MSB_OFF: BitBlock = 0x7fffffffffffffff;

/// Bitwise OR with this constant to set most signficant bit to one
pub const MSB_ON: BitBlock = 0x8000000000000000;

/// Returns the minimum number of [`BitBlock`]s required to store the given number of bits.
#[inline]
pub fn min_blocks(bits: usize) -> usize {
    bits / BLOCKSIZE + if bits % BLOCKSIZE == 0 { 0 } else { 1 }
}

/// Returns a mask keeping only the bits of the last block that fall below `bits`.
///
/// Bits are stored most significant first, so for `bits % BLOCKSIZE == r > 0` this is the top
/// `r` bits of a block. If `bits` is a multiple of [`BLOCKSIZE`] the whole block is kept.
#[inline]
pub fn tail_mask(bits: usize) -> BitBlock {
    match bits % BLOCKSIZE {
        0 => BitBlock::MAX,
        r => BitBlock::MAX << (BLOCKSIZE - r),
    }
}

/// A vector of bits, stored as a vector of [`BitBlock`]s.
///
/// Bit `i` lives in block `i / BLOCKSIZE`, counting from the most significant bit. `BitVec`
/// knows nothing about a logical length: callers that need one (e.g. [`crate::BitVector`])
/// keep the padding bits of the last block at zero.
///
/// # Examples
///
/// ```
/// use gf2code::bitvec::*;
///
/// let mut bv = BitVec::zeros(2);
/// bv.set_bit(70, true);
/// assert!(bv.bit(70));
/// assert_eq!(bv.first_one_between(0, 128), Some(70));
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BitVec(Vec<BitBlock>);

/// A range of bits, represented as a slice of [`BitBlock`]s.
#[derive(RefCast, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct BitRange([BitBlock]);

/// Iterator over the bits in a [`BitRange`].
///
/// Yields each bit as a `bool`, starting from the most significant bit of the first block.
pub struct BitRangeIter<'a> {
    inner: std::slice::Iter<'a, BitBlock>,
    c: usize,
    block: BitBlock,
}

impl Iterator for BitRangeIter<'_> {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.c == BLOCKSIZE {
            self.block = self.inner.next().copied()?;
            self.c = 0;
        }
        let bit = self.block & MSB_ON == MSB_ON;
        self.block <<= 1;
        self.c += 1;
        Some(bit)
    }
}

#[allow(clippy::len_without_is_empty)]
impl BitRange {
    /// Returns a copy of the range as a [`BitVec`].
    #[inline]
    pub fn to_vec(&self) -> BitVec {
        self.0.to_vec().into()
    }

    /// Divides the range into mutable parallel chunks of `chunk_size` blocks.
    #[inline]
    pub fn par_chunks_mut(
        &mut self,
        chunk_size: usize,
    ) -> impl IndexedParallelIterator<Item = &mut BitRange> {
        self.0
            .par_chunks_mut(chunk_size)
            .map(|x| BitRange::ref_cast_mut(x))
    }

    /// Returns an iterator over the [`BitBlock`]s in this range.
    #[inline]
    pub fn block_iter(&self) -> impl Iterator<Item = BitBlock> + '_ {
        self.0.iter().copied()
    }

    /// Returns an iterator over all bits in this range as `bool`s, padding included.
    #[inline]
    pub fn iter(&self) -> BitRangeIter<'_> {
        BitRangeIter {
            inner: self.0.iter(),
            c: BLOCKSIZE,
            block: 0,
        }
    }

    /// True if every block is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Returns the value of the bit at the specified index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        let block_index = index / BLOCKSIZE;
        let bit_index = (index % BLOCKSIZE) as u32;
        let block = self.0[block_index].rotate_left(bit_index);
        block & MSB_ON == MSB_ON
    }

    /// Sets the bit at the given index to the provided value.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[inline]
    pub fn set_bit(&mut self, index: usize, value: bool) {
        let block_index = index / BLOCKSIZE;
        let bit_index = (index % BLOCKSIZE) as u32;
        let mut block = self.0[block_index].rotate_left(bit_index);
        if value {
            block |= MSB_ON;
        } else {
            block &= MSB_OFF;
        }
        self.0[block_index] = block.rotate_right(bit_index);
    }

    /// Exchanges the bits at positions `i` and `j`.
    #[inline]
    pub fn swap_bits(&mut self, i: usize, j: usize) {
        let (bi, bj) = (self.bit(i), self.bit(j));
        if bi != bj {
            self.set_bit(i, bj);
            self.set_bit(j, bi);
        }
    }

    /// Returns the position of the first 1-bit in the bit interval `from..to`, or `None` if the
    /// interval holds only zeros.
    pub fn first_one_between(&self, from: usize, to: usize) -> Option<usize> {
        if from >= to {
            return None;
        }
        let first_block = from / BLOCKSIZE;
        let last_block = min_blocks(to);
        for i in first_block..last_block {
            let mut block = self.0[i];
            if i == first_block {
                block &= BitBlock::MAX >> (from % BLOCKSIZE);
            }
            if i == last_block - 1 {
                block &= tail_mask(to);
            }
            if block != 0 {
                return Some(i * BLOCKSIZE + block.leading_zeros() as usize);
            }
        }
        None
    }

    /// XORs `len` blocks starting at block `source` into the blocks starting at `target`.
    pub fn xor_range(&mut self, source: usize, target: usize, len: usize) {
        for i in 0..len {
            self.0[target + i] ^= self.0[source + i];
        }
    }

    /// XORs all of `source` into this range, starting at block `target_pos`.
    pub fn xor_in(&mut self, source: &BitRange, target_pos: usize) {
        for i in 0..source.len() {
            self.0[target_pos + i] ^= source.0[i];
        }
    }

    /// Copies `len` blocks starting at block `source` over the blocks starting at `target`.
    #[inline]
    pub fn copy_range(&mut self, source: usize, target: usize, len: usize) {
        self.0.copy_within(source..source + len, target);
    }

    /// Number of blocks in the range
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

}

impl Index<Range<usize>> for BitRange {
    type Output = BitRange;
    fn index(&self, index: Range<usize>) -> &Self::Output {
        BitRange::ref_cast(&self.0[index])
    }
}

impl IndexMut<Range<usize>> for BitRange {
    fn index_mut(&mut self, index: Range<usize>) -> &mut Self::Output {
        BitRange::ref_cast_mut(self.0.index_mut(index))
    }
}

impl Index<usize> for BitRange {
    type Output = BitBlock;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.0.index(index)
    }
}

impl IndexMut<usize> for BitRange {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.0.index_mut(index)
    }
}

impl BitVec {
    #[inline]
    pub fn zeros(num_blocks: usize) -> Self {
        BitVec(vec![0; num_blocks])
    }

    #[inline]
    pub fn random(rng: &mut impl Rng, num_blocks: usize) -> Self {
        (0..num_blocks).map(|_| rng.random::<BitBlock>()).collect()
    }

    /// Drops every block from `num_blocks` onwards
    #[inline]
    pub fn truncate(&mut self, num_blocks: usize) {
        self.0.truncate(num_blocks);
    }
}

impl From<Vec<BitBlock>> for BitVec {
    fn from(value: Vec<BitBlock>) -> Self {
        BitVec(value)
    }
}

impl FromIterator<BitBlock> for BitVec {
    fn from_iter<T: IntoIterator<Item = BitBlock>>(iter: T) -> Self {
        Vec::from_iter(iter).into()
    }
}

/// Packs bits most significant first, padding the last block with zeros
impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut v = vec![];
        let mut c = 0;
        let mut block: BitBlock = 0;
        for bit in iter {
            if bit {
                block |= MSB_ON >> c;
            }
            c += 1;
            if c == BLOCKSIZE {
                v.push(block);
                c = 0;
                block = 0;
            }
        }

        if c != 0 {
            v.push(block);
        }

        BitVec(v)
    }
}

impl Deref for BitVec {
    type Target = BitRange;
    fn deref(&self) -> &Self::Target {
        BitRange::ref_cast(&self.0)
    }
}

impl DerefMut for BitVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        BitRange::ref_cast_mut(&mut self.0)
    }
}
