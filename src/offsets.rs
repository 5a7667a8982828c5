//! Generation of block-aligned read offsets within a target.

use crate::{error::Error, options::Pattern};
use rand::Rng;

/// An endless stream of read offsets.
///
/// Every offset lies in `0..size - block_size`, so a full block can be read
/// at it. Random offsets are multiples of the block size; the sequential scan
/// starts block-aligned and advances by one block, wrapping modulo the valid
/// range.
#[derive(Debug)]
pub(crate) struct Offsets<'r, R: Rng> {
    rng: &'r mut R,
    span: u64,
    block_size: u64,
    cursor: Option<u64>,
}

impl<'r, R: Rng> Offsets<'r, R> {
    pub(crate) fn new(
        size: u64,
        block_size: u64,
        pattern: Pattern,
        rng: &'r mut R,
    ) -> Result<Self, Error> {
        let span = size
            .checked_sub(block_size)
            .filter(|&span| span > 0)
            .ok_or(Error::TooSmall { size, block_size })?;
        let mut offsets = Self {
            rng,
            span,
            block_size,
            cursor: None,
        };
        if pattern == Pattern::Sequential {
            offsets.cursor = Some(offsets.random_offset());
        }
        Ok(offsets)
    }

    fn random_offset(&mut self) -> u64 {
        self.rng.gen_range(0..self.span) / self.block_size * self.block_size
    }
}

impl<R: Rng> Iterator for Offsets<'_, R> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        match self.cursor {
            None => Some(self.random_offset()),
            Some(pos) => {
                self.cursor = Some((pos + self.block_size) % self.span);
                Some(pos)
            }
        }
    }
}
