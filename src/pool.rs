// Fixed-capacity spark arena.
// Live sparks always sit in [0, len); everything past len is recycled storage.

use crate::spark::Spark;

pub const DEFAULT_MAX_SPARKS: usize = 1_000_000;

pub struct SparkPool {
    sparks: Vec<Spark>,
    len: usize,
}

impl SparkPool {
    /// Allocate every record up front; spawning never allocates afterwards.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparks: vec![Spark::default(); capacity],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.sparks.len()
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Append a spark. Returns false (and drops it) when the pool is full.
    #[inline]
    pub fn push(&mut self, spark: Spark) -> bool {
        if self.len == self.capacity() {
            return false;
        }
        self.sparks[self.len] = spark;
        self.len += 1;
        true
    }

    /// O(1) removal: the last live spark moves into `index`. Order is not kept.
    pub fn swap_remove(&mut self, index: usize) {
        debug_assert!(index < self.len);
        if index >= self.len {
            return;
        }
        self.len -= 1;
        self.sparks[index] = self.sparks[self.len];
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Spark> {
        self.as_slice().get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Spark> {
        self.as_mut_slice().get_mut(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Spark] {
        &self.sparks[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Spark] {
        &mut self.sparks[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}
