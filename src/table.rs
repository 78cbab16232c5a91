//! Sparse frequency table over 22-bit keys.
//!
//! A key is split into three bytes and each level of the tree is a 256-wide
//! array indexed by one of them, most significant byte first. Walking the
//! slots in index order therefore visits keys in ascending numeric order.
//! Level-1 nodes and leaves are boxed and only allocated when an increment
//! first passes through them, so memory grows with the number of distinct
//! 256-key blocks actually seen rather than with the key space.

use std::iter::FusedIterator;

/// Keys are masked to 22 bits, enough for every Unicode scalar value.
pub const KEY_MASK: u32 = 0x3F_FFFF;

const RADIX: usize = 256;

type Leaf = [u64; RADIX];
type Level1 = [Option<Box<Leaf>>; RADIX];

/// Occurrence counts keyed by byte or code point value.
pub struct FreqTable {
    root: Box<[Option<Box<Level1>>; RADIX]>,
}

#[inline]
fn split(key: u32) -> (usize, usize, usize) {
    let key = key & KEY_MASK;
    (
        ((key >> 16) & 0xFF) as usize,
        ((key >> 8) & 0xFF) as usize,
        (key & 0xFF) as usize,
    )
}

#[inline]
fn join(hi: usize, mid: usize, lo: usize) -> u32 {
    ((hi << 16) | (mid << 8) | lo) as u32
}

impl FreqTable {
    pub fn new() -> Self {
        Self {
            root: Box::new(std::array::from_fn(|_| None)),
        }
    }

    /// Add one occurrence of `key`, materializing the path to its leaf.
    pub fn increment(&mut self, key: u32) {
        let (hi, mid, lo) = split(key);
        let level1 = self.root[hi].get_or_insert_with(|| Box::new(std::array::from_fn(|_| None)));
        let leaf = level1[mid].get_or_insert_with(|| Box::new([0; RADIX]));
        leaf[lo] += 1;
    }

    /// Current count for `key`; absent nodes read as zero.
    pub fn get(&self, key: u32) -> u64 {
        let (hi, mid, lo) = split(key);
        self.root[hi]
            .as_ref()
            .and_then(|level1| level1[mid].as_ref())
            .map_or(0, |leaf| leaf[lo])
    }

    /// Visit every nonzero `(key, count)` pair in ascending key order.
    ///
    /// Each call starts a fresh traversal of the current contents.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            table: self,
            hi: 0,
            mid: 0,
            lo: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Number of keys with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.iter().count()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| count).sum()
    }

    /// Number of allocated leaves.
    pub fn leaf_nodes(&self) -> usize {
        self.root
            .iter()
            .flatten()
            .map(|level1| level1.iter().flatten().count())
            .sum()
    }
}

impl Default for FreqTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<u32> for FreqTable {
    fn extend<I: IntoIterator<Item = u32>>(&mut self, keys: I) {
        for key in keys {
            self.increment(key);
        }
    }
}

impl FromIterator<u32> for FreqTable {
    fn from_iter<I: IntoIterator<Item = u32>>(keys: I) -> Self {
        let mut table = Self::new();
        table.extend(keys);
        table
    }
}

impl<'a> IntoIterator for &'a FreqTable {
    type Item = (u32, u64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Ascending traversal over the nonzero entries of a [`FreqTable`].
pub struct Iter<'a> {
    table: &'a FreqTable,
    hi: usize,
    mid: usize,
    lo: usize,
}

impl Iterator for Iter<'_> {
    type Item = (u32, u64);

    fn next(&mut self) -> Option<(u32, u64)> {
        let table = self.table;
        while self.hi < RADIX {
            let Some(level1) = table.root[self.hi].as_deref() else {
                self.hi += 1;
                continue;
            };
            while self.mid < RADIX {
                let Some(leaf) = level1[self.mid].as_deref() else {
                    self.mid += 1;
                    continue;
                };
                while self.lo < RADIX {
                    let lo = self.lo;
                    self.lo += 1;
                    if leaf[lo] != 0 {
                        return Some((join(self.hi, self.mid, lo), leaf[lo]));
                    }
                }
                self.lo = 0;
                self.mid += 1;
            }
            self.mid = 0;
            self.hi += 1;
        }
        None
    }
}

impl FusedIterator for Iter<'_> {}
