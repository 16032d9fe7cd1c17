//! Insertion-ordered aggregate table
//!
//! Entries live in a vector in first-seen order; a hash index maps each key to
//! its slot so lookups stay O(1) no matter how many series a partition holds.

use std::{
    collections::HashMap,
    hash::{BuildHasherDefault, Hasher},
    ops::BitXor,
};

use crate::{
    record::{Reading, Sensor},
    Stat,
};

pub const INITIAL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatKey<'a> {
    pub device: &'a str,
    pub year: i32,
    pub month: u8,
    pub sensor: Sensor,
}

/// FxHash from firefox/rustc
#[derive(Default)]
pub struct FxHash {
    hash: u64,
}

impl FxHash {
    const K: u64 = 0x517cc1b727220a95;
}

impl Hasher for FxHash {
    fn write_u64(&mut self, i: u64) {
        self.hash = self.hash.rotate_left(5).bitxor(i).wrapping_mul(Self::K);
    }

    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            self.write_u64(u64::from_le_bytes(buf));
        }
    }
}

#[derive(Debug)]
pub struct AggregateTable<'a> {
    entries: Vec<(StatKey<'a>, Stat)>,
    index: HashMap<StatKey<'a>, usize, BuildHasherDefault<FxHash>>,
}

impl Default for AggregateTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> AggregateTable<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(INITIAL_CAPACITY),
            index: HashMap::with_capacity_and_hasher(INITIAL_CAPACITY, Default::default()),
        }
    }

    pub fn lookup(&self, key: &StatKey<'a>) -> Option<&Stat> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Fold one raw reading into the entry for `key`
    pub fn upsert(&mut self, key: StatKey<'a>, value: Reading) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.update(value),
            None => self.insert(key, Stat::new(value)),
        }
    }

    /// Fold a partial statistic into the entry for `key`, copying it verbatim
    /// when the key is new
    pub fn upsert_stat(&mut self, key: StatKey<'a>, stat: &Stat) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1.merge(stat),
            None => self.insert(key, *stat),
        }
    }

    fn insert(&mut self, key: StatKey<'a>, stat: Stat) {
        self.index.insert(key, self.entries.len());
        self.entries.push((key, stat));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&StatKey<'a>, &Stat)> + '_ {
        self.entries.iter().map(|(key, stat)| (key, stat))
    }
}

impl<'a> IntoIterator for AggregateTable<'a> {
    type Item = (StatKey<'a>, Stat);
    type IntoIter = std::vec::IntoIter<(StatKey<'a>, Stat)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
