//! Set of lattice points keyed on c-vector content.
//!
//! An open hash set with chaining: the table holds entry indices, each
//! entry links to the next in its chain, and all keys live in one flat
//! arena. The table is a power of two at least twice the entry
//! capacity, so chains stay short. Used to deduplicate probes within a
//! shell; cleared between shells.

use crate::error::{LatticeError, Result};
use crate::hash;
use crate::scalars::CElem;

const NIL: u32 = u32::MAX;

pub struct PointSet {
    dimp: usize,
    capacity: usize,
    mask: usize,
    /// Flat key arena: entry `i` occupies `i * dimp .. (i+1) * dimp`.
    keys: Vec<CElem>,
    /// Chain link per entry.
    next: Vec<u32>,
    /// Chain heads, `table.len()` is a power of two.
    table: Vec<u32>,
}

impl PointSet {
    /// Create a set for c-vectors of `dimp` elements holding at most
    /// `capacity` entries.
    pub fn new(dimp: usize, capacity: usize) -> Result<Self> {
        let table_size = (capacity.max(1) << 1).next_power_of_two();

        let mut keys = Vec::new();
        keys.try_reserve_exact(capacity * dimp)?;
        let mut next = Vec::new();
        next.try_reserve_exact(capacity)?;
        let mut table = Vec::new();
        table.try_reserve_exact(table_size)?;
        table.resize(table_size, NIL);

        Ok(Self {
            dimp,
            capacity,
            mask: table_size - 1,
            keys,
            next,
            table,
        })
    }

    /// Number of points currently in the set.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Make the set empty, keeping the allocations.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.next.clear();
        self.table.fill(NIL);
    }

    /// Insert a c-vector. Returns `Ok(true)` if it was new, `Ok(false)`
    /// if already present, and an internal error if the entry capacity
    /// is exhausted.
    pub fn insert(&mut self, c: &[CElem]) -> Result<bool> {
        debug_assert_eq!(c.len(), self.dimp);

        let slot = (hash::hash(c) as usize) & self.mask;

        let mut entry = self.table[slot];
        while entry != NIL {
            let start = entry as usize * self.dimp;
            if &self.keys[start..start + self.dimp] == c {
                return Ok(false);
            }
            entry = self.next[entry as usize];
        }

        let id = self.next.len();
        if id >= self.capacity {
            return Err(LatticeError::Internal("point set capacity exhausted"));
        }

        self.keys.extend_from_slice(c);
        self.next.push(self.table[slot]);
        self.table[slot] = id as u32;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_new_and_duplicate() {
        let mut set = PointSet::new(3, 8).unwrap();
        assert!(set.insert(&[0, 0, 0]).unwrap());
        assert!(set.insert(&[1, -1, 0]).unwrap());
        assert!(!set.insert(&[0, 0, 0]).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut set = PointSet::new(2, 4).unwrap();
        set.insert(&[5, -5]).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(set.insert(&[5, -5]).unwrap());
    }

    #[test]
    fn capacity_exhaustion_is_an_internal_error() {
        let mut set = PointSet::new(2, 2).unwrap();
        set.insert(&[0, 0]).unwrap();
        set.insert(&[1, -1]).unwrap();
        assert_eq!(
            set.insert(&[2, -2]).unwrap_err(),
            LatticeError::Internal("point set capacity exhausted")
        );
    }

    #[test]
    fn survives_colliding_chains() {
        // Tiny table forces chains; correctness must not depend on the
        // hash spreading keys.
        let mut set = PointSet::new(2, 64).unwrap();
        for i in 0..64 {
            assert!(set.insert(&[i, -i]).unwrap(), "first insert of {}", i);
        }
        for i in 0..64 {
            assert!(!set.insert(&[i, -i]).unwrap(), "re-insert of {}", i);
        }
    }
}
