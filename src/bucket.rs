use crate::Side;
use std::collections::BTreeSet;

/// Gain-indexed bucket list for the unlocked cells of one pass.
///
/// Slot `max_gain + g` holds the cells whose gain is `g`, kept separately per
/// side so the balance check can discard a whole side at once. Cells inside a
/// slot are ordered by id, which makes the lowest id win ties.
#[derive(Clone, Debug)]
pub struct GainBuckets {
    max_gain: i32,
    slots: [Vec<BTreeSet<u32>>; 2],
    /// Where each cell currently sits, `None` if it is not in any bucket.
    location: Vec<Option<(Side, usize)>>,
    len: usize,
}

impl GainBuckets {
    /// Creates empty buckets for gains in `[-max_gain, max_gain]`.
    pub fn new(max_gain: u32, cell_count: usize) -> Self {
        let slot_count = 2 * max_gain as usize + 1;
        Self {
            max_gain: max_gain as i32,
            slots: [
                vec![BTreeSet::new(); slot_count],
                vec![BTreeSet::new(); slot_count],
            ],
            location: vec![None; cell_count],
            len: 0,
        }
    }

    fn slot(&self, gain: i32) -> usize {
        debug_assert!(
            gain.abs() <= self.max_gain,
            "gain {gain} outside of bucket range"
        );
        (self.max_gain + gain) as usize
    }

    /// Puts a cell into the bucket for its gain, replacing any earlier entry.
    pub fn insert(&mut self, cell: u32, side: Side, gain: i32) {
        self.remove(cell);
        let slot = self.slot(gain);
        self.slots[side.index()][slot].insert(cell);
        self.location[cell as usize] = Some((side, slot));
        self.len += 1;
    }

    /// Takes a cell out of its bucket. Returns whether it was present.
    pub fn remove(&mut self, cell: u32) -> bool {
        match self.location[cell as usize].take() {
            Some((side, slot)) => {
                self.slots[side.index()][slot].remove(&cell);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, cell: u32) -> bool {
        self.location[cell as usize].is_some()
    }

    /// Gain recorded for a cell, if it is bucketed.
    pub fn gain_of(&self, cell: u32) -> Option<i32> {
        self.location[cell as usize].map(|(_, slot)| slot as i32 - self.max_gain)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the highest-gain cell whose side passes `movable`, preferring
    /// the lowest id among equal gains.
    pub fn pick_highest<F: Fn(Side) -> bool>(&self, movable: F) -> Option<u32> {
        let allowed = Side::BOTH.map(|s| movable(s));
        if !allowed.iter().any(|&a| a) {
            return None;
        }
        for slot in (0..self.slots[0].len()).rev() {
            let best = Side::BOTH
                .iter()
                .filter(|s| allowed[s.index()])
                .filter_map(|s| self.slots[s.index()][slot].first().copied())
                .min();
            if best.is_some() {
                return best;
            }
        }
        None
    }
}
