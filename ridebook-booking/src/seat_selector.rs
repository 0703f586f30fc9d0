use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    Selected,
    Taken,
}

/// Mutable seat selection for one booking attempt.
///
/// Taken seats come from the seat inventory when the selector is built and can never
/// enter the selection.
#[derive(Debug, Clone)]
pub struct SeatSelector {
    total: u32,
    taken: BTreeSet<u32>,
    selected: BTreeSet<u32>,
}

impl SeatSelector {
    pub fn new(total: u32, taken: BTreeSet<u32>) -> Self {
        Self {
            total,
            taken,
            selected: BTreeSet::new(),
        }
    }

    /// Flip membership of `seat` in the selection.
    ///
    /// Returns the new selection when it changed. Taken seats and seats outside
    /// `1..=total` leave the selection untouched and return `None`.
    pub fn toggle(&mut self, seat: u32) -> Option<&BTreeSet<u32>> {
        if self.taken.contains(&seat) || !(1..=self.total).contains(&seat) {
            return None;
        }

        if !self.selected.remove(&seat) {
            self.selected.insert(seat);
        }
        Some(&self.selected)
    }

    /// Swap in a fresh inventory snapshot. Selected seats that became taken are dropped
    /// and returned.
    pub fn replace_taken(&mut self, taken: BTreeSet<u32>) -> Vec<u32> {
        let dropped: Vec<u32> = self.selected.intersection(&taken).copied().collect();
        for seat in &dropped {
            self.selected.remove(seat);
        }
        self.taken = taken;
        dropped
    }

    pub fn state(&self, seat: u32) -> SeatState {
        if self.taken.contains(&seat) {
            SeatState::Taken
        } else if self.selected.contains(&seat) {
            SeatState::Selected
        } else {
            SeatState::Available
        }
    }

    pub fn selected(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    pub fn taken(&self) -> &BTreeSet<u32> {
        &self.taken
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected seats in ascending order
    pub fn seat_numbers(&self) -> Vec<u32> {
        self.selected.iter().copied().collect()
    }
}
