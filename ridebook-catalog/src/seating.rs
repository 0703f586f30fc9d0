use serde::{Deserialize, Serialize};

/// Default seats per row (2-2 coach configuration)
pub const DEFAULT_ROW_WIDTH: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatPosition {
    Window,
    Aisle,
}

/// Seat numbering for a vehicle: seats 1..=total laid out left to right, `row_width` per row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatLayout {
    total: u32,
    row_width: u32,
}

impl SeatLayout {
    pub fn new(total: u32, row_width: u32) -> Self {
        Self { total, row_width: row_width.max(1) }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn row_width(&self) -> u32 {
        self.row_width
    }

    /// The outermost columns are windows, everything else is aisle
    pub fn position(&self, seat: u32) -> SeatPosition {
        let column = seat.saturating_sub(1) % self.row_width;
        if column == 0 || column == self.row_width - 1 {
            SeatPosition::Window
        } else {
            SeatPosition::Aisle
        }
    }

    pub fn row_count(&self) -> u32 {
        self.total.div_ceil(self.row_width)
    }

    /// Seat numbers grouped by row; the last row may be short
    pub fn rows(&self) -> Vec<Vec<u32>> {
        (0..self.row_count())
            .map(|row| {
                let start = row * self.row_width + 1;
                let end = (start + self.row_width - 1).min(self.total);
                (start..=end).collect()
            })
            .collect()
    }
}
