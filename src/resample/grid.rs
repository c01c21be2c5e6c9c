//! Contiguous daily date grid.

use chrono::NaiveDate;

/// Every calendar day in `[start, end]`, addressed by offset from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayGrid {
    start: NaiveDate,
    end: NaiveDate,
}

impl DayGrid {
    /// Grid spanning the given bounds (swapped if given in reverse).
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some((date - self.start).num_days() as usize)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.len())
    }
}
