use super::util::{first_of_month, is_same_date, iter_days_from, week_start, DAYS_IN_WEEK};
use super::ViewMode;
use crate::clock::Clock;
use std::ops::Index;
use thiserror::Error;
use time::{Date, Month};

/// Number of weeks shown by the month view.  Six rows are enough for any
/// month under Monday-first alignment.
const MONTH_WEEKS: usize = 6;

const MONTH_CELLS: usize = MONTH_WEEKS * DAYS_IN_WEEK;

/// One day slot of a generated grid
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) is_current_month: bool,
    pub(crate) is_today: bool,
}

/// The cells a view displays, in chronological order.  A `Grid` is never
/// modified once generated; navigation produces a new one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    mode: ViewMode,
    reference: Date,
    cells: Vec<DayCell>,
}

impl Grid {
    pub(crate) fn mode(&self) -> ViewMode {
        self.mode
    }

    pub(crate) fn reference(&self) -> Date {
        self.reference
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DayCell> {
        self.cells.iter()
    }

    /// Iterates over the rows of the grid, one week per row
    pub(crate) fn weeks(&self) -> std::slice::ChunksExact<'_, DayCell> {
        self.cells.chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn first_date(&self) -> Date {
        self.cells.first().map_or(self.reference, |c| c.date)
    }

    pub(crate) fn last_date(&self) -> Date {
        self.cells.last().map_or(self.reference, |c| c.date)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first_date() <= date && date <= self.last_date()
    }

    pub(crate) fn today(&self) -> Option<&DayCell> {
        self.cells.iter().find(|c| c.is_today)
    }

    /// The year and month the grid is focused on
    pub(crate) fn focus(&self) -> (i32, Month) {
        (self.reference.year(), self.reference.month())
    }
}

impl Index<usize> for Grid {
    type Output = DayCell;

    fn index(&self, i: usize) -> &DayCell {
        &self.cells[i]
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a DayCell;
    type IntoIter = std::slice::Iter<'a, DayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds month and week grids, flagging the cell that falls on the clock's
/// current date
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct GridGenerator<C>(C);

impl<C: Clock> GridGenerator<C> {
    pub(crate) fn new(clock: C) -> Self {
        GridGenerator(clock)
    }

    pub(crate) fn clock(&self) -> &C {
        &self.0
    }

    /// Generates the cells to display for `reference` in the given view.
    ///
    /// Fails only when part of the grid would lie outside the range of dates
    /// that `time` can represent.
    pub(crate) fn generate(&self, reference: Date, mode: ViewMode) -> Result<Grid, OutOfTimeError> {
        let today = self.0.today();
        let cells = match mode {
            ViewMode::Month => month_cells(reference, today)?,
            ViewMode::Week => week_cells(reference, today)?,
        };
        Ok(Grid {
            mode,
            reference,
            cells,
        })
    }
}

// Six full weeks starting on the Monday on or before the first of the month:
// the tail of the previous month, all of the current month, then the head of
// the next month up to the 42nd cell.
fn month_cells(reference: Date, today: Date) -> Result<Vec<DayCell>, OutOfTimeError> {
    let start = week_start(first_of_month(reference)).ok_or(OutOfTimeError)?;
    let cells = iter_days_from(start)
        .take(MONTH_CELLS)
        .map(|date| DayCell {
            date,
            is_current_month: same_month(date, reference),
            is_today: is_same_date(date, today),
        })
        .collect::<Vec<_>>();
    if cells.len() == MONTH_CELLS {
        Ok(cells)
    } else {
        Err(OutOfTimeError)
    }
}

// Monday through Sunday of the week containing `reference`.  Days flagged as
// being in the current month are those sharing `reference`'s month, even when
// most of the week lies in the other month.
fn week_cells(reference: Date, today: Date) -> Result<Vec<DayCell>, OutOfTimeError> {
    let monday = week_start(reference).ok_or(OutOfTimeError)?;
    let cells = iter_days_from(monday)
        .take(DAYS_IN_WEEK)
        .map(|date| DayCell {
            date,
            is_current_month: same_month(date, reference),
            is_today: is_same_date(date, today),
        })
        .collect::<Vec<_>>();
    if cells.len() == DAYS_IN_WEEK {
        Ok(cells)
    } else {
        Err(OutOfTimeError)
    }
}

fn same_month(d1: Date, d2: Date) -> bool {
    d1.year() == d2.year() && d1.month() == d2.month()
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
