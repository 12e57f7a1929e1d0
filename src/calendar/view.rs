use super::grid::{Grid, GridGenerator, OutOfTimeError};
use super::util::{first_of_month, iter_days_after};
use super::ViewMode;
use crate::clock::Clock;
use thiserror::Error;
use time::{Date, Duration};
use tracing::{debug, info};

/// Viewport width, in logical pixels, at or below which only the week view is
/// offered
pub(crate) const DEFAULT_BREAKPOINT: u16 = 768;

/// The calendar's navigation state: which view is shown, the date it is
/// anchored on, and whether the viewport is too narrow for the month view.
///
/// Every change regenerates the grid from scratch.  Changes that would produce
/// an ungeneratable grid leave the state as it was.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ViewState<C> {
    current_view: ViewMode,
    current_date: Date,
    compact: bool,
    breakpoint: u16,
    grid: Grid,
    generator: GridGenerator<C>,
}

impl<C: Clock> ViewState<C> {
    pub(crate) fn new(anchor: Date, view: ViewMode, clock: C) -> Result<Self, OutOfTimeError> {
        let generator = GridGenerator::new(clock);
        let grid = generator.generate(anchor, view)?;
        Ok(ViewState {
            current_view: view,
            current_date: anchor,
            compact: false,
            breakpoint: DEFAULT_BREAKPOINT,
            grid,
            generator,
        })
    }

    pub(crate) fn with_breakpoint(mut self, breakpoint: u16) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    pub(crate) fn current_view(&self) -> ViewMode {
        self.current_view
    }

    pub(crate) fn current_date(&self) -> Date {
        self.current_date
    }

    pub(crate) fn is_compact(&self) -> bool {
        self.compact
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn today(&self) -> Date {
        self.generator.clock().today()
    }

    /// Reacts to a new viewport width.  A compact viewport forces the week
    /// view.
    pub(crate) fn resize(&mut self, width: u16) -> Result<(), OutOfTimeError> {
        let compact = width <= self.breakpoint;
        if compact != self.compact {
            debug!(width, compact, "viewport class changed");
        }
        let view = if compact {
            ViewMode::Week
        } else {
            self.current_view
        };
        self.regenerate(self.current_date, view)?;
        self.compact = compact;
        Ok(())
    }

    pub(crate) fn set_view(&mut self, view: ViewMode) -> Result<(), ViewError> {
        if self.compact && view == ViewMode::Month {
            debug!("refusing month view on a compact viewport");
            return Err(ViewError::MonthViewUnavailable);
        }
        self.regenerate(self.current_date, view)?;
        info!(%view, "switched view");
        Ok(())
    }

    /// Maps the state of a "week view" toggle to a view change
    pub(crate) fn toggle_view(&mut self, checked: bool) -> Result<(), ViewError> {
        self.set_view(if checked {
            ViewMode::Week
        } else {
            ViewMode::Month
        })
    }

    /// Moves back one month (to the first of the previous month) or one week,
    /// depending on the current view
    pub(crate) fn previous(&mut self) -> Result<(), OutOfTimeError> {
        let date = match self.current_view {
            ViewMode::Month => first_of_month(self.current_date)
                .previous_day()
                .map(first_of_month),
            ViewMode::Week => self.current_date.checked_sub(Duration::weeks(1)),
        }
        .ok_or(OutOfTimeError)?;
        self.navigate(date)
    }

    /// Moves forwards one month (to the first of the next month) or one week,
    /// depending on the current view
    pub(crate) fn next(&mut self) -> Result<(), OutOfTimeError> {
        let date = match self.current_view {
            ViewMode::Month => {
                iter_days_after(first_of_month(self.current_date)).find(|d| d.day() == 1)
            }
            ViewMode::Week => self.current_date.checked_add(Duration::weeks(1)),
        }
        .ok_or(OutOfTimeError)?;
        self.navigate(date)
    }

    pub(crate) fn jump_to(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        self.navigate(date)
    }

    pub(crate) fn jump_to_today(&mut self) -> Result<(), OutOfTimeError> {
        self.navigate(self.today())
    }

    /// Placeholder for creating an activity on `date`; for now the request is
    /// only logged.
    pub(crate) fn add_activity(&self, date: Date) {
        info!(%date, "add activity requested");
    }

    fn navigate(&mut self, date: Date) -> Result<(), OutOfTimeError> {
        self.regenerate(date, self.current_view)?;
        debug!(%date, view = %self.current_view, "moved calendar");
        Ok(())
    }

    fn regenerate(&mut self, date: Date, view: ViewMode) -> Result<(), OutOfTimeError> {
        let grid = self.generator.generate(date, view)?;
        debug!(
            %date,
            %view,
            cells = grid.len(),
            shows_today = grid.today().is_some(),
            "generated grid"
        );
        self.grid = grid;
        self.current_date = date;
        self.current_view = view;
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ViewError {
    #[error("the month view is unavailable on a compact viewport")]
    MonthViewUnavailable,
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use time::macros::date;

    fn state(anchor: Date, view: ViewMode) -> ViewState<FixedClock> {
        ViewState::new(anchor, view, FixedClock(date!(2024 - 03 - 15))).unwrap()
    }

    #[test]
    fn test_new() {
        let st = state(date!(2024 - 02 - 10), ViewMode::Month);
        assert_eq!(st.current_view(), ViewMode::Month);
        assert_eq!(st.current_date(), date!(2024 - 02 - 10));
        assert!(!st.is_compact());
        assert_eq!(st.grid().len(), 42);
        assert_eq!(st.grid().first_date(), date!(2024 - 01 - 29));
        assert_eq!(st.today(), date!(2024 - 03 - 15));
    }

    #[test]
    fn test_next_month() {
        let mut st = state(date!(2024 - 01 - 31), ViewMode::Month);
        st.next().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 02 - 01));
        st.next().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 03 - 01));
        assert_eq!(st.grid().first_date(), date!(2024 - 02 - 26));
    }

    #[test]
    fn test_next_month_across_year() {
        let mut st = state(date!(2023 - 12 - 15), ViewMode::Month);
        st.next().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 01 - 01));
    }

    #[test]
    fn test_previous_month() {
        let mut st = state(date!(2024 - 03 - 31), ViewMode::Month);
        st.previous().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 02 - 01));
        st.previous().unwrap();
        st.previous().unwrap();
        assert_eq!(st.current_date(), date!(2023 - 12 - 01));
    }

    #[test]
    fn test_week_navigation() {
        let mut st = state(date!(2024 - 03 - 15), ViewMode::Week);
        st.next().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 03 - 22));
        assert_eq!(st.grid().first_date(), date!(2024 - 03 - 18));
        st.previous().unwrap();
        st.previous().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 03 - 08));
        assert_eq!(st.grid().first_date(), date!(2024 - 03 - 04));
    }

    #[test]
    fn test_week_navigation_across_month() {
        let mut st = state(date!(2024 - 03 - 29), ViewMode::Week);
        st.next().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 04 - 05));
        // Cells keep the anchor's month as the focused month
        let flags = st
            .grid()
            .iter()
            .map(|c| c.is_current_month)
            .collect::<Vec<_>>();
        assert_eq!(flags, [true; 7]);
        st.previous().unwrap();
        let flags = st
            .grid()
            .iter()
            .map(|c| c.is_current_month)
            .collect::<Vec<_>>();
        assert_eq!(flags, [true, true, true, true, true, true, true]);
        st.previous().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 03 - 22));
    }

    #[test]
    fn test_week_partial_month() {
        let st = state(date!(2024 - 04 - 01), ViewMode::Week);
        let flags = st
            .grid()
            .iter()
            .map(|c| c.is_current_month)
            .collect::<Vec<_>>();
        assert_eq!(flags, [true; 7]);
        let st = state(date!(2024 - 03 - 31), ViewMode::Week);
        assert_eq!(st.grid().first_date(), date!(2024 - 03 - 25));
        let st = state(date!(2024 - 05 - 01), ViewMode::Week);
        let flags = st
            .grid()
            .iter()
            .map(|c| c.is_current_month)
            .collect::<Vec<_>>();
        assert_eq!(flags, [false, false, true, true, true, true, true]);
    }

    #[test]
    fn test_resize_forces_week() {
        let mut st = state(date!(2024 - 02 - 10), ViewMode::Month);
        st.resize(1024).unwrap();
        assert!(!st.is_compact());
        assert_eq!(st.current_view(), ViewMode::Month);
        st.resize(768).unwrap();
        assert!(st.is_compact());
        assert_eq!(st.current_view(), ViewMode::Week);
        assert_eq!(st.grid().len(), 7);
        assert_eq!(st.grid().first_date(), date!(2024 - 02 - 05));
    }

    #[test]
    fn test_widening_keeps_week() {
        let mut st = state(date!(2024 - 02 - 10), ViewMode::Month);
        st.resize(500).unwrap();
        st.resize(1200).unwrap();
        assert!(!st.is_compact());
        assert_eq!(st.current_view(), ViewMode::Week);
        st.set_view(ViewMode::Month).unwrap();
        assert_eq!(st.current_view(), ViewMode::Month);
    }

    #[test]
    fn test_custom_breakpoint() {
        let mut st = state(date!(2024 - 02 - 10), ViewMode::Month).with_breakpoint(60);
        st.resize(61).unwrap();
        assert_eq!(st.current_view(), ViewMode::Month);
        st.resize(60).unwrap();
        assert_eq!(st.current_view(), ViewMode::Week);
    }

    #[test]
    fn test_set_view_refused_when_compact() {
        let mut st = state(date!(2024 - 02 - 10), ViewMode::Month);
        st.resize(320).unwrap();
        assert_eq!(
            st.set_view(ViewMode::Month),
            Err(ViewError::MonthViewUnavailable)
        );
        assert_eq!(st.current_view(), ViewMode::Week);
        assert_eq!(st.grid().len(), 7);
        assert_eq!(st.set_view(ViewMode::Week), Ok(()));
    }

    #[test]
    fn test_toggle_view() {
        let mut st = state(date!(2024 - 03 - 15), ViewMode::Month);
        st.toggle_view(true).unwrap();
        assert_eq!(st.current_view(), ViewMode::Week);
        assert_eq!(st.grid().first_date(), date!(2024 - 03 - 11));
        assert_eq!(st.current_date(), date!(2024 - 03 - 15));
        st.toggle_view(false).unwrap();
        assert_eq!(st.current_view(), ViewMode::Month);
        assert_eq!(st.grid().len(), 42);
        st.resize(100).unwrap();
        assert_eq!(
            st.toggle_view(false),
            Err(ViewError::MonthViewUnavailable)
        );
    }

    #[test]
    fn test_jump_to_today() {
        let mut st = state(date!(1999 - 12 - 31), ViewMode::Month);
        assert!(st.grid().today().is_none());
        st.jump_to_today().unwrap();
        assert_eq!(st.current_date(), date!(2024 - 03 - 15));
        assert_eq!(
            st.grid().today().map(|c| c.date),
            Some(date!(2024 - 03 - 15))
        );
    }

    #[test]
    fn test_end_of_time_leaves_state() {
        let mut st = state(date!(9999 - 11 - 20), ViewMode::Month);
        let before = st.clone();
        assert_eq!(st.next(), Err(OutOfTimeError));
        assert_eq!(st, before);
        let mut st = state(date!(9999 - 12 - 20), ViewMode::Week);
        assert_eq!(st.next(), Err(OutOfTimeError));
        assert_eq!(st.current_date(), date!(9999 - 12 - 20));
        assert_eq!(
            st.set_view(ViewMode::Month),
            Err(ViewError::OutOfTime(OutOfTimeError))
        );
        assert_eq!(st.current_view(), ViewMode::Week);
    }

    #[test]
    fn test_start_of_time() {
        let mut st = state(Date::MIN, ViewMode::Month);
        assert_eq!(st.previous(), Err(OutOfTimeError));
        assert_eq!(st.current_date(), Date::MIN);
    }
}
