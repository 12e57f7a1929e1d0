use super::grid::{DayCell, Grid};
use super::util::{is_same_date, WEEKDAY_LABELS};
use super::ViewMode;
use crate::theme::{
    OUTSIDE_MONTH_STYLE, SELECTED_STYLE, TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::Text,
    widgets::{Paragraph, Widget},
};
use time::Date;

/// Width of the seven-column layout: six day columns plus the final day's
/// four characters
const MAIN_WIDTH: u16 = 46;

/// Narrowest area in which the month view can be drawn
pub(crate) const MONTH_LAYOUT_WIDTH: u16 = MAIN_WIDTH;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Number of lines taken up by the title, the weekday names, and the rule
/// beneath them
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

/// Width of one line of the narrow week layout, e.g. "Mon [14]"
const LIST_WIDTH: u16 = 8;

/// Offset of the date within a line of the narrow week layout
const LIST_DATE_OFFSET: u16 = 4;

const ACS_HLINE: char = '─';

/// Draws a generated grid.  Month grids are drawn as six rows of seven days;
/// week grids are drawn as a single row, or as a column of days when the area
/// is too narrow for a row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<'a> {
    grid: &'a Grid,
    selected: Option<Date>,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(grid: &'a Grid) -> Calendar<'a> {
        Calendar {
            grid,
            selected: None,
        }
    }

    pub(crate) fn selected(mut self, date: Date) -> Calendar<'a> {
        self.selected = Some(date);
        self
    }

    fn title(&self) -> String {
        let (year, month) = self.grid.focus();
        match self.grid.mode() {
            ViewMode::Month => format!("{month} {year}"),
            ViewMode::Week => {
                let week = self.grid.reference().iso_week();
                format!("{month} {year}, week {week}")
            }
        }
    }

    fn cell_style(&self, cell: &DayCell) -> Style {
        let mut style = if cell.is_current_month {
            Style::new()
        } else {
            OUTSIDE_MONTH_STYLE
        };
        if cell.is_today {
            style = style.patch(TODAY_STYLE);
        }
        if self.selected.is_some_and(|d| is_same_date(d, cell.date)) {
            style = style.patch(SELECTED_STYLE);
        }
        style
    }

    fn render_rows(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(MAIN_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(MAIN_WIDTH, self.title());
        canvas.draw_header();
        canvas.hline(HEADER_LINES - 1, 0, ACS_HLINE, MAIN_WIDTH);
        for (week_no, week) in std::iter::zip(0u16.., self.grid.weeks()) {
            for (col, cell) in std::iter::zip(0u16.., week) {
                canvas.mvprint(
                    week_no * WEEK_LINES + HEADER_LINES,
                    col * DAY_WIDTH,
                    show(cell),
                    Some(self.cell_style(cell)),
                );
            }
        }
    }

    fn render_list(self, area: Rect, buf: &mut Buffer) {
        let title = self.title();
        let width = u16::try_from(title.chars().count())
            .unwrap_or(u16::MAX)
            .max(LIST_WIDTH)
            .min(area.width);
        let left = area.width.saturating_sub(width) / 2;
        let [_, area, _] = Layout::horizontal([
            Constraint::Length(left),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(width, title);
        canvas.hline(1, 0, ACS_HLINE, width);
        let list_left = width.saturating_sub(LIST_WIDTH) / 2;
        for (y, (label, cell)) in std::iter::zip(2u16.., WEEKDAY_LABELS.iter().zip(self.grid)) {
            canvas.mvprint(y, list_left, label, Some(WEEKDAY_STYLE));
            canvas.mvprint(
                y,
                list_left + LIST_DATE_OFFSET,
                show(cell),
                Some(self.cell_style(cell)),
            );
        }
    }
}

impl Widget for Calendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.grid.mode() == ViewMode::Week && area.width < MAIN_WIDTH {
            self.render_list(area, buf);
        } else {
            self.render_rows(area, buf);
        }
    }
}

fn show(cell: &DayCell) -> String {
    let day = cell.date.day();
    if cell.is_today {
        format!("[{day:2}]")
    } else {
        format!(" {day:2} ")
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, width: u16, title: String) {
        let len = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        self.mvprint(0, width.saturating_sub(len) / 2, title, Some(TITLE_STYLE));
    }

    fn draw_header(&mut self) {
        for (col, label) in std::iter::zip(0u16.., WEEKDAY_LABELS) {
            self.mvprint(1, col * DAY_WIDTH + 1, label, Some(WEEKDAY_STYLE));
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
