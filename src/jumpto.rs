use crate::theme::{
    jumpto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 17;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a YYYYMMDD date; the cursor sits here once every
/// digit is filled in
const ENTER_POS: usize = 8;

/// Where each field of the date starts within the digit buffer, along with the
/// placeholder shown for its unfilled digits
const FIELDS: [(usize, usize, &str); 3] = [(0, 4, "Y"), (4, 6, "M"), (6, 8, "D")];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo;

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    /*
     * .................
     * .┌─ Jump To… ──┐.
     * .│             │.
     * .│ -YYYY-MM-DD │.
     * .│             │.
     * .│   [ENTER]   │.
     * .└─────────────┘.
     * .................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// A date being typed in digit by digit
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    negative: bool,
    digits: [Option<u8>; ENTER_POS],
    pos: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        spans.push(Span::styled(
            if self.negative { "-" } else { " " },
            BASE_STYLE,
        ));
        for (i, (start, end, fallback)) in FIELDS.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            for dg in &self.digits[start..end] {
                spans.push(match dg {
                    Some(d) => Span::styled(d.to_string(), BASE_STYLE),
                    None => Span::styled(fallback, UNFILLED_CELL_STYLE),
                });
            }
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match (input, self.pos) {
            (JumpToInput::Negative, 0) => {
                self.negative = !self.negative;
                JumpToOutput::Ok
            }
            (JumpToInput::Positive, 0) => {
                self.negative = false;
                JumpToOutput::Ok
            }
            (JumpToInput::Digit(d), 0..ENTER_POS) if d < 10 => {
                self.digits[self.pos] = Some(d);
                self.pos += 1;
                JumpToOutput::Ok
            }
            (JumpToInput::Backspace, 1..) => {
                self.pos -= 1;
                self.digits[self.pos] = None;
                JumpToOutput::Ok
            }
            (JumpToInput::Enter, ENTER_POS) => match self.to_date() {
                Some(date) => JumpToOutput::Jump(date),
                None => JumpToOutput::Invalid,
            },
            _ => JumpToOutput::Invalid,
        }
    }

    fn field(&self, start: usize, end: usize) -> Option<u16> {
        self.digits[start..end]
            .iter()
            .try_fold(0u16, |acc, d| Some(acc * 10 + u16::from((*d)?)))
    }

    fn to_date(self) -> Option<Date> {
        let [(ys, ye, _), (ms, me, _), (ds, de, _)] = FIELDS;
        let mut year = i32::from(self.field(ys, ye)?);
        if self.negative {
            year = -year;
        }
        let month = Month::try_from(u8::try_from(self.field(ms, me)?).ok()?).ok()?;
        let day = u8::try_from(self.field(ds, de)?).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Negative,
    Positive,
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(Date),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn type_digits(state: &mut JumpToState, s: &str) {
        for ch in s.chars() {
            let d = ch.to_digit(10).and_then(|d| u8::try_from(d).ok()).unwrap();
            assert_eq!(state.handle_input(JumpToInput::Digit(d)), JumpToOutput::Ok);
        }
    }

    #[test]
    fn test_jump() {
        let mut state = JumpToState::new();
        type_digits(&mut state, "20240229");
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Jump(date!(2024 - 02 - 29))
        );
    }

    #[test]
    fn test_invalid_date() {
        let mut state = JumpToState::new();
        type_digits(&mut state, "20230229");
        assert_eq!(state.handle_input(JumpToInput::Enter), JumpToOutput::Invalid);
        let mut state = JumpToState::new();
        type_digits(&mut state, "20241301");
        assert_eq!(state.handle_input(JumpToInput::Enter), JumpToOutput::Invalid);
    }

    #[test]
    fn test_enter_too_early() {
        let mut state = JumpToState::new();
        type_digits(&mut state, "2024");
        assert_eq!(state.handle_input(JumpToInput::Enter), JumpToOutput::Invalid);
    }

    #[test]
    fn test_too_many_digits() {
        let mut state = JumpToState::new();
        type_digits(&mut state, "20240101");
        assert_eq!(
            state.handle_input(JumpToInput::Digit(1)),
            JumpToOutput::Invalid
        );
    }

    #[test]
    fn test_backspace() {
        let mut state = JumpToState::new();
        assert_eq!(
            state.handle_input(JumpToInput::Backspace),
            JumpToOutput::Invalid
        );
        type_digits(&mut state, "20240315");
        assert_eq!(state.handle_input(JumpToInput::Backspace), JumpToOutput::Ok);
        type_digits(&mut state, "6");
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Jump(date!(2024 - 03 - 16))
        );
    }

    #[test]
    fn test_negative_year() {
        let mut state = JumpToState::new();
        assert_eq!(state.handle_input(JumpToInput::Negative), JumpToOutput::Ok);
        type_digits(&mut state, "0044");
        assert_eq!(
            state.handle_input(JumpToInput::Negative),
            JumpToOutput::Invalid
        );
        type_digits(&mut state, "0315");
        assert_eq!(
            state.handle_input(JumpToInput::Enter),
            JumpToOutput::Jump(Date::from_calendar_date(-44, Month::March, 15).unwrap())
        );
    }

    #[test]
    fn test_line() {
        let mut state = JumpToState::new();
        type_digits(&mut state, "202403");
        assert_eq!(state.to_line().to_string(), " 2024-03-DD");
    }
}
