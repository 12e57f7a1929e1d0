use crate::calendar::{Calendar, ViewError, ViewMode, ViewState};
use crate::clock::Clock;
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::{BASE_STYLE, STATUS_STYLE};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration};
use tracing::{debug, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C> {
    view: ViewState<C>,
    selected: Date,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(view: ViewState<C>) -> App<C> {
        let selected = view.current_date();
        App {
            view,
            selected,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        self.resize(terminal.size()?.width);
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                    self.beep()?;
                }
            }
            Event::Resize(width, _) => self.resize(width),
            // Redraw on anything else too
            _ => (),
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or asked for
    // something that cannot be done
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('p') | KeyCode::PageUp => self.previous(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next(),
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Char('m') => self.set_view(ViewMode::Month),
                KeyCode::Char('w') => self.set_view(ViewMode::Week),
                KeyCode::Char('v') => {
                    let checked = self.view.current_view() == ViewMode::Month;
                    accept(self.view.toggle_view(checked))
                }
                KeyCode::Char('0') | KeyCode::Home => self.jump_to_today(),
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('a') | KeyCode::Enter => {
                    self.view.add_activity(self.selected);
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.jump_to(date)
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn resize(&mut self, width: u16) {
        if let Err(e) = self.view.resize(width) {
            warn!(width, "could not regenerate calendar after resize: {e}");
        }
    }

    fn previous(&mut self) -> bool {
        let ok = self.view.previous().is_ok();
        self.selected = self.view.current_date();
        ok
    }

    fn next(&mut self) -> bool {
        let ok = self.view.next().is_ok();
        self.selected = self.view.current_date();
        ok
    }

    fn set_view(&mut self, view: ViewMode) -> bool {
        accept(self.view.set_view(view))
    }

    fn jump_to_today(&mut self) -> bool {
        let today = self.view.today();
        self.jump_to(today)
    }

    fn jump_to(&mut self, date: Date) -> bool {
        if self.view.jump_to(date).is_ok() {
            self.selected = date;
            true
        } else {
            false
        }
    }

    // Moves the selection by the given number of days, bringing the calendar
    // along if the selection leaves the month or week being shown
    fn move_selection(&mut self, days: i64) -> bool {
        let Some(date) = self.selected.checked_add(Duration::days(days)) else {
            return false;
        };
        let grid = self.view.grid();
        let in_view = match grid.mode() {
            ViewMode::Month => (date.year(), date.month()) == grid.focus(),
            ViewMode::Week => grid.contains(date),
        };
        if in_view {
            self.selected = date;
            true
        } else {
            self.jump_to(date)
        }
    }

    fn status_line(&self) -> Line<'static> {
        let view = self.view.current_view();
        let compact = if self.view.is_compact() {
            " (compact)"
        } else {
            ""
        };
        Line::styled(
            format!(" {view} view{compact} | {} | ? for help", self.selected),
            STATUS_STYLE,
        )
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Calendar::new(self.view.grid())
            .selected(self.selected)
            .render(cal_area, buf);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

fn accept(r: Result<(), ViewError>) -> bool {
    match r {
        Ok(()) => true,
        Err(e) => {
            debug!("refused view change: {e}");
            false
        }
    }
}
