mod grid;
mod util;
mod view;
mod widget;
pub(crate) use self::view::{ViewError, ViewState};
pub(crate) use self::widget::{Calendar, MONTH_LAYOUT_WIDTH};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum ViewMode {
    #[default]
    Month,
    Week,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Month => write!(f, "Month"),
            ViewMode::Week => write!(f, "Week"),
        }
    }
}
