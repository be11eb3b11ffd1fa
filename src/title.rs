use chrono::DateTime;
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use log::warn;
use std::fmt::Write;

use crate::models::CalendarView;
use crate::utils::logging::LOG_PREFIX;

/// Produces the display title of a view. Returning `None` means the view has
/// no title and the stored one is left alone.
pub trait TitleFormatter {
    fn title(&self, view: CalendarView, date: DateTime<Tz>) -> Option<String>;
}

impl<F> TitleFormatter for F
where
    F: Fn(CalendarView, DateTime<Tz>) -> Option<String>,
{
    fn title(&self, view: CalendarView, date: DateTime<Tz>) -> Option<String> {
        self(view, date)
    }
}

/// strftime patterns per view.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleFormats {
    pub year: Option<String>,
    pub month: Option<String>,
    pub week: Option<String>,
    pub day: Option<String>,
}

impl Default for TitleFormats {
    fn default() -> Self {
        Self {
            year: Some("%Y".to_string()),
            month: Some("%B %Y".to_string()),
            week: Some("Week %V of %G".to_string()),
            day: Some("%A %-d %B, %Y".to_string()),
        }
    }
}

impl TitleFormats {
    pub fn pattern(&self, view: CalendarView) -> Option<&str> {
        match view {
            CalendarView::Year => self.year.as_deref(),
            CalendarView::Month => self.month.as_deref(),
            CalendarView::Week => self.week.as_deref(),
            CalendarView::Day => self.day.as_deref(),
        }
    }

    /// Views whose pattern chrono cannot parse.
    pub fn invalid_views(&self) -> Vec<CalendarView> {
        CalendarView::ALL
            .into_iter()
            .filter(|view| {
                self.pattern(*view).map(is_unparseable).unwrap_or(false)
            })
            .collect()
    }
}

fn is_unparseable(pattern: &str) -> bool {
    StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl TitleFormatter for TitleFormats {
    /// An unusable pattern yields no title rather than a panic.
    fn title(&self, view: CalendarView, date: DateTime<Tz>) -> Option<String> {
        let pattern = self.pattern(view)?;
        if is_unparseable(pattern) {
            warn!("{} title pattern '{}' for {} view is not valid strftime", LOG_PREFIX, pattern, view);
            return None;
        }

        let mut title = String::new();
        match write!(title, "{}", date.format(pattern)) {
            Ok(()) => Some(title),
            Err(_) => {
                warn!("{} title pattern '{}' could not be applied to {}", LOG_PREFIX, pattern, date);
                None
            }
        }
    }
}
