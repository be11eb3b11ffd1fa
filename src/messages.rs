use chrono::{DateTime, Utc};

use crate::models::{CalendarEvent, CalendarView};

/// Host-side mutations of bound state, for hosts that drive the widget with
/// messages instead of calling setters.
#[derive(Debug, Clone)]
pub enum BindingMessage {
    // ===== Bound state =====
    /// Replace the event collection
    EventsReplaced(Vec<CalendarEvent>),
    /// Switch view mode, keeping the anchor date
    ViewChanged(CalendarView),
    /// Move the anchor date, keeping the view mode
    ViewDateChanged(DateTime<Utc>),
    /// Switch view mode and anchor date in one step
    ChangeView(CalendarView, DateTime<Utc>),
    /// Open or close the expanded cell
    CellOpenChanged(bool),

    // ===== Navigation =====
    /// A date cell was clicked
    DateClicked(DateTime<Utc>),

    // ===== Environment =====
    /// The process-wide locale identifier changed
    LocaleChanged(String),
    /// Deliver deferred render requests
    Tick,
}
