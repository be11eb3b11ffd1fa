pub mod cell;
pub mod event;
pub mod view;

pub use cell::CalendarCell;
pub use event::{CalendarEvent, EventColor, EventTime};
pub use view::{CalendarView, ViewState};
