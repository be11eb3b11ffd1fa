//! Host callbacks
//!
//! Each hook receives a payload struct whose field names are what the host
//! reads. Unbound hooks behave like a callback returning nothing.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::models::{CalendarCell, CalendarEvent, CalendarView};

pub struct EventClick<'a> {
    pub calendar_event: &'a CalendarEvent,
}

pub struct EventTimesChanged<'a> {
    pub calendar_event: &'a CalendarEvent,
    pub calendar_new_event_start: DateTime<Utc>,
    pub calendar_new_event_end: Option<DateTime<Utc>>,
}

pub struct TimespanClick<'a> {
    pub calendar_date: DateTime<Utc>,
    pub calendar_cell: Option<&'a CalendarCell>,
}

pub struct DateRangeSelect {
    pub calendar_range_start_date: DateTime<Utc>,
    pub calendar_range_end_date: DateTime<Utc>,
}

pub struct ViewChangeClick {
    pub calendar_date: DateTime<Utc>,
    /// `None` when the current view has nothing to drill down to.
    pub calendar_next_view: Option<CalendarView>,
}

pub struct CellModifier<'a> {
    pub calendar_cell: &'a mut CalendarCell,
}

type EventHook = Box<dyn FnMut(EventClick<'_>)>;
type TimesChangedHook = Box<dyn FnMut(EventTimesChanged<'_>)>;
type TimespanHook = Box<dyn FnMut(TimespanClick<'_>)>;
type RangeHook = Box<dyn FnMut(DateRangeSelect)>;
type ViewChangeHook = Box<dyn FnMut(ViewChangeClick) -> Option<bool>>;
type CellHook = Box<dyn FnMut(CellModifier<'_>)>;

#[derive(Default)]
pub struct CalendarHooks {
    event_click: Option<EventHook>,
    event_times_changed: Option<TimesChangedHook>,
    edit_event_click: Option<EventHook>,
    delete_event_click: Option<EventHook>,
    timespan_click: Option<TimespanHook>,
    date_range_select: Option<RangeHook>,
    view_change_click: Option<ViewChangeHook>,
    cell_modifier: Option<CellHook>,
}

impl CalendarHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event_click(mut self, hook: impl FnMut(EventClick<'_>) + 'static) -> Self {
        self.event_click = Some(Box::new(hook));
        self
    }

    pub fn on_event_times_changed(mut self, hook: impl FnMut(EventTimesChanged<'_>) + 'static) -> Self {
        self.event_times_changed = Some(Box::new(hook));
        self
    }

    /// Deprecated: use `on_event_click` and render your own actions.
    pub fn on_edit_event_click(mut self, hook: impl FnMut(EventClick<'_>) + 'static) -> Self {
        self.edit_event_click = Some(Box::new(hook));
        self
    }

    /// Deprecated: use `on_event_click` and render your own actions.
    pub fn on_delete_event_click(mut self, hook: impl FnMut(EventClick<'_>) + 'static) -> Self {
        self.delete_event_click = Some(Box::new(hook));
        self
    }

    pub fn on_timespan_click(mut self, hook: impl FnMut(TimespanClick<'_>) + 'static) -> Self {
        self.timespan_click = Some(Box::new(hook));
        self
    }

    pub fn on_date_range_select(mut self, hook: impl FnMut(DateRangeSelect) + 'static) -> Self {
        self.date_range_select = Some(Box::new(hook));
        self
    }

    /// Returning `Some(false)` cancels the navigation.
    pub fn on_view_change_click(
        mut self,
        hook: impl FnMut(ViewChangeClick) -> Option<bool> + 'static,
    ) -> Self {
        self.view_change_click = Some(Box::new(hook));
        self
    }

    pub fn cell_modifier(mut self, hook: impl FnMut(CellModifier<'_>) + 'static) -> Self {
        self.cell_modifier = Some(Box::new(hook));
        self
    }

    pub fn uses_deprecated(&self) -> bool {
        self.edit_event_click.is_some() || self.delete_event_click.is_some()
    }

    /// Renderers only offer drag selection when someone listens.
    pub fn has_date_range_select(&self) -> bool {
        self.date_range_select.is_some()
    }

    pub(crate) fn event_click(&mut self, payload: EventClick<'_>) {
        if let Some(hook) = self.event_click.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn event_times_changed(&mut self, payload: EventTimesChanged<'_>) {
        if let Some(hook) = self.event_times_changed.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn edit_event_click(&mut self, payload: EventClick<'_>) {
        if let Some(hook) = self.edit_event_click.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn delete_event_click(&mut self, payload: EventClick<'_>) {
        if let Some(hook) = self.delete_event_click.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn timespan_click(&mut self, payload: TimespanClick<'_>) {
        if let Some(hook) = self.timespan_click.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn date_range_select(&mut self, payload: DateRangeSelect) {
        if let Some(hook) = self.date_range_select.as_mut() {
            hook(payload);
        }
    }

    pub(crate) fn view_change_click(&mut self, payload: ViewChangeClick) -> Option<bool> {
        self.view_change_click.as_mut().and_then(|hook| hook(payload))
    }

    pub(crate) fn modify_cell(&mut self, payload: CellModifier<'_>) {
        if let Some(hook) = self.cell_modifier.as_mut() {
            hook(payload);
        }
    }
}

impl fmt::Debug for CalendarHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarHooks")
            .field("event_click", &self.event_click.is_some())
            .field("event_times_changed", &self.event_times_changed.is_some())
            .field("edit_event_click", &self.edit_event_click.is_some())
            .field("delete_event_click", &self.delete_event_click.is_some())
            .field("timespan_click", &self.timespan_click.is_some())
            .field("date_range_select", &self.date_range_select.is_some())
            .field("view_change_click", &self.view_change_click.is_some())
            .field("cell_modifier", &self.cell_modifier.is_some())
            .finish()
    }
}
