//! View state controller
//!
//! Holds what the widget shows and decides when the rendering layer has to
//! redraw. Nothing reacts until the templates are loaded; a failed load leaves
//! the controller inert for good.

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use log::{debug, error, warn};
use std::time::Instant;
use uuid::Uuid;

use crate::config::WidgetConfig;
use crate::hooks::{
    CalendarHooks, CellModifier, DateRangeSelect, EventClick, EventTimesChanged, TimespanClick,
    ViewChangeClick,
};
use crate::locale;
use crate::models::{CalendarCell, CalendarEvent, CalendarView, ViewState};
use crate::signal::{RefreshNotifier, RefreshSignal, SubscriptionId};
use crate::templates::{TemplateOverrides, TemplateProvider, TemplateSet};
use crate::title::TitleFormatter;
use crate::utils::logging::{log_error_with_context, log_refresh_decision, log_template_load, LOG_PREFIX};
use crate::utils::IntoInstant;
use crate::validation::validate_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for templates; state changes are stored but not reacted to.
    Loading,
    Ready,
    /// Templates failed to load. Permanent.
    Failed,
}

/// The inputs whose change triggers a refresh evaluation.
#[derive(Debug, Clone, PartialEq)]
struct WatchSnapshot {
    view: CalendarView,
    view_date: DateTime<Utc>,
    cell_is_open: bool,
    locale: String,
}

/// False only when the anchor moved inside the visible window of an
/// unchanged view.
pub fn refresh_needed(
    view: CalendarView,
    previous_view: CalendarView,
    previous_date: DateTime<Utc>,
    current_date: DateTime<Utc>,
    tz: Tz,
    week_start: Weekday,
) -> bool {
    let moved_within_window = view.same_unit(previous_date, current_date, tz, week_start)
        && previous_date != current_date
        && view == previous_view;
    !moved_within_window
}

pub struct ViewStateController {
    instance: Uuid,
    config: WidgetConfig,
    title_formatter: Box<dyn TitleFormatter>,
    state: ControllerState,

    view: CalendarView,
    view_date: DateTime<Utc>,
    title: Option<String>,
    show_title: bool,
    cell_is_open: bool,
    events: Vec<CalendarEvent>,
    custom_template_urls: TemplateOverrides,
    templates: Option<TemplateSet>,

    previous_date: DateTime<Utc>,
    previous_view: CalendarView,
    last_seen: Option<WatchSnapshot>,

    hooks: CalendarHooks,
    notifier: RefreshNotifier,
}

impl ViewStateController {
    pub fn new(view: CalendarView, view_date: DateTime<Utc>, config: WidgetConfig) -> Self {
        let title_formatter = Box::new(config.title_formats.clone());
        Self {
            instance: Uuid::new_v4(),
            config,
            title_formatter,
            state: ControllerState::Loading,
            view,
            view_date,
            title: None,
            show_title: false,
            cell_is_open: false,
            events: Vec::new(),
            custom_template_urls: TemplateOverrides::new(),
            templates: None,
            previous_date: view_date,
            previous_view: view,
            last_seen: None,
            hooks: CalendarHooks::default(),
            notifier: RefreshNotifier::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events = events;
        self
    }

    /// Opts into title computation.
    pub fn with_title(mut self, show_title: bool) -> Self {
        self.show_title = show_title;
        self
    }

    pub fn with_cell_open(mut self, open: bool) -> Self {
        self.cell_is_open = open;
        self
    }

    pub fn with_template_overrides(mut self, overrides: TemplateOverrides) -> Self {
        self.custom_template_urls = overrides;
        self
    }

    pub fn with_hooks(mut self, hooks: CalendarHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_title_formatter(mut self, formatter: impl TitleFormatter + 'static) -> Self {
        self.title_formatter = Box::new(formatter);
        self
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ControllerState::Ready
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn view_date(&self) -> DateTime<Utc> {
        self.view_date
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            view: self.view,
            view_date: self.view_date,
            title: self.title.clone(),
        }
    }

    pub fn cell_is_open(&self) -> bool {
        self.cell_is_open
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn templates(&self) -> Option<&TemplateSet> {
        self.templates.as_ref()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn hooks(&self) -> &CalendarHooks {
        &self.hooks
    }

    pub fn notifier(&self) -> &RefreshNotifier {
        &self.notifier
    }

    pub fn subscribe(&self, listener: impl FnMut(RefreshSignal) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    /// Delivers render requests queued by earlier refreshes.
    pub fn tick(&self) -> usize {
        self.notifier.tick()
    }

    /// Loads templates, then starts reacting to state changes.
    pub async fn initialize(&mut self, provider: &dyn TemplateProvider) {
        if self.state != ControllerState::Loading {
            warn!("{} [{}] initialize called on a {:?} widget, ignoring",
                  LOG_PREFIX, self.instance, self.state);
            return;
        }

        let started = Instant::now();
        let loaded = provider
            .load_templates(&self.custom_template_urls)
            .await
            .and_then(TemplateSet::ensure_complete);
        match loaded {
            Ok(templates) => {
                log_template_load(self.instance, templates.len(), started.elapsed().as_millis() as u64);
                self.templates = Some(templates);
                self.state = ControllerState::Ready;
                self.last_seen = Some(self.snapshot());
                self.refresh();
            }
            Err(e) => {
                self.state = ControllerState::Failed;
                error!("{} [{}] widget is inactive: {}", LOG_PREFIX, self.instance, e.to_safe_string());
                log_error_with_context(&anyhow::Error::new(e), "Could not load all calendar templates");
            }
        }
    }

    /// Sets view and anchor date together, then re-evaluates once.
    pub fn change_view(&mut self, view: CalendarView, date: DateTime<Utc>) {
        self.view = view;
        self.view_date = date;
        self.digest();
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
        self.digest();
    }

    pub fn set_view_date(&mut self, date: DateTime<Utc>) {
        self.view_date = date;
        self.digest();
    }

    pub fn set_cell_is_open(&mut self, open: bool) {
        self.cell_is_open = open;
        self.digest();
    }

    /// Replaces the working set. Refreshes when the content differs.
    pub fn set_events(&mut self, events: Vec<CalendarEvent>) {
        if !self.is_ready() {
            self.events = events;
            return;
        }
        if events != self.events {
            self.events = events;
            self.refresh();
        }
    }

    /// Mutates the working set in place. Refreshes when the content changed.
    pub fn update_events(&mut self, mutate: impl FnOnce(&mut Vec<CalendarEvent>)) {
        if !self.is_ready() {
            mutate(&mut self.events);
            return;
        }
        let before = self.events.clone();
        mutate(&mut self.events);
        if self.events != before {
            self.refresh();
        }
    }

    /// Drills down from the current view to the clicked date, unless the
    /// host vetoes it.
    pub fn date_clicked(&mut self, date: impl IntoInstant) {
        let raw_date = date.into_instant(self.config.timezone);
        let next_view = self.view.next_view();

        let reply = self.hooks.view_change_click(ViewChangeClick {
            calendar_date: raw_date,
            calendar_next_view: next_view,
        });
        if reply == Some(false) {
            debug!("{} [{}] navigation to {} vetoed by host", LOG_PREFIX, self.instance, raw_date);
            return;
        }

        match next_view {
            Some(view) => self.change_view(view, raw_date),
            None => debug!("{} [{}] {} view has no drill-down", LOG_PREFIX, self.instance, self.view),
        }
    }

    /// Re-evaluates the watched inputs; refreshes if any changed since the
    /// last evaluation. Returns whether a refresh ran.
    pub fn digest(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let current = self.snapshot();
        if self.last_seen.as_ref() == Some(&current) {
            return false;
        }
        self.last_seen = Some(current);
        self.refresh();
        true
    }

    /// Recomputes title and working set, commits, and requests a render when
    /// the visible window may have changed. Returns that decision.
    pub fn refresh(&mut self) -> bool {
        if !self.is_ready() {
            debug!("{} [{}] refresh skipped while {:?}", LOG_PREFIX, self.instance, self.state);
            return false;
        }

        if self.show_title {
            let local = self.view_date.with_timezone(&self.config.timezone);
            if let Some(title) = self.title_formatter.title(self.view, local) {
                self.title = Some(title);
            }
        }

        let events = std::mem::take(&mut self.events);
        self.events = events
            .into_iter()
            .filter(|event| validate_event(event))
            .enumerate()
            .map(|(index, mut event)| {
                event.assign_id(index);
                event
            })
            .collect();

        let should_update = refresh_needed(
            self.view,
            self.previous_view,
            self.previous_date,
            self.view_date,
            self.config.timezone,
            self.config.week_starts_on,
        );
        self.previous_date = self.view_date;
        self.previous_view = self.view;

        log_refresh_decision(self.instance, self.view, should_update);
        self.notifier.commit();
        if should_update {
            self.notifier.request_render();
        }
        should_update
    }

    pub(crate) fn event_clicked(&mut self, id: usize) -> bool {
        match self.events.get(id) {
            Some(event) => {
                self.hooks.event_click(EventClick { calendar_event: event });
                true
            }
            None => false,
        }
    }

    pub(crate) fn edit_event_clicked(&mut self, id: usize) -> bool {
        match self.events.get(id) {
            Some(event) => {
                self.hooks.edit_event_click(EventClick { calendar_event: event });
                true
            }
            None => false,
        }
    }

    pub(crate) fn delete_event_clicked(&mut self, id: usize) -> bool {
        match self.events.get(id) {
            Some(event) => {
                self.hooks.delete_event_click(EventClick { calendar_event: event });
                true
            }
            None => false,
        }
    }

    pub(crate) fn event_times_changed(
        &mut self,
        id: usize,
        new_start: DateTime<Utc>,
        new_end: Option<DateTime<Utc>>,
    ) -> bool {
        match self.events.get(id) {
            Some(event) => {
                self.hooks.event_times_changed(EventTimesChanged {
                    calendar_event: event,
                    calendar_new_event_start: new_start,
                    calendar_new_event_end: new_end,
                });
                true
            }
            None => false,
        }
    }

    pub(crate) fn timespan_clicked(&mut self, date: DateTime<Utc>, cell: Option<&CalendarCell>) {
        self.hooks.timespan_click(TimespanClick {
            calendar_date: date,
            calendar_cell: cell,
        });
    }

    pub(crate) fn date_range_selected(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.hooks.date_range_select(DateRangeSelect {
            calendar_range_start_date: start,
            calendar_range_end_date: end,
        });
    }

    pub(crate) fn modify_cell(&mut self, cell: &mut CalendarCell) {
        self.hooks.modify_cell(CellModifier { calendar_cell: cell });
    }

    fn snapshot(&self) -> WatchSnapshot {
        WatchSnapshot {
            view: self.view,
            view_date: self.view_date,
            cell_is_open: self.cell_is_open,
            locale: locale::current_locale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::BuiltinTemplates;
    use chrono::TimeZone;
    use serial_test::serial;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    async fn ready(view: CalendarView, date: DateTime<Utc>) -> ViewStateController {
        let mut controller = ViewStateController::new(view, date, WidgetConfig::default());
        controller.initialize(&BuiltinTemplates::new()).await;
        controller.tick();
        controller
    }

    #[test]
    fn test_refresh_needed_rules() {
        let tz = Tz::UTC;
        let sun = Weekday::Sun;
        let month = CalendarView::Month;
        // moved inside the month: suppressed
        assert!(!refresh_needed(month, month, utc(2024, 1, 1), utc(2024, 1, 20), tz, sun));
        // identical anchor: allowed
        assert!(refresh_needed(month, month, utc(2024, 1, 1), utc(2024, 1, 1), tz, sun));
        // left the month: allowed
        assert!(refresh_needed(month, month, utc(2024, 1, 1), utc(2024, 2, 1), tz, sun));
        // view changed: allowed
        assert!(refresh_needed(CalendarView::Day, month, utc(2024, 1, 15), utc(2024, 1, 15), tz, sun));
        assert!(refresh_needed(CalendarView::Year, month, utc(2024, 1, 1), utc(2024, 1, 20), tz, sun));
    }

    #[tokio::test]
    #[serial]
    async fn test_nothing_happens_before_templates_load() {
        let mut controller =
            ViewStateController::new(CalendarView::Month, utc(2024, 1, 1), WidgetConfig::default());
        controller.set_view_date(utc(2024, 3, 1));
        assert!(!controller.digest());
        assert!(!controller.refresh());
        assert_eq!(controller.state(), ControllerState::Loading);
        assert_eq!(controller.notifier().pending(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_initial_refresh_requests_render() {
        let mut controller =
            ViewStateController::new(CalendarView::Month, utc(2024, 1, 1), WidgetConfig::default())
                .with_title(true);
        controller.initialize(&BuiltinTemplates::new()).await;

        assert!(controller.is_ready());
        assert_eq!(controller.title(), Some("January 2024"));
        assert_eq!(controller.notifier().pending(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_title_only_when_opted_in() {
        let controller = ready(CalendarView::Month, utc(2024, 1, 1)).await;
        assert_eq!(controller.title(), None);
    }

    #[tokio::test]
    #[serial]
    async fn test_digest_ignores_unchanged_inputs() {
        let mut controller = ready(CalendarView::Month, utc(2024, 1, 1)).await;
        assert!(!controller.digest());
        controller.set_cell_is_open(true);
        assert_eq!(controller.notifier().pending(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn test_locale_change_triggers_refresh() {
        let mut controller = ready(CalendarView::Week, utc(2024, 1, 10)).await;
        locale::set_locale("de");
        assert!(controller.digest());
        assert!(!controller.digest());
        locale::set_locale(locale::DEFAULT_LOCALE);
    }

    #[tokio::test]
    #[serial]
    async fn test_events_refresh_only_on_content_change() {
        let mut controller = ready(CalendarView::Month, utc(2024, 1, 1)).await;
        let commits = Rc::new(RefCell::new(0));
        let sink = commits.clone();
        controller.subscribe(move |signal| {
            if signal == RefreshSignal::StateCommitted {
                *sink.borrow_mut() += 1;
            }
        });

        let events = vec![CalendarEvent::new("A", utc(2024, 1, 5))];
        controller.set_events(events.clone());
        controller.set_events(events);
        assert_eq!(*commits.borrow(), 1);

        controller.update_events(|events| events[0].title = "B".to_string());
        assert_eq!(*commits.borrow(), 2);
        controller.update_events(|_| {});
        assert_eq!(*commits.borrow(), 2);
        assert_eq!(controller.events()[0].id(), Some(0));
    }

    #[tokio::test]
    #[serial]
    async fn test_day_click_is_a_no_op() {
        let asked = Rc::new(RefCell::new(Vec::new()));
        let sink = asked.clone();
        let hooks = CalendarHooks::new().on_view_change_click(move |click| {
            sink.borrow_mut().push(click.calendar_next_view);
            None
        });
        let mut controller = ViewStateController::new(CalendarView::Day, utc(2024, 1, 15), WidgetConfig::default())
            .with_hooks(hooks);
        controller.initialize(&BuiltinTemplates::new()).await;
        controller.tick();

        controller.date_clicked(utc(2024, 1, 16));
        assert_eq!(*asked.borrow(), vec![None]);
        assert_eq!(controller.view(), CalendarView::Day);
        assert_eq!(controller.view_date(), utc(2024, 1, 15));
        assert_eq!(controller.notifier().pending(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_unparseable_title_pattern_leaves_title_unset() {
        let mut config = WidgetConfig::default();
        config.title_formats.month = Some("%B %Y %".to_string());
        let mut controller = ViewStateController::new(CalendarView::Month, utc(2024, 1, 1), config)
            .with_title(true);
        controller.initialize(&BuiltinTemplates::new()).await;

        assert!(controller.is_ready());
        assert_eq!(controller.title(), None);
        assert_eq!(controller.notifier().pending(), 1);

        controller.set_view(CalendarView::Year);
        assert_eq!(controller.title(), Some("2024"));
    }

    #[tokio::test]
    #[serial]
    async fn test_second_initialize_is_ignored() {
        let mut controller = ready(CalendarView::Year, utc(2024, 1, 1)).await;
        controller.initialize(&BuiltinTemplates::new()).await;
        assert_eq!(controller.notifier().pending(), 0);
        assert!(controller.is_ready());
    }
}
