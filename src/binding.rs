//! Binding surface
//!
//! The widget's external contract: what a host binds, and how those bindings
//! reach the controller. Apart from the one-time deprecation check there is
//! no logic here.

use chrono::{DateTime, Utc};
use log::warn;

use crate::config::{validate_config, DayViewOptions, WidgetConfig};
use crate::controller::ViewStateController;
use crate::hooks::CalendarHooks;
use crate::locale;
use crate::messages::BindingMessage;
use crate::models::{CalendarCell, CalendarEvent, CalendarView};
use crate::signal::{RefreshSignal, SubscriptionId};
use crate::templates::{TemplateOverrides, TemplateProvider};
use crate::title::TitleFormatter;
use crate::utils::logging::{CHANGELOG_LINK, LOG_PREFIX};

/// Everything a host can bind.
#[derive(Debug)]
pub struct CalendarBindings {
    pub events: Vec<CalendarEvent>,
    pub view: CalendarView,
    /// Whether the host reads the derived title.
    pub view_title: bool,
    pub view_date: DateTime<Utc>,
    pub cell_is_open: bool,
    pub slide_box_disabled: bool,
    pub custom_template_urls: TemplateOverrides,
    /// Deprecated.
    pub edit_event_html: Option<String>,
    /// Deprecated.
    pub delete_event_html: Option<String>,
    pub day_view: DayViewOptions,
    pub hooks: CalendarHooks,
}

impl CalendarBindings {
    pub fn new(view: CalendarView, view_date: DateTime<Utc>) -> Self {
        Self {
            events: Vec::new(),
            view,
            view_title: false,
            view_date,
            cell_is_open: false,
            slide_box_disabled: false,
            custom_template_urls: TemplateOverrides::new(),
            edit_event_html: None,
            delete_event_html: None,
            day_view: DayViewOptions::default(),
            hooks: CalendarHooks::default(),
        }
    }

    pub fn uses_deprecated(&self) -> bool {
        self.edit_event_html.is_some() || self.delete_event_html.is_some() || self.hooks.uses_deprecated()
    }
}

pub struct BindingSurface {
    controller: ViewStateController,
    slide_box_disabled: bool,
    edit_event_html: Option<String>,
    delete_event_html: Option<String>,
    day_view: DayViewOptions,
}

impl BindingSurface {
    pub fn new(bindings: CalendarBindings, config: WidgetConfig) -> Self {
        if bindings.uses_deprecated() {
            warn!(
                "{} `on_edit_event_click`, `on_delete_event_click`, `edit_event_html`, `delete_event_html` options \
                 are deprecated, please see the changelog on how to upgrade: {}",
                LOG_PREFIX, CHANGELOG_LINK
            );
        }
        bindings.day_view.warn_if_suspicious();
        if let Err(e) = validate_config(&config) {
            warn!("{} {}", LOG_PREFIX, e);
        }

        let controller = ViewStateController::new(bindings.view, bindings.view_date, config)
            .with_events(bindings.events)
            .with_title(bindings.view_title)
            .with_cell_open(bindings.cell_is_open)
            .with_template_overrides(bindings.custom_template_urls)
            .with_hooks(bindings.hooks);

        Self {
            controller,
            slide_box_disabled: bindings.slide_box_disabled,
            edit_event_html: bindings.edit_event_html,
            delete_event_html: bindings.delete_event_html,
            day_view: bindings.day_view,
        }
    }

    pub fn with_title_formatter(mut self, formatter: impl TitleFormatter + 'static) -> Self {
        self.controller = self.controller.with_title_formatter(formatter);
        self
    }

    pub async fn initialize(&mut self, provider: &dyn TemplateProvider) {
        self.controller.initialize(provider).await;
    }

    pub fn controller(&self) -> &ViewStateController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewStateController {
        &mut self.controller
    }

    pub fn subscribe(&self, listener: impl FnMut(RefreshSignal) + 'static) -> SubscriptionId {
        self.controller.subscribe(listener)
    }

    pub fn tick(&self) -> usize {
        self.controller.tick()
    }

    // ===== Bound state =====

    pub fn set_events(&mut self, events: Vec<CalendarEvent>) {
        self.controller.set_events(events);
    }

    pub fn update_events(&mut self, mutate: impl FnOnce(&mut Vec<CalendarEvent>)) {
        self.controller.update_events(mutate);
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.controller.set_view(view);
    }

    pub fn set_view_date(&mut self, date: DateTime<Utc>) {
        self.controller.set_view_date(date);
    }

    pub fn set_cell_is_open(&mut self, open: bool) {
        self.controller.set_cell_is_open(open);
    }

    pub fn view_title(&self) -> Option<&str> {
        self.controller.title()
    }

    pub fn slide_box_disabled(&self) -> bool {
        self.slide_box_disabled
    }

    pub fn edit_event_html(&self) -> Option<&str> {
        self.edit_event_html.as_deref()
    }

    pub fn delete_event_html(&self) -> Option<&str> {
        self.delete_event_html.as_deref()
    }

    pub fn day_view(&self) -> &DayViewOptions {
        &self.day_view
    }

    pub fn update(&mut self, message: BindingMessage) {
        match message {
            BindingMessage::EventsReplaced(events) => self.set_events(events),
            BindingMessage::ViewChanged(view) => self.set_view(view),
            BindingMessage::ViewDateChanged(date) => self.set_view_date(date),
            BindingMessage::ChangeView(view, date) => self.controller.change_view(view, date),
            BindingMessage::CellOpenChanged(open) => self.set_cell_is_open(open),
            BindingMessage::DateClicked(date) => self.controller.date_clicked(date),
            BindingMessage::LocaleChanged(id) => {
                locale::set_locale(id);
                self.controller.digest();
            }
            BindingMessage::Tick => {
                self.tick();
            }
        }
    }

    // ===== Renderer callbacks =====

    pub fn date_clicked(&mut self, date: DateTime<Utc>) {
        self.controller.date_clicked(date);
    }

    /// `id` is the event's position from the last refresh. Returns false for
    /// an unknown id.
    pub fn event_clicked(&mut self, id: usize) -> bool {
        self.controller.event_clicked(id)
    }

    pub fn edit_event_clicked(&mut self, id: usize) -> bool {
        self.controller.edit_event_clicked(id)
    }

    pub fn delete_event_clicked(&mut self, id: usize) -> bool {
        self.controller.delete_event_clicked(id)
    }

    pub fn event_times_changed(
        &mut self,
        id: usize,
        new_start: DateTime<Utc>,
        new_end: Option<DateTime<Utc>>,
    ) -> bool {
        self.controller.event_times_changed(id, new_start, new_end)
    }

    pub fn timespan_clicked(&mut self, date: DateTime<Utc>, cell: Option<&CalendarCell>) {
        self.controller.timespan_clicked(date, cell);
    }

    pub fn date_range_selected(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.controller.date_range_selected(start, end);
    }

    pub fn modify_cell(&mut self, cell: &mut CalendarCell) {
        self.controller.modify_cell(cell);
    }
}
