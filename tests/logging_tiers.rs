use calwidget::templates::TemplateOverrides;
use calwidget::{
    BindingSurface, BuiltinTemplates, CalendarBindings, CalendarEvent, CalendarView,
    ControllerState, TemplatePart, ViewStateController, WidgetConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serial_test::serial;
use std::sync::{Mutex, Once};

lazy_static! {
    static ref RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut records) = RECORDS.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

fn capture() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.lock().unwrap().clear();
}

fn logged(level: Level, needle: &str) -> usize {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(at, message)| *at == level && message.contains(needle))
        .count()
}

fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

#[tokio::test]
#[serial]
async fn test_deprecation_warning_logged_once() {
    capture();
    let mut bindings = CalendarBindings::new(CalendarView::Month, jan(1));
    bindings.edit_event_html = Some("<i class=\"edit\"></i>".to_string());
    bindings.events = vec![CalendarEvent::new("Planning", jan(3))];

    let mut surface = BindingSurface::new(bindings, WidgetConfig::default());
    surface.initialize(&BuiltinTemplates::new()).await;
    surface.set_events(vec![CalendarEvent::new("Planning", jan(4))]);
    surface.set_view(CalendarView::Week);

    assert_eq!(logged(Level::Warn, "`edit_event_html`"), 1);
    assert_eq!(logged(Level::Warn, "please see the changelog"), 1);
}

#[tokio::test]
#[serial]
async fn test_no_deprecation_warning_for_current_options() {
    capture();
    let _surface = BindingSurface::new(CalendarBindings::new(CalendarView::Month, jan(1)), WidgetConfig::default());
    assert_eq!(logged(Level::Warn, "deprecated"), 0);
}

#[tokio::test]
#[serial]
async fn test_invalid_event_is_warned_about_and_kept() {
    capture();
    let mut floating = CalendarEvent::default();
    floating.title = "No start".to_string();
    let mut controller = ViewStateController::new(CalendarView::Month, jan(1), WidgetConfig::default())
        .with_events(vec![floating]);
    controller.initialize(&BuiltinTemplates::new()).await;

    assert_eq!(controller.events().len(), 1);
    assert_eq!(logged(Level::Warn, "Event is missing the starts_at field"), 1);
}

#[tokio::test]
#[serial]
async fn test_template_rejection_logged_at_error_level() {
    capture();
    let mut overrides = TemplateOverrides::new();
    overrides.insert(TemplatePart::DayView, "nowhere.html".to_string());
    let mut controller = ViewStateController::new(CalendarView::Month, jan(1), WidgetConfig::default())
        .with_template_overrides(overrides);
    controller.initialize(&BuiltinTemplates::new()).await;

    assert_eq!(controller.state(), ControllerState::Failed);
    assert_eq!(logged(Level::Error, "Could not load all calendar templates"), 1);
    assert_eq!(logged(Level::Warn, "Could not load all calendar templates"), 0);
}

#[tokio::test]
#[serial]
async fn test_bad_title_pattern_is_warned_not_fatal() {
    capture();
    let mut config = WidgetConfig::default();
    config.title_formats.day = Some("%A %".to_string());
    let mut bindings = CalendarBindings::new(CalendarView::Day, jan(2));
    bindings.view_title = true;

    let mut surface = BindingSurface::new(bindings, config);
    surface.initialize(&BuiltinTemplates::new()).await;

    assert!(surface.controller().is_ready());
    assert_eq!(surface.view_title(), None);
    assert_eq!(logged(Level::Warn, "invalid title pattern for day view"), 1);
}
