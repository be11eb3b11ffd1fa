// Template loading
// The widget only needs its templates to exist before it starts reacting;
// what they contain is the renderer's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{WidgetError, WidgetResult};

pub mod file;
pub mod http;

pub use file::FileTemplateProvider;
pub use http::{HttpConfig, HttpTemplateProvider};

/// The separately overridable pieces of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplatePart {
    #[serde(rename = "calendar")]
    Calendar,
    #[serde(rename = "calendarYearView")]
    YearView,
    #[serde(rename = "calendarMonthView")]
    MonthView,
    #[serde(rename = "calendarMonthCell")]
    MonthCell,
    #[serde(rename = "calendarMonthCellEvents")]
    MonthCellEvents,
    #[serde(rename = "calendarWeekView")]
    WeekView,
    #[serde(rename = "calendarDayView")]
    DayView,
    #[serde(rename = "calendarHourList")]
    HourList,
    #[serde(rename = "calendarSlideBox")]
    SlideBox,
}

impl TemplatePart {
    pub const ALL: [TemplatePart; 9] = [
        Self::Calendar,
        Self::YearView,
        Self::MonthView,
        Self::MonthCell,
        Self::MonthCellEvents,
        Self::WeekView,
        Self::DayView,
        Self::HourList,
        Self::SlideBox,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::YearView => "calendarYearView",
            Self::MonthView => "calendarMonthView",
            Self::MonthCell => "calendarMonthCell",
            Self::MonthCellEvents => "calendarMonthCellEvents",
            Self::WeekView => "calendarWeekView",
            Self::DayView => "calendarDayView",
            Self::HourList => "calendarHourList",
            Self::SlideBox => "calendarSlideBox",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.name())
    }
}

impl fmt::Display for TemplatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host supplied replacement location per part.
pub type TemplateOverrides = HashMap<TemplatePart, String>;

/// Where a provider should look for `part`.
pub fn template_location(part: TemplatePart, overrides: &TemplateOverrides) -> String {
    overrides
        .get(&part)
        .cloned()
        .unwrap_or_else(|| part.file_name())
}

/// A complete set of loaded templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSet {
    sources: HashMap<TemplatePart, String>,
}

impl TemplateSet {
    pub fn insert(&mut self, part: TemplatePart, source: String) {
        self.sources.insert(part, source);
    }

    pub fn get(&self, part: TemplatePart) -> Option<&str> {
        self.sources.get(&part).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fails unless every part has a source.
    pub fn ensure_complete(self) -> WidgetResult<Self> {
        let missing: Vec<&str> = TemplatePart::ALL
            .iter()
            .filter(|part| !self.sources.contains_key(*part))
            .map(TemplatePart::name)
            .collect();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(WidgetError::template(format!("missing templates: {}", missing.join(", "))))
        }
    }
}

#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn load_templates(&self, overrides: &TemplateOverrides) -> WidgetResult<TemplateSet>;
}

/// In-memory template cache keyed by location, seeded with default markup.
#[derive(Debug, Clone)]
pub struct BuiltinTemplates {
    cache: HashMap<String, String>,
}

impl BuiltinTemplates {
    pub fn new() -> Self {
        let cache = TemplatePart::ALL
            .iter()
            .map(|part| {
                (part.file_name(), format!("<div class=\"cal-{}\"></div>", part.name()))
            })
            .collect();
        Self { cache }
    }

    /// Registers `source` under `location` so overrides can point at it.
    pub fn with_source(mut self, location: impl Into<String>, source: impl Into<String>) -> Self {
        self.cache.insert(location.into(), source.into());
        self
    }
}

impl Default for BuiltinTemplates {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateProvider for BuiltinTemplates {
    async fn load_templates(&self, overrides: &TemplateOverrides) -> WidgetResult<TemplateSet> {
        let mut set = TemplateSet::default();
        for part in TemplatePart::ALL {
            let location = template_location(part, overrides);
            let source = self.cache.get(&location).ok_or_else(|| {
                WidgetError::template(format!("no cached template for '{}' at '{}'", part, location))
            })?;
            set.insert(part, source.clone());
        }
        set.ensure_complete()
    }
}
