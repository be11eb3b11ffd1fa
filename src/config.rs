//! Widget configuration
//!
//! Settings the host picks once per widget: the time zone calendar units are
//! computed in, the first day of the week, title patterns and where
//! templates live.

use chrono::Weekday;
use chrono_tz::Tz;
use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use std::env;
use std::path::PathBuf;

use crate::error::{WidgetError, WidgetResult};
use crate::templates::HttpConfig;
use crate::title::TitleFormats;
use crate::utils::logging::LOG_PREFIX;

lazy_static! {
    static ref CLOCK_TIME: Regex = Regex::new(r"^([01]?\d|2[0-3]):[0-5]\d$").unwrap();
    static ref POSITIVE_INT: Regex = Regex::new(r"^[1-9]\d*$").unwrap();
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub timezone: Tz,
    pub week_starts_on: Weekday,
    pub title_formats: TitleFormats,
    pub template_dir: Option<PathBuf>,
    pub http: HttpConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            week_starts_on: Weekday::Sun,
            title_formats: TitleFormats::default(),
            template_dir: None,
            http: HttpConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Defaults overridden by `CALWIDGET_TZ`, `CALWIDGET_WEEK_START` and
    /// `CALWIDGET_TEMPLATE_DIR`.
    pub fn from_env() -> WidgetResult<Self> {
        let mut config = Self::default();

        if let Ok(tz) = env::var("CALWIDGET_TZ") {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|e| WidgetError::config(format!("unknown time zone '{}': {}", tz, e)))?;
        }
        if let Ok(day) = env::var("CALWIDGET_WEEK_START") {
            config.week_starts_on = day
                .parse::<Weekday>()
                .map_err(|_| WidgetError::config(format!("unknown weekday '{}'", day)))?;
        }
        if let Ok(dir) = env::var("CALWIDGET_TEMPLATE_DIR") {
            config.template_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

/// Checks the configuration before a widget is built from it.
pub fn validate_config(config: &WidgetConfig) -> WidgetResult<()> {
    let invalid = config.title_formats.invalid_views();
    if !invalid.is_empty() {
        let views: Vec<String> = invalid.iter().map(ToString::to_string).collect();
        return Err(WidgetError::config(format!(
            "invalid title pattern for {} view",
            views.join(", ")
        )));
    }
    if config.http.timeout.is_zero() {
        return Err(WidgetError::config("template request timeout must be positive"));
    }
    info!("{} configuration valid (time zone {}, week starts {})",
          LOG_PREFIX, config.timezone, config.week_starts_on);
    Ok(())
}

/// Day view options exactly as the host bound them. The renderer interprets
/// them; the widget only forwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayViewOptions {
    pub start: String,
    pub end: String,
    pub split: String,
    pub event_chunk_size: Option<String>,
}

impl Default for DayViewOptions {
    fn default() -> Self {
        Self {
            start: "00:00".to_string(),
            end: "23:59".to_string(),
            split: "30".to_string(),
            event_chunk_size: None,
        }
    }
}

impl DayViewOptions {
    /// Names of options whose text the renderer is unlikely to understand.
    pub fn suspicious_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if !CLOCK_TIME.is_match(self.start.trim()) {
            fields.push("day_view_start");
        }
        if !CLOCK_TIME.is_match(self.end.trim()) {
            fields.push("day_view_end");
        }
        if !POSITIVE_INT.is_match(self.split.trim()) {
            fields.push("day_view_split");
        }
        if let Some(size) = &self.event_chunk_size {
            if !POSITIVE_INT.is_match(size.trim()) {
                fields.push("day_view_event_chunk_size");
            }
        }
        fields
    }

    pub(crate) fn warn_if_suspicious(&self) {
        for field in self.suspicious_fields() {
            warn!("{} {} does not look like the expected format: {:?}", LOG_PREFIX, field, self);
        }
    }
}
