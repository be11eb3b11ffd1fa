use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A start or end value as the host supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Instant(DateTime<Utc>),
    /// Anything that is not a concrete instant, e.g. a bare date string.
    Raw(Value),
}

impl EventTime {
    pub fn is_instant(&self) -> bool {
        matches!(self, Self::Instant(_))
    }

    /// Empty strings and nulls count as a missing value.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Instant(_) => false,
            Self::Raw(Value::Null) => true,
            Self::Raw(Value::String(s)) => s.trim().is_empty(),
            Self::Raw(_) => false,
        }
    }

    /// Best-effort reading of the value as an instant. Raw strings are read as
    /// RFC 3339, raw numbers as epoch milliseconds.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(at) => Some(*at),
            Self::Raw(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|at| at.with_timezone(&Utc)),
            Self::Raw(Value::Number(n)) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            Self::Raw(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Instant(at)
    }
}

/// Missing halves deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventColor {
    pub primary: String,
    pub secondary: String,
}

/// An event as the host hands it to the widget.
///
/// `id` is a positional overlay written on every refresh. It is never
/// serialized and plays no part in equality, so host data can be compared
/// against the working set without tripping over it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<EventTime>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
    /// Deprecated in favour of `color`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Host-defined fields, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    id: Option<usize>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, starts_at: DateTime<Utc>) -> Self {
        Self {
            starts_at: Some(EventTime::Instant(starts_at)),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn ending_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = Some(EventTime::Instant(ends_at));
        self
    }

    pub fn with_color(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.color = Some(EventColor {
            primary: primary.into(),
            secondary: secondary.into(),
        });
        self
    }

    /// Position in the working set as of the last refresh.
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, index: usize) {
        self.id = Some(index);
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.starts_at.as_ref().and_then(EventTime::to_instant)
    }

    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.ends_at.as_ref().and_then(EventTime::to_instant)
    }
}

impl PartialEq for CalendarEvent {
    fn eq(&self, other: &Self) -> bool {
        self.starts_at == other.starts_at
            && self.ends_at == other.ends_at
            && self.title == other.title
            && self.color == other.color
            && self.event_type == other.event_type
            && self.extra == other.extra
    }
}
