use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grid cell the renderer offers to the host's `cell_modifier` hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: DateTime<Utc>,
    pub label: String,
    pub in_month: bool,
    pub is_today: bool,
    pub css_class: Option<String>,
    pub badge_total: usize,
}
