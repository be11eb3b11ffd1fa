//! Advisory checks on host supplied events.
//!
//! Nothing here rejects an event. Every finding is logged and the event stays
//! in the working set.

use log::warn;
use std::fmt;

use crate::models::CalendarEvent;
use crate::utils::logging::{CHANGELOG_LINK, LOG_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventIssue {
    MissingStart,
    StartNotInstant,
    EndNotInstant,
    StartsAfterEnd,
    DeprecatedType,
}

impl fmt::Display for EventIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "Event is missing the starts_at field"),
            Self::StartNotInstant => write!(
                f,
                "Event starts_at should be a concrete date and time. Convert it to a UTC DateTime to fix it."
            ),
            Self::EndNotInstant => write!(
                f,
                "Event ends_at should be a concrete date and time. Convert it to a UTC DateTime to fix it."
            ),
            Self::StartsAfterEnd => write!(f, "Event cannot start after it finishes"),
            Self::DeprecatedType => write!(
                f,
                "Event type is deprecated, please see the changelog on how to upgrade: {}",
                CHANGELOG_LINK
            ),
        }
    }
}

/// Everything that looks wrong with `event`, in the order it is reported.
pub fn inspect_event(event: &CalendarEvent) -> Vec<EventIssue> {
    let mut issues = Vec::new();

    match &event.starts_at {
        None => issues.push(EventIssue::MissingStart),
        Some(start) if start.is_blank() => issues.push(EventIssue::MissingStart),
        Some(start) if !start.is_instant() => issues.push(EventIssue::StartNotInstant),
        Some(_) => {}
    }

    if let Some(end) = event.ends_at.as_ref().filter(|end| !end.is_blank()) {
        if !end.is_instant() {
            issues.push(EventIssue::EndNotInstant);
        }
        if let (Some(start), Some(end)) = (event.start_instant(), end.to_instant()) {
            if start > end {
                issues.push(EventIssue::StartsAfterEnd);
            }
        }
    }

    if event.event_type.is_some() && event.color.is_none() {
        issues.push(EventIssue::DeprecatedType);
    }

    issues
}

/// Logs every issue found on `event`. Always keeps the event.
pub fn validate_event(event: &CalendarEvent) -> bool {
    for issue in inspect_event(event) {
        warn!("{} {}: {:?}", LOG_PREFIX, issue, event);
    }
    true
}
