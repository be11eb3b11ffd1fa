use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

pub mod logging;

/// Anything the host may hand over as a clicked date.
pub trait IntoInstant {
    fn into_instant(self, tz: Tz) -> DateTime<Utc>;
}

impl<Z: TimeZone> IntoInstant for DateTime<Z> {
    fn into_instant(self, _tz: Tz) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl IntoInstant for NaiveDateTime {
    fn into_instant(self, tz: Tz) -> DateTime<Utc> {
        local_to_utc(tz, self)
    }
}

impl IntoInstant for NaiveDate {
    fn into_instant(self, tz: Tz) -> DateTime<Utc> {
        local_to_utc(tz, self.and_time(chrono::NaiveTime::default()))
    }
}

/// Resolves a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; times skipped by a DST gap are read as UTC wall-clock.
pub fn local_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}
