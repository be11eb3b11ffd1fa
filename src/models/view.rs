use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity the widget displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Year,
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub const ALL: [CalendarView; 4] = [Self::Year, Self::Month, Self::Week, Self::Day];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }

    /// View a click on a date cell drills down to. Day view has nowhere to go.
    pub fn next_view(&self) -> Option<CalendarView> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Week => Some(Self::Day),
            Self::Day => None,
        }
    }

    /// Start of the calendar unit containing `date`, as wall-clock time in `tz`.
    pub fn start_of(&self, date: DateTime<Utc>, tz: Tz, week_start: Weekday) -> NaiveDateTime {
        let day = date.with_timezone(&tz).date_naive();
        let first = match self {
            Self::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1),
            Self::Month => day.with_day(1),
            Self::Week => {
                let back = (7 + day.weekday().num_days_from_monday()
                    - week_start.num_days_from_monday())
                    % 7;
                day.checked_sub_days(Days::new(u64::from(back)))
            }
            Self::Day => Some(day),
        };
        first.unwrap_or(day).and_time(NaiveTime::default())
    }

    /// Whether both dates fall into the same calendar unit of this view.
    pub fn same_unit(&self, a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz, week_start: Weekday) -> bool {
        self.start_of(a, tz, week_start) == self.start_of(b, tz, week_start)
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            other => Err(format!("Unknown calendar view: {}", other)),
        }
    }
}

/// What the widget currently shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub view: CalendarView,
    pub view_date: DateTime<Utc>,
    pub title: Option<String>,
}

impl ViewState {
    pub fn new(view: CalendarView, view_date: DateTime<Utc>) -> Self {
        Self { view, view_date, title: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_drill_down_table() {
        assert_eq!(CalendarView::Year.next_view(), Some(CalendarView::Month));
        assert_eq!(CalendarView::Month.next_view(), Some(CalendarView::Day));
        assert_eq!(CalendarView::Week.next_view(), Some(CalendarView::Day));
        assert_eq!(CalendarView::Day.next_view(), None);
    }

    #[test]
    fn test_same_month() {
        let view = CalendarView::Month;
        assert!(view.same_unit(utc(2024, 1, 1, 0), utc(2024, 1, 31, 23), Tz::UTC, Weekday::Sun));
        assert!(!view.same_unit(utc(2024, 1, 31, 0), utc(2024, 2, 1, 0), Tz::UTC, Weekday::Sun));
    }

    #[test]
    fn test_week_respects_week_start() {
        // 2024-01-07 is a Sunday, 2024-01-08 a Monday
        let sunday = utc(2024, 1, 7, 12);
        let monday = utc(2024, 1, 8, 12);
        assert!(CalendarView::Week.same_unit(sunday, monday, Tz::UTC, Weekday::Sun));
        assert!(!CalendarView::Week.same_unit(sunday, monday, Tz::UTC, Weekday::Mon));
    }

    #[test]
    fn test_unit_is_computed_in_time_zone() {
        // 23:30 UTC on Jan 31st is already February in Berlin
        let late = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        let feb = utc(2024, 2, 2, 12);
        assert!(!CalendarView::Month.same_unit(late, feb, Tz::UTC, Weekday::Sun));
        assert!(CalendarView::Month.same_unit(late, feb, chrono_tz::Europe::Berlin, Weekday::Sun));
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("Month".parse::<CalendarView>(), Ok(CalendarView::Month));
        assert!("fortnight".parse::<CalendarView>().is_err());
    }
}
