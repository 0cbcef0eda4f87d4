//! schedule.rs — Validation and matching for the posting cadence.
//!
//! Validation runs at the API boundary; a malformed config never reaches
//! the repository. Matching is consulted by the trigger task once a minute.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::error::ScheduleError;
use crate::model::ScheduleConfig;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// All-or-nothing check of days and time-of-day.
pub fn validate(cfg: &ScheduleConfig) -> Result<(), ScheduleError> {
    if cfg.days.is_empty() {
        return Err(ScheduleError::EmptyDays);
    }
    for day in &cfg.days {
        if !WEEKDAYS.contains(&day.to_ascii_lowercase().as_str()) {
            return Err(ScheduleError::UnknownDay(day.clone()));
        }
    }
    parse_time(&cfg.time)?;
    Ok(())
}

/// Parses "HH:MM" (24h) into (hour, minute).
pub fn parse_time(s: &str) -> Result<(u32, u32), ScheduleError> {
    let bad = || ScheduleError::BadTime(s.to_string());
    let (h, m) = s.split_once(':').ok_or_else(bad)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(bad());
    }
    let hour: u32 = h.parse().map_err(|_| bad())?;
    let minute: u32 = m.parse().map_err(|_| bad())?;
    if hour > 23 || minute > 59 {
        return Err(bad());
    }
    Ok((hour, minute))
}

/// True when the config is enabled and `now` falls on a configured weekday
/// at the configured minute. The caller is responsible for firing at most
/// once per matching minute.
pub fn should_fire(cfg: &ScheduleConfig, now: DateTime<Utc>) -> bool {
    if !cfg.enabled {
        return false;
    }
    let Ok((hour, minute)) = parse_time(&cfg.time) else {
        return false;
    };
    let today = weekday_name(now.weekday());
    cfg.days.iter().any(|d| d.eq_ignore_ascii_case(today))
        && now.hour() == hour
        && now.minute() == minute
}

fn weekday_name(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
