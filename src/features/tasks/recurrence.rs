//! Recurring-task scheduling.
//!
//! A recurring task is a template anchored at its original due date. The rule
//! decides which calendar dates carry an occurrence; completion advances the
//! template's due date to the next occurrence instead of archiving it.
//!
//! Weekdays use 0 = Sunday through 6 = Saturday, matching the stored encoding.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Recurring tasks require a due date")]
    MissingAnchor,
    #[error("Unknown recurrence interval '{0}'")]
    UnknownInterval(String),
    #[error("Weekly recurrence requires at least one weekday")]
    EmptyWeekDays,
    #[error("Weekdays must be 0 (Sunday) through 6 (Saturday)")]
    InvalidWeekDay(u8),
    #[error("Weekday set '{0}' is not a comma-separated list of numbers")]
    MalformedWeekDays(String),
    #[error("Monthly recurrence requires a day of month")]
    MissingDayOfMonth,
    #[error("Day of month must be between 1 and 31")]
    InvalidDayOfMonth(i32),
    #[error("End date cannot be before the first due date")]
    EndBeforeAnchor,
}

/// Which dates the schedule lands on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceKind {
    /// Every day
    Daily,
    /// Any day whose weekday is in the set
    Weekly { days: BTreeSet<u8> },
    /// The given day each month, clamped to the month's last day when the
    /// month is shorter (day 31 lands on Feb 28/29, Apr 30, ...)
    Monthly { day: u8 },
    /// The anchor's month and day each year; a Feb 29 anchor clamps to
    /// Feb 28 in non-leap years
    Yearly,
}

/// A validated recurrence rule. `end_date` is inclusive: the schedule stops
/// producing occurrences strictly after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub kind: RecurrenceKind,
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Build a rule from its flat parts, rejecting invalid combinations.
    /// `anchor` is the task's due date; recurrence is meaningless without one.
    pub fn from_parts(
        interval: &str,
        week_days: &[u8],
        day_of_month: Option<i32>,
        end_date: Option<NaiveDate>,
        anchor: Option<NaiveDate>,
    ) -> Result<Self, RecurrenceError> {
        let anchor = anchor.ok_or(RecurrenceError::MissingAnchor)?;

        let kind = match interval {
            "daily" => RecurrenceKind::Daily,
            "weekly" => {
                if week_days.is_empty() {
                    return Err(RecurrenceError::EmptyWeekDays);
                }
                if let Some(&bad) = week_days.iter().find(|d| **d > 6) {
                    return Err(RecurrenceError::InvalidWeekDay(bad));
                }
                RecurrenceKind::Weekly {
                    days: week_days.iter().copied().collect(),
                }
            }
            "monthly" => {
                let day = day_of_month.ok_or(RecurrenceError::MissingDayOfMonth)?;
                if !(1..=31).contains(&day) {
                    return Err(RecurrenceError::InvalidDayOfMonth(day));
                }
                RecurrenceKind::Monthly { day: day as u8 }
            }
            "yearly" => RecurrenceKind::Yearly,
            other => return Err(RecurrenceError::UnknownInterval(other.to_string())),
        };

        if let Some(end) = end_date {
            if end < anchor {
                return Err(RecurrenceError::EndBeforeAnchor);
            }
        }

        Ok(Self { kind, end_date })
    }

    /// Parse a rule from its stored column encoding, where the weekday set
    /// is a comma-separated string like `"1,3"`.
    pub fn from_columns(
        interval: &str,
        week_days: Option<&str>,
        day_of_month: Option<i32>,
        end_date: Option<NaiveDate>,
        anchor: Option<NaiveDate>,
    ) -> Result<Self, RecurrenceError> {
        let days = match week_days {
            Some(raw) => parse_week_days(raw)?,
            None => Vec::new(),
        };
        Self::from_parts(interval, &days, day_of_month, end_date, anchor)
    }

    /// Interval name as stored in the database
    pub fn interval_name(&self) -> &'static str {
        match self.kind {
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly { .. } => "weekly",
            RecurrenceKind::Monthly { .. } => "monthly",
            RecurrenceKind::Yearly => "yearly",
        }
    }

    /// Weekday set in its stored column encoding, when weekly
    pub fn week_days_column(&self) -> Option<String> {
        match &self.kind {
            RecurrenceKind::Weekly { days } => Some(
                days.iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }

    /// Day-of-month in its stored column encoding, when monthly
    pub fn day_of_month_column(&self) -> Option<i32> {
        match self.kind {
            RecurrenceKind::Monthly { day } => Some(i32::from(day)),
            _ => None,
        }
    }

    /// Does the schedule produce an occurrence on `date`?
    pub fn is_due_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if date < anchor {
            return false;
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        self.kind.lands_on(anchor, date)
    }

    /// Smallest date strictly after `after` carrying an occurrence, or `None`
    /// when the schedule ends first.
    pub fn next_occurrence(&self, anchor: NaiveDate, after: NaiveDate) -> Option<NaiveDate> {
        let mut date = if after < anchor {
            anchor
        } else {
            after.succ_opt()?
        };

        // Every valid kind lands at least once per 366-day window
        for _ in 0..=366 {
            if let Some(end) = self.end_date {
                if date > end {
                    return None;
                }
            }
            if self.kind.lands_on(anchor, date) {
                return Some(date);
            }
            date = date.succ_opt()?;
        }
        None
    }
}

impl RecurrenceKind {
    fn lands_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        match self {
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekly { days } => {
                days.contains(&(date.weekday().num_days_from_sunday() as u8))
            }
            RecurrenceKind::Monthly { day } => {
                let target = u32::from(*day).min(last_day_of_month(date.year(), date.month()));
                date.day() == target
            }
            RecurrenceKind::Yearly => {
                let target = anchor
                    .day()
                    .min(last_day_of_month(date.year(), anchor.month()));
                date.month() == anchor.month() && date.day() == target
            }
        }
    }
}

fn parse_week_days(raw: &str) -> Result<Vec<u8>, RecurrenceError> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse::<u8>()
                .map_err(|_| RecurrenceError::MalformedWeekDays(raw.to_string()))
        })
        .collect()
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(interval: &str, week_days: &[u8], day: Option<i32>, end: Option<NaiveDate>) -> RecurrenceRule {
        RecurrenceRule::from_parts(interval, week_days, day, end, Some(date(2024, 1, 1))).unwrap()
    }

    #[test]
    fn test_daily_due_every_day_from_anchor() {
        let r = rule("daily", &[], None, None);
        let anchor = date(2024, 1, 1);
        assert!(r.is_due_on(anchor, date(2024, 1, 1)));
        assert!(r.is_due_on(anchor, date(2024, 1, 2)));
        assert!(r.is_due_on(anchor, date(2025, 6, 30)));
        assert!(!r.is_due_on(anchor, date(2023, 12, 31)));
    }

    #[test]
    fn test_weekly_mon_wed() {
        // 2024-01-01 is a Monday
        let r = rule("weekly", &[1, 3], None, None);
        let anchor = date(2024, 1, 1);
        assert!(r.is_due_on(anchor, date(2024, 1, 1)));
        assert!(!r.is_due_on(anchor, date(2024, 1, 2)));
        assert!(r.is_due_on(anchor, date(2024, 1, 3)));
        assert!(r.is_due_on(anchor, date(2024, 1, 8)));
    }

    #[test]
    fn test_weekly_sunday_is_zero() {
        // 2024-01-07 is a Sunday
        let r = rule("weekly", &[0], None, None);
        assert!(r.is_due_on(date(2024, 1, 1), date(2024, 1, 7)));
        assert!(!r.is_due_on(date(2024, 1, 1), date(2024, 1, 6)));
    }

    #[test]
    fn test_monthly_day_31_clamps_to_short_months() {
        let r = rule("monthly", &[], Some(31), None);
        let anchor = date(2024, 1, 1);
        assert!(r.is_due_on(anchor, date(2024, 1, 31)));
        // 2024 is a leap year, so February clamps to the 29th
        assert!(r.is_due_on(anchor, date(2024, 2, 29)));
        assert!(!r.is_due_on(anchor, date(2024, 2, 28)));
        assert!(r.is_due_on(anchor, date(2024, 4, 30)));
        assert!(!r.is_due_on(anchor, date(2024, 4, 29)));
    }

    #[test]
    fn test_monthly_day_31_clamps_to_feb_28_in_common_year() {
        let r = RecurrenceRule::from_parts("monthly", &[], Some(31), None, Some(date(2023, 1, 31)))
            .unwrap();
        assert!(r.is_due_on(date(2023, 1, 31), date(2023, 2, 28)));
        assert!(!r.is_due_on(date(2023, 1, 31), date(2023, 2, 27)));
    }

    #[test]
    fn test_yearly_matches_anchor_month_day() {
        let r = rule("yearly", &[], None, None);
        let anchor = date(2024, 3, 15);
        assert!(r.is_due_on(anchor, date(2024, 3, 15)));
        assert!(r.is_due_on(anchor, date(2025, 3, 15)));
        assert!(!r.is_due_on(anchor, date(2025, 3, 14)));
    }

    #[test]
    fn test_yearly_feb_29_anchor_clamps_in_common_years() {
        let anchor = date(2024, 2, 29);
        let r = RecurrenceRule::from_parts("yearly", &[], None, None, Some(anchor)).unwrap();
        assert!(r.is_due_on(anchor, date(2025, 2, 28)));
        assert!(r.is_due_on(anchor, date(2028, 2, 29)));
        assert!(!r.is_due_on(anchor, date(2028, 2, 28)));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let r = rule("daily", &[], None, Some(date(2024, 1, 5)));
        let anchor = date(2024, 1, 1);
        assert!(r.is_due_on(anchor, date(2024, 1, 5)));
        assert!(!r.is_due_on(anchor, date(2024, 1, 6)));
    }

    #[test]
    fn test_next_occurrence_daily() {
        let r = rule("daily", &[], None, None);
        assert_eq!(
            r.next_occurrence(date(2024, 1, 1), date(2024, 1, 1)),
            Some(date(2024, 1, 2))
        );
    }

    #[test]
    fn test_next_occurrence_weekly_skips_to_set_day() {
        let r = rule("weekly", &[1, 3], None, None);
        assert_eq!(
            r.next_occurrence(date(2024, 1, 1), date(2024, 1, 3)),
            Some(date(2024, 1, 8))
        );
    }

    #[test]
    fn test_next_occurrence_ends_at_end_date() {
        // Weekly Mon/Wed, end 2024-01-02: after completing the Jan 1
        // occurrence the next landing (Jan 3) is past the end
        let r = rule("weekly", &[1, 3], None, Some(date(2024, 1, 2)));
        assert_eq!(r.next_occurrence(date(2024, 1, 1), date(2024, 1, 1)), None);
    }

    #[test]
    fn test_next_occurrence_monthly_from_clamped_day() {
        let r = rule("monthly", &[], Some(31), None);
        assert_eq!(
            r.next_occurrence(date(2024, 1, 1), date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
        assert_eq!(
            r.next_occurrence(date(2024, 1, 1), date(2024, 2, 29)),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn test_next_occurrence_yearly() {
        let r = rule("yearly", &[], None, None);
        assert_eq!(
            r.next_occurrence(date(2024, 1, 1), date(2024, 1, 1)),
            Some(date(2025, 1, 1))
        );
    }

    #[test]
    fn test_next_occurrence_before_anchor_starts_at_anchor() {
        let r = rule("daily", &[], None, None);
        assert_eq!(
            r.next_occurrence(date(2024, 1, 10), date(2024, 1, 1)),
            Some(date(2024, 1, 10))
        );
    }

    #[test]
    fn test_rejects_missing_anchor() {
        assert_eq!(
            RecurrenceRule::from_parts("daily", &[], None, None, None),
            Err(RecurrenceError::MissingAnchor)
        );
    }

    #[test]
    fn test_rejects_empty_weekly_set() {
        assert_eq!(
            RecurrenceRule::from_parts("weekly", &[], None, None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::EmptyWeekDays)
        );
    }

    #[test]
    fn test_rejects_out_of_range_weekday() {
        assert_eq!(
            RecurrenceRule::from_parts("weekly", &[7], None, None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::InvalidWeekDay(7))
        );
    }

    #[test]
    fn test_rejects_day_of_month_out_of_range() {
        assert_eq!(
            RecurrenceRule::from_parts("monthly", &[], Some(32), None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::InvalidDayOfMonth(32))
        );
        assert_eq!(
            RecurrenceRule::from_parts("monthly", &[], Some(0), None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::InvalidDayOfMonth(0))
        );
    }

    #[test]
    fn test_rejects_monthly_without_day() {
        assert_eq!(
            RecurrenceRule::from_parts("monthly", &[], None, None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::MissingDayOfMonth)
        );
    }

    #[test]
    fn test_rejects_unknown_interval() {
        assert!(matches!(
            RecurrenceRule::from_parts("fortnightly", &[], None, None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::UnknownInterval(_))
        ));
    }

    #[test]
    fn test_rejects_end_before_anchor() {
        assert_eq!(
            RecurrenceRule::from_parts(
                "daily",
                &[],
                None,
                Some(date(2023, 12, 31)),
                Some(date(2024, 1, 1))
            ),
            Err(RecurrenceError::EndBeforeAnchor)
        );
    }

    #[test]
    fn test_rejects_malformed_weekday_column() {
        assert_eq!(
            RecurrenceRule::from_columns("weekly", Some("1,x"), None, None, Some(date(2024, 1, 1))),
            Err(RecurrenceError::MalformedWeekDays("1,x".to_string()))
        );
    }

    #[test]
    fn test_column_round_trip() {
        let r = rule("weekly", &[3, 1], None, None);
        assert_eq!(r.week_days_column().as_deref(), Some("1,3"));
        let parsed = RecurrenceRule::from_columns(
            "weekly",
            r.week_days_column().as_deref(),
            None,
            None,
            Some(date(2024, 1, 1)),
        )
        .unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2023, 2), 28);
        assert_eq!(last_day_of_month(2024, 12), 31);
        assert_eq!(last_day_of_month(2024, 4), 30);
    }
}
