//! Recurrence patterns for scheduled events
//!
//! A `RecurrencePattern` describes how a recurring event repeats: frequency,
//! interval, and an optional end condition. The end date and the occurrence
//! cap are mutually exclusive; a pattern carrying both never validates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(DomainError::parse(format!("Unknown frequency: {}", s))),
        }
    }
}

/// Day of the week for weekly patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Smallest valid day-of-month value.
pub const MIN_DAY_OF_MONTH: u8 = 1;
/// Largest valid day-of-month value.
pub const MAX_DAY_OF_MONTH: u8 = 31;

/// A recurrence rule for a scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrencePattern {
    pub frequency: RecurrenceFrequency,
    /// Repeat every `interval` periods (e.g. every 2 weeks). Must be >= 1.
    pub interval: u32,
    /// Required non-empty for weekly patterns.
    #[serde(default)]
    pub days_of_week: Vec<DayOfWeek>,
    /// Required for monthly patterns, in `1..=31`.
    pub day_of_month: Option<u8>,
    /// Last date the event may occur. Mutually exclusive with `max_occurrences`.
    pub end_date: Option<NaiveDate>,
    /// Total number of occurrences. Mutually exclusive with `end_date`.
    pub max_occurrences: Option<u32>,
}

impl RecurrencePattern {
    /// A daily pattern repeating every `interval` days.
    pub fn daily(interval: u32) -> Self {
        Self {
            frequency: RecurrenceFrequency::Daily,
            interval,
            days_of_week: Vec::new(),
            day_of_month: None,
            end_date: None,
            max_occurrences: None,
        }
    }

    /// A weekly pattern on the given days, repeating every `interval` weeks.
    pub fn weekly(interval: u32, days: Vec<DayOfWeek>) -> Self {
        Self {
            frequency: RecurrenceFrequency::Weekly,
            interval,
            days_of_week: days,
            day_of_month: None,
            end_date: None,
            max_occurrences: None,
        }
    }

    /// A monthly pattern on `day_of_month`, repeating every `interval` months.
    pub fn monthly(interval: u32, day_of_month: u8) -> Self {
        Self {
            frequency: RecurrenceFrequency::Monthly,
            interval,
            days_of_week: Vec::new(),
            day_of_month: Some(day_of_month),
            end_date: None,
            max_occurrences: None,
        }
    }

    /// Validate the pattern against its frequency-specific rules.
    ///
    /// `today` anchors the end-date check: an end date must fall strictly
    /// after it (tomorrow at the earliest, date-only comparison).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for out-of-range fields and
    /// `DomainError::Constraint` when both end conditions are set.
    pub fn validate(&self, today: NaiveDate) -> Result<(), DomainError> {
        if self.interval < 1 {
            return Err(DomainError::validation("Interval must be at least 1"));
        }

        match self.frequency {
            RecurrenceFrequency::Daily => {}
            RecurrenceFrequency::Weekly => {
                if self.days_of_week.is_empty() {
                    return Err(DomainError::validation(
                        "Weekly patterns need at least one day of the week",
                    ));
                }
            }
            RecurrenceFrequency::Monthly => match self.day_of_month {
                None => {
                    return Err(DomainError::validation(
                        "Monthly patterns need a day of the month",
                    ))
                }
                Some(day) if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&day) => {
                    return Err(DomainError::validation(format!(
                        "Day of month must be between {} and {}, got {}",
                        MIN_DAY_OF_MONTH, MAX_DAY_OF_MONTH, day
                    )));
                }
                Some(_) => {}
            },
        }

        if self.end_date.is_some() && self.max_occurrences.is_some() {
            return Err(DomainError::constraint(
                "End date and occurrence cap are mutually exclusive",
            ));
        }

        if let Some(end) = self.end_date {
            if end <= today {
                return Err(DomainError::validation(format!(
                    "End date {} must be in the future",
                    end
                )));
            }
        }

        if let Some(max) = self.max_occurrences {
            if max < 1 {
                return Err(DomainError::validation(
                    "Occurrence cap must be at least 1",
                ));
            }
        }

        Ok(())
    }
}
