//! The recurring-event wizard draft
//!
//! `EventDraft` is the plain mutable value the wizard edits field by field.
//! It is created with defaults when the wizard opens and discarded on cancel
//! or after a successful submission. The `event_type` discriminant selects
//! which validation branch applies on the final step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{RecurrencePattern, VisitTemplate};

/// Minimum title length, after trimming.
pub const MIN_TITLE_LENGTH: usize = 3;

/// The kind of schedule event being created.
///
/// A simple event is a plain calendar entry; a recurring visit additionally
/// carries a `VisitTemplate` describing the work performed per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleEventType {
    SimpleEvent,
    RecurringVisit,
}

impl fmt::Display for ScheduleEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimpleEvent => write!(f, "simple_event"),
            Self::RecurringVisit => write!(f, "recurring_visit"),
        }
    }
}

impl FromStr for ScheduleEventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple_event" => Ok(Self::SimpleEvent),
            "recurring_visit" => Ok(Self::RecurringVisit),
            _ => Err(DomainError::parse(format!("Unknown event type: {}", s))),
        }
    }
}

/// The in-progress recurring-event form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    /// `None` until the user picks a type.
    pub event_type: Option<ScheduleEventType>,
    pub recurrence: Option<RecurrencePattern>,
    /// Required iff `event_type` is `RecurringVisit`.
    pub visit_template: Option<VisitTemplate>,
}

impl EventDraft {
    /// Validate the basic-info fields: a usable title and a chosen type.
    pub fn validate_basics(&self) -> Result<(), DomainError> {
        if self.title.trim().len() < MIN_TITLE_LENGTH {
            return Err(DomainError::validation(format!(
                "Title must be at least {} characters",
                MIN_TITLE_LENGTH
            )));
        }
        if self.event_type.is_none() {
            return Err(DomainError::validation("An event type must be chosen"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_draft_fails_basics() {
        assert!(EventDraft::default().validate_basics().is_err());
    }

    #[test]
    fn short_title_fails_basics() {
        let draft = EventDraft {
            title: "Ab".to_string(),
            event_type: Some(ScheduleEventType::SimpleEvent),
            ..EventDraft::default()
        };
        assert!(draft.validate_basics().is_err());
    }

    #[test]
    fn whitespace_padding_does_not_count() {
        let draft = EventDraft {
            title: " a ".to_string(),
            event_type: Some(ScheduleEventType::SimpleEvent),
            ..EventDraft::default()
        };
        assert!(draft.validate_basics().is_err());
    }

    #[test]
    fn missing_type_fails_basics() {
        let draft = EventDraft {
            title: "Weekly fleet wash".to_string(),
            ..EventDraft::default()
        };
        assert!(draft.validate_basics().is_err());
    }

    #[test]
    fn three_character_title_with_type_passes() {
        let draft = EventDraft {
            title: "Abc".to_string(),
            event_type: Some(ScheduleEventType::SimpleEvent),
            ..EventDraft::default()
        };
        assert!(draft.validate_basics().is_ok());
    }

    #[test]
    fn event_type_serializes_as_snake_case() {
        let value = serde_json::to_value(ScheduleEventType::RecurringVisit).expect("serializes");
        assert_eq!(value, serde_json::json!("recurring_visit"));
    }

    #[test]
    fn event_type_round_trips_through_strings() {
        for kind in [
            ScheduleEventType::SimpleEvent,
            ScheduleEventType::RecurringVisit,
        ] {
            let parsed: ScheduleEventType = kind.to_string().parse().expect("round trip");
            assert_eq!(parsed, kind);
        }
    }
}
