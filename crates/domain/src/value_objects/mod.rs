//! Value objects - Immutable objects defined by their attributes

mod date_range;
mod event_draft;
mod recurrence;
mod visit_template;

pub use date_range::{DateRange, RangeKey};

pub use event_draft::{EventDraft, ScheduleEventType, MIN_TITLE_LENGTH};

pub use recurrence::{
    DayOfWeek, RecurrenceFrequency, RecurrencePattern, MAX_DAY_OF_MONTH, MIN_DAY_OF_MONTH,
};

pub use visit_template::{
    ServiceItem, VisitTemplate, MIN_SERVICE_NAME_LENGTH, MIN_VISIT_DURATION_MINUTES,
};
