//! Application services
//!
//! - `schedule_service` - the range-keyed schedule cache and its mutations
//! - `event_wizard` - admission control for the recurring-event wizard

pub mod event_wizard;
pub mod schedule_service;

pub use event_wizard::{can_proceed, can_submit, EventWizard, FieldErrors, WizardStep};
pub use schedule_service::{
    CacheConfig, ScheduleCache, ScheduleService, ScheduleSnapshot, ScheduleSource, ScheduleStats,
    SourceError,
};
