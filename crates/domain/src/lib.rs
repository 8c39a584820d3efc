pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

// Re-export entities (explicit list in entities/mod.rs)
pub use entities::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};

pub use error::DomainError;

// Re-export ID types
pub use ids::{AppointmentId, ClientId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    DateRange, DayOfWeek, EventDraft, RangeKey, RecurrenceFrequency, RecurrencePattern,
    ScheduleEventType, ServiceItem, VisitTemplate,
};
