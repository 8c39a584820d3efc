//! Schedule API port - boundary to the CRM backend
//!
//! The REST API is an opaque boundary: application services only ever see
//! this trait. Adapters (`HttpScheduleApi`, `InMemoryScheduleApi`) implement
//! it; tests substitute the generated mock.

use async_trait::async_trait;

use detaildesk_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, DateRange, NewAppointment,
};

/// Errors surfaced by schedule API adapters.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("Request failed: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded into domain types.
    #[error("Invalid response: {0}")]
    Decode(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleApiPort: Send + Sync {
    /// Fetch every directly-created appointment.
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, ApiError>;

    /// Fetch service protocols scheduled within `range`, shaped as
    /// appointments (`is_protocol = true`).
    async fn fetch_protocols_as_appointments(
        &self,
        range: DateRange,
    ) -> Result<Vec<Appointment>, ApiError>;

    async fn create_appointment(&self, data: NewAppointment) -> Result<Appointment, ApiError>;

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ApiError>;

    async fn delete_appointment(&self, id: AppointmentId) -> Result<(), ApiError>;

    async fn change_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), ApiError>;
}
