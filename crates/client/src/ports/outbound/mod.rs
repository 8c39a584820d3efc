//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must
//! implement, allowing application services to interact with external
//! systems without depending on concrete implementations.

pub mod clock;
pub mod schedule_api;

pub use clock::ClockPort;
pub use schedule_api::{ApiError, ScheduleApiPort};

#[cfg(test)]
pub use clock::MockClockPort;
#[cfg(test)]
pub use schedule_api::MockScheduleApiPort;
