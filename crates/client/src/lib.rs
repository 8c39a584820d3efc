//! DetailDesk client library.
//!
//! This crate is the data layer of the DetailDesk CRM client.
//!
//! ## Structure
//!
//! - `ports/` - Outbound interfaces to the CRM backend and the clock
//! - `application/` - Services (schedule cache, event wizard) and DTOs
//! - `infrastructure/` - Adapters implementing the outbound ports

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::services::{EventWizard, ScheduleService};
pub use application::ServiceError;
