//! Entities - Objects with identity that persist over time

mod appointment;

pub use appointment::{Appointment, AppointmentPatch, AppointmentStatus, NewAppointment};
