//! Appointments on the shop calendar
//!
//! An appointment is either created directly on the calendar or derived from
//! a service protocol (a read-mostly record of work in progress); the
//! `is_protocol` flag distinguishes the two. Lists handed out by the schedule
//! cache are always sorted ascending by `start`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::{AppointmentId, ClientId};
use crate::value_objects::DateRange;

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoShow => write!(f, "no_show"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(DomainError::parse(format!(
                "Unknown appointment status: {}",
                s
            ))),
        }
    }
}

/// A calendar entry for the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Derived from a service protocol rather than created directly.
    pub is_protocol: bool,
    pub client_id: Option<ClientId>,
    pub client_name: Option<String>,
    pub vehicle: Option<String>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Whether this appointment overlaps the given range, including one
    /// spanning the whole range.
    pub fn overlaps(&self, range: &DateRange) -> bool {
        range.contains(self.start)
            || range.contains(self.end)
            || (self.start <= range.start() && self.end >= range.end())
    }
}

/// Data for creating an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub client_id: Option<ClientId>,
    pub client_name: Option<String>,
    pub vehicle: Option<String>,
    pub notes: Option<String>,
}

impl NewAppointment {
    /// Materialize the appointment under a freshly assigned id.
    ///
    /// New appointments always start out `Scheduled` and are never
    /// protocol-derived.
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            status: AppointmentStatus::Scheduled,
            is_protocol: false,
            client_id: self.client_id,
            client_name: self.client_name,
            vehicle: self.vehicle,
            notes: self.notes,
        }
    }
}

/// Partial update applied to an existing appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub client_name: Option<String>,
    pub vehicle: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Apply every set field onto `appointment`.
    pub fn apply(&self, appointment: &mut Appointment) {
        if let Some(title) = &self.title {
            appointment.title = title.clone();
        }
        if let Some(start) = self.start {
            appointment.start = start;
        }
        if let Some(end) = self.end {
            appointment.end = end;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(client_name) = &self.client_name {
            appointment.client_name = Some(client_name.clone());
        }
        if let Some(vehicle) = &self.vehicle {
            appointment.vehicle = Some(vehicle.clone());
        }
        if let Some(notes) = &self.notes {
            appointment.notes = Some(notes.clone());
        }
    }
}
