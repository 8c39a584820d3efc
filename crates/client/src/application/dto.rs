//! Wire DTOs for the CRM REST API
//!
//! The backend speaks camelCase JSON; these types keep that concern out of
//! the domain. Protocol records come back from their own endpoint and are
//! reshaped into protocol-derived appointments here.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use detaildesk_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, ClientId, DomainError,
    NewAppointment,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AppointmentDto {
    pub fn into_domain(self) -> Result<Appointment, DomainError> {
        Ok(Appointment {
            id: AppointmentId::from_uuid(self.id),
            title: self.title,
            start: self.start,
            end: self.end,
            status: self.status.parse()?,
            is_protocol: false,
            client_id: self.client_id.map(ClientId::from_uuid),
            client_name: self.client_name,
            vehicle: self.vehicle,
            notes: self.notes,
        })
    }
}

/// A service protocol as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolDto {
    pub id: Uuid,
    pub client_name: String,
    pub vehicle: String,
    pub scheduled_at: DateTime<Utc>,
    pub estimated_duration_minutes: u32,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProtocolDto {
    /// Reshape the protocol into a read-mostly calendar entry.
    pub fn into_appointment(self) -> Result<Appointment, DomainError> {
        let end = self.scheduled_at + Duration::minutes(i64::from(self.estimated_duration_minutes));
        Ok(Appointment {
            id: AppointmentId::from_uuid(self.id),
            title: format!("{} ({})", self.client_name, self.vehicle),
            start: self.scheduled_at,
            end,
            status: self.status.parse()?,
            is_protocol: true,
            client_id: None,
            client_name: Some(self.client_name),
            vehicle: Some(self.vehicle),
            notes: self.notes,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointmentDto {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<NewAppointment> for NewAppointmentDto {
    fn from(data: NewAppointment) -> Self {
        Self {
            title: data.title,
            start: data.start,
            end: data.end,
            client_id: data.client_id.map(ClientId::to_uuid),
            client_name: data.client_name,
            vehicle: data.vehicle,
            notes: data.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<AppointmentPatch> for AppointmentPatchDto {
    fn from(patch: AppointmentPatch) -> Self {
        Self {
            title: patch.title,
            start: patch.start,
            end: patch.end,
            status: patch.status.map(|s| s.to_string()),
            client_name: patch.client_name,
            vehicle: patch.vehicle,
            notes: patch.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeDto {
    pub status: String,
}

impl From<AppointmentStatus> for StatusChangeDto {
    fn from(status: AppointmentStatus) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_dto_decodes_camel_case() {
        let json = r#"{
            "id": "7f1f9a80-9b2e-4d2a-8c43-6a16cdd6a001",
            "title": "Interior detail",
            "start": "2025-03-05T09:00:00Z",
            "end": "2025-03-05T11:00:00Z",
            "status": "confirmed",
            "clientName": "M. Okafor"
        }"#;

        let dto: AppointmentDto = serde_json::from_str(json).expect("decodes");
        let appt = dto.into_domain().expect("maps to domain");
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.client_name.as_deref(), Some("M. Okafor"));
        assert!(!appt.is_protocol);
    }

    #[test]
    fn unknown_status_fails_the_mapping() {
        let json = r#"{
            "id": "7f1f9a80-9b2e-4d2a-8c43-6a16cdd6a001",
            "title": "Interior detail",
            "start": "2025-03-05T09:00:00Z",
            "end": "2025-03-05T11:00:00Z",
            "status": "definitely-not-a-status"
        }"#;

        let dto: AppointmentDto = serde_json::from_str(json).expect("decodes");
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn protocol_becomes_a_protocol_appointment() {
        let json = r#"{
            "id": "aab0c640-3f2d-44c5-90d9-5a6f9adf1b77",
            "clientName": "J. Alvarez",
            "vehicle": "2021 Mazda 3",
            "scheduledAt": "2025-03-02T10:00:00Z",
            "estimatedDurationMinutes": 90,
            "status": "in_progress"
        }"#;

        let dto: ProtocolDto = serde_json::from_str(json).expect("decodes");
        let appt = dto.into_appointment().expect("maps to domain");
        assert!(appt.is_protocol);
        assert_eq!(appt.title, "J. Alvarez (2021 Mazda 3)");
        assert_eq!((appt.end - appt.start).num_minutes(), 90);
    }

    #[test]
    fn patch_dto_skips_unset_fields() {
        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Completed),
            ..AppointmentPatch::default()
        };
        let value = serde_json::to_value(AppointmentPatchDto::from(patch)).expect("serializes");
        assert_eq!(value, serde_json::json!({ "status": "completed" }));
    }
}
