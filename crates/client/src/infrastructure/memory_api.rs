//! In-memory schedule adapter
//!
//! Serves seeded appointment and protocol fixtures behind the same port as
//! the HTTP adapter, with optional simulated latency. Used by the demo entry
//! point and anywhere a live backend is unavailable.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::RwLock;

use detaildesk_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, DateRange, NewAppointment,
};

use crate::ports::outbound::{ApiError, ScheduleApiPort};

pub struct InMemoryScheduleApi {
    appointments: RwLock<Vec<Appointment>>,
    protocols: RwLock<Vec<Appointment>>,
    latency: Duration,
}

impl InMemoryScheduleApi {
    pub fn new(appointments: Vec<Appointment>, protocols: Vec<Appointment>) -> Self {
        Self {
            appointments: RwLock::new(appointments),
            protocols: RwLock::new(protocols),
            latency: Duration::ZERO,
        }
    }

    /// Simulate network latency on every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// An adapter seeded with a small week of demo data around now.
    pub fn with_demo_data() -> Self {
        let now = Utc::now();
        let day = |offset: i64, hour: i64| now + ChronoDuration::days(offset) + ChronoDuration::hours(hour);

        let appointments = vec![
            Appointment {
                id: AppointmentId::new(),
                title: "Full exterior detail".to_string(),
                start: day(1, 1),
                end: day(1, 3),
                status: AppointmentStatus::Confirmed,
                is_protocol: false,
                client_id: None,
                client_name: Some("J. Alvarez".to_string()),
                vehicle: Some("2021 Mazda 3".to_string()),
                notes: Some("Swirl marks on hood".to_string()),
            },
            Appointment {
                id: AppointmentId::new(),
                title: "Interior deep clean".to_string(),
                start: day(2, 2),
                end: day(2, 4),
                status: AppointmentStatus::Scheduled,
                is_protocol: false,
                client_id: None,
                client_name: Some("M. Okafor".to_string()),
                vehicle: Some("2019 F-150".to_string()),
                notes: None,
            },
        ];

        let protocols = vec![Appointment {
            id: AppointmentId::new(),
            title: "R. Tanaka (2023 Model Y)".to_string(),
            start: day(0, 2),
            end: day(0, 4),
            status: AppointmentStatus::InProgress,
            is_protocol: true,
            client_id: None,
            client_name: Some("R. Tanaka".to_string()),
            vehicle: Some("2023 Model Y".to_string()),
            notes: Some("Ceramic coating, day 1 of 2".to_string()),
        }];

        Self::new(appointments, protocols)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn not_found(id: AppointmentId) -> ApiError {
        ApiError::Http {
            status: 404,
            message: format!("Appointment not found: {}", id),
        }
    }
}

#[async_trait]
impl ScheduleApiPort for InMemoryScheduleApi {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.simulate_latency().await;
        Ok(self.appointments.read().await.clone())
    }

    async fn fetch_protocols_as_appointments(
        &self,
        range: DateRange,
    ) -> Result<Vec<Appointment>, ApiError> {
        self.simulate_latency().await;
        Ok(self
            .protocols
            .read()
            .await
            .iter()
            .filter(|protocol| protocol.overlaps(&range))
            .cloned()
            .collect())
    }

    async fn create_appointment(&self, data: NewAppointment) -> Result<Appointment, ApiError> {
        self.simulate_latency().await;
        let appointment = data.into_appointment(AppointmentId::new());
        self.appointments.write().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ApiError> {
        self.simulate_latency().await;
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        patch.apply(appointment);
        Ok(appointment.clone())
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<(), ApiError> {
        self.simulate_latency().await;
        let mut appointments = self.appointments.write().await;
        let before = appointments.len();
        appointments.retain(|a| a.id != id);
        if appointments.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }

    async fn change_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        self.simulate_latency().await;
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        appointment.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range_around_now() -> DateRange {
        let today = Utc::now().date_naive();
        DateRange::from_dates(
            today - ChronoDuration::days(7),
            today + ChronoDuration::days(7),
        )
        .expect("valid range")
    }

    #[tokio::test]
    async fn protocols_are_filtered_by_range() {
        let api = InMemoryScheduleApi::with_demo_data();

        let hits = api
            .fetch_protocols_as_appointments(range_around_now())
            .await
            .expect("fetch succeeds");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].is_protocol);

        let far_future = DateRange::from_dates(
            NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2099, 1, 31).unwrap(),
        )
        .expect("valid range");
        let misses = api
            .fetch_protocols_as_appointments(far_future)
            .await
            .expect("fetch succeeds");
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn create_then_delete_round_trips() {
        let api = InMemoryScheduleApi::new(Vec::new(), Vec::new());
        let created = api
            .create_appointment(NewAppointment {
                title: "Paint correction".to_string(),
                start: Utc::now(),
                end: Utc::now() + ChronoDuration::hours(3),
                client_id: None,
                client_name: None,
                vehicle: None,
                notes: None,
            })
            .await
            .expect("create succeeds");

        assert_eq!(created.status, AppointmentStatus::Scheduled);
        assert_eq!(api.fetch_appointments().await.expect("fetch").len(), 1);

        api.delete_appointment(created.id).await.expect("delete");
        assert!(api.fetch_appointments().await.expect("fetch").is_empty());
    }

    #[tokio::test]
    async fn missing_appointment_maps_to_404() {
        let api = InMemoryScheduleApi::new(Vec::new(), Vec::new());
        let err = api
            .change_status(AppointmentId::new(), AppointmentStatus::Completed)
            .await
            .expect_err("must fail");
        assert!(matches!(err, ApiError::Http { status: 404, .. }));
    }
}
