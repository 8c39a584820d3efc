//! HTTP adapter for the CRM REST API

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use detaildesk_domain::{
    Appointment, AppointmentId, AppointmentPatch, AppointmentStatus, DateRange, NewAppointment,
};

use crate::application::dto::{
    AppointmentDto, AppointmentPatchDto, NewAppointmentDto, ProtocolDto, StatusChangeDto,
};
use crate::ports::outbound::{ApiError, ScheduleApiPort};

/// Default backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Environment variable naming the backend base URL.
pub const API_URL_ENV_VAR: &str = "DETAILDESK_API_URL";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the DetailDesk CRM REST API.
#[derive(Clone)]
pub struct HttpScheduleApi {
    client: Client,
    base_url: String,
}

impl HttpScheduleApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT_SECS)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `DETAILDESK_API_URL` environment variable,
    /// falling back to the default base URL if not set.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self::new(&base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

impl Default for HttpScheduleApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn decode(err: impl std::fmt::Display) -> ApiError {
    ApiError::Decode(err.to_string())
}

#[async_trait]
impl ScheduleApiPort for HttpScheduleApi {
    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/appointments"))
            .send()
            .await
            .map_err(network)?;
        let dtos: Vec<AppointmentDto> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(decode)?;
        dtos.into_iter()
            .map(|dto| dto.into_domain().map_err(decode))
            .collect()
    }

    async fn fetch_protocols_as_appointments(
        &self,
        range: DateRange,
    ) -> Result<Vec<Appointment>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/protocols"))
            .query(&[
                ("from", range.start().format("%Y-%m-%d").to_string()),
                ("to", range.end().format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await
            .map_err(network)?;
        let dtos: Vec<ProtocolDto> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(decode)?;
        dtos.into_iter()
            .map(|dto| dto.into_appointment().map_err(decode))
            .collect()
    }

    async fn create_appointment(&self, data: NewAppointment) -> Result<Appointment, ApiError> {
        let response = self
            .client
            .post(self.url("/api/appointments"))
            .json(&NewAppointmentDto::from(data))
            .send()
            .await
            .map_err(network)?;
        let dto: AppointmentDto = Self::check(response)
            .await?
            .json()
            .await
            .map_err(decode)?;
        dto.into_domain().map_err(decode)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> Result<Appointment, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/appointments/{}", id)))
            .json(&AppointmentPatchDto::from(patch))
            .send()
            .await
            .map_err(network)?;
        let dto: AppointmentDto = Self::check(response)
            .await?
            .json()
            .await
            .map_err(decode)?;
        dto.into_domain().map_err(decode)
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/appointments/{}", id)))
            .send()
            .await
            .map_err(network)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn change_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/appointments/{}/status", id)))
            .json(&StatusChangeDto::from(status))
            .send()
            .await
            .map_err(network)?;
        Self::check(response).await?;
        Ok(())
    }
}
