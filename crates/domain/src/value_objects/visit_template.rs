//! Visit templates for recurring service visits
//!
//! A recurring visit carries a template describing the work performed on
//! each occurrence: estimated duration and the default set of billable
//! services.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minimum duration for a service visit, in minutes.
pub const MIN_VISIT_DURATION_MINUTES: u32 = 15;

/// Minimum length of a service name, after trimming.
pub const MIN_SERVICE_NAME_LENGTH: usize = 2;

/// A single billable service on a visit template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub name: String,
    pub base_price: f64,
}

impl ServiceItem {
    pub fn new(name: impl Into<String>, base_price: f64) -> Self {
        Self {
            name: name.into(),
            base_price,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().len() < MIN_SERVICE_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Service name must be at least {} characters",
                MIN_SERVICE_NAME_LENGTH
            )));
        }
        if !self.base_price.is_finite() || self.base_price < 0.0 {
            return Err(DomainError::validation(format!(
                "Service price must be a non-negative number, got {}",
                self.base_price
            )));
        }
        Ok(())
    }
}

/// Template applied to every occurrence of a recurring visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitTemplate {
    pub estimated_duration_minutes: u32,
    pub default_services: Vec<ServiceItem>,
    pub notes: Option<String>,
}

impl VisitTemplate {
    pub fn new(estimated_duration_minutes: u32, default_services: Vec<ServiceItem>) -> Self {
        Self {
            estimated_duration_minutes,
            default_services,
            notes: None,
        }
    }

    /// Validate the template: duration floor, non-empty service list, and
    /// per-service name/price rules.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.estimated_duration_minutes < MIN_VISIT_DURATION_MINUTES {
            return Err(DomainError::validation(format!(
                "Visit duration must be at least {} minutes, got {}",
                MIN_VISIT_DURATION_MINUTES, self.estimated_duration_minutes
            )));
        }
        if self.default_services.is_empty() {
            return Err(DomainError::validation(
                "A visit template needs at least one service",
            ));
        }
        for service in &self.default_services {
            service.validate()?;
        }
        Ok(())
    }
}
