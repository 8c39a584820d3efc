//! Error types for application services.

use detaildesk_domain::DomainError;

use crate::ports::outbound::ApiError;

/// Errors returned by mutating service operations.
///
/// Schedule loads never return an error: per-source failures degrade to
/// empty payloads recorded on the snapshot instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Domain(#[from] DomainError),
}
