pub mod measurement_service;
pub mod sensor_service;
pub mod system_service;

use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::domain::ownership::ResourceOwner;
use crate::domain::validation::DomainError;
use crate::filter::error::FilterError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("resource not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("{field}: {message}")]
    InvalidFilter { field: &'static str, message: String },
}

/// Object-level ownership gate. Denials surface as not-found so one owner
/// can never probe for the existence of another owner's resources.
pub(crate) fn ensure_owned(resource: ResourceOwner, identity: Uuid) -> Result<(), ServiceError> {
    if resource.owned_by(identity) {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_is_indistinguishable_from_missing() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let result = ensure_owned(ResourceOwner::System { owner }, stranger);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn owner_passes_the_gate() {
        let owner = Uuid::new_v4();
        assert!(ensure_owned(ResourceOwner::System { owner }, owner).is_ok());
    }
}
