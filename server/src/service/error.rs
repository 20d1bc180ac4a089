use bulb_types::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{resource} not found with {field} : '{value}'")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Failed to {action}: {source:#}")]
    Storage {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ServiceError {
    pub fn bulb_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "LightBulb",
            field: "id",
            value: id.to_string(),
        }
    }

    pub(crate) fn storage(action: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Storage { action, source }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
