use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid parameter: {}", .params.join(", "))]
    InvalidParameter { params: Vec<String> },
    #[error("missing parameter: {}", .params.join(", "))]
    MissingParameter { params: Vec<String> },
    #[error("{entity} not found: {id}")]
    EntityNotFound { entity: &'static str, id: String },
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn invalid_param(param: impl Into<String>) -> Self {
        Self::InvalidParameter { params: vec![param.into()] }
    }

    pub fn missing_param(param: impl Into<String>) -> Self {
        Self::MissingParameter { params: vec![param.into()] }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::EntityNotFound { entity, id: id.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidParameter { .. } => 2001,
            ServiceError::MissingParameter { .. } => 2002,
            ServiceError::EntityNotFound { .. } => 2003,
            ServiceError::Db(_) => 2100,
            ServiceError::Model(_) => 2101,
        }
    }

    /// Row-level failures from `models`; driver errors keep their message verbatim.
    pub fn from_model(err: ModelError) -> Self {
        match err {
            ModelError::Db(msg) => ServiceError::Db(msg),
            other => ServiceError::Model(other),
        }
    }
}
