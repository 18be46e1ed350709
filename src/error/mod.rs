use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ConsoleError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ConsoleError::NotFound { entity, id: id.into() }
    }
}
