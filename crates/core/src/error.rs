use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced row (catalog entry, account, status) does not exist.
    #[error("Reference error: {0}")]
    Reference(String),

    /// The file-storage collaborator failed or returned a partial batch.
    #[error("Upstream service error: {0}")]
    Upstream(String),
}
