//! Attachment kinds and upload batch checks.
//!
//! A client carries two ordered URL lists, pictures and contract documents.
//! New URLs are only ever appended, one whole batch at a time.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum number of files accepted in a single upload batch.
pub const MAX_FILES_PER_BATCH: usize = 20;

/// Which attachment list on the client a batch is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Pictures,
    Contract,
}

impl AttachmentKind {
    /// Parse the kind from its route segment.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "pictures" => Ok(Self::Pictures),
            "contract" => Ok(Self::Contract),
            other => Err(CoreError::Validation(format!(
                "Unknown attachment kind '{other}'. Must be one of: pictures, contract"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pictures => "pictures",
            Self::Contract => "contract",
        }
    }

    /// Column on `clients` holding the URL list for this kind.
    pub fn column(self) -> &'static str {
        match self {
            Self::Pictures => "pictures",
            Self::Contract => "contract",
        }
    }
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate the size of an upload batch before anything is stored.
pub fn validate_batch_size(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "Upload batch must contain at least one file".to_string(),
        ));
    }
    if count > MAX_FILES_PER_BATCH {
        return Err(CoreError::Validation(format!(
            "Upload batch may contain at most {MAX_FILES_PER_BATCH} files, got {count}"
        )));
    }
    Ok(())
}

/// Check that the storage collaborator returned one URL per file.
///
/// A short or padded result means the batch was not fully stored and must
/// not be appended.
pub fn ensure_complete_batch(expected: usize, urls: &[String]) -> Result<(), CoreError> {
    if urls.len() != expected {
        return Err(CoreError::Upstream(format!(
            "File storage returned {} references for {expected} files",
            urls.len()
        )));
    }
    if urls.iter().any(|u| u.trim().is_empty()) {
        return Err(CoreError::Upstream(
            "File storage returned an empty reference".to_string(),
        ));
    }
    Ok(())
}
