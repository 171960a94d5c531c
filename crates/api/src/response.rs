//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use intake_core::attachments::AttachmentKind;
use intake_core::onboarding_wizard::WizardStep;
use intake_core::reconcile::SelectionDiff;
use intake_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Status marker for accepted writes.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Body of a successful step submission.
#[derive(Debug, Serialize)]
pub struct StepAccepted {
    pub client_id: DbId,
    pub step: WizardStep,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionDiff>,
}

/// Body of a successful attachment upload.
#[derive(Debug, Serialize)]
pub struct AttachmentsAccepted {
    pub client_id: DbId,
    pub kind: AttachmentKind,
    pub status: &'static str,
    /// URLs appended by this batch, in upload order.
    pub urls: Vec<String>,
}
