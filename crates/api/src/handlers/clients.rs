//! Handlers for client detail, wizard steps and attachment uploads.
//!
//! Every input (route segments, body) is parsed and validated before the
//! first storage call.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use intake_core::attachments::{ensure_complete_batch, validate_batch_size, AttachmentKind};
use intake_core::error::CoreError;
use intake_core::file_storage::{store_batch, UploadFile};
use intake_core::onboarding_wizard::{parse_client_id, StepPayload, WizardStep};
use intake_core::types::DbId;
use intake_db::repositories::{AttachmentRepo, ClientRepo, OnboardingRepo};
use intake_db::TransactionError;

use crate::error::{AppError, AppResult};
use crate::response::{AttachmentsAccepted, DataResponse, StepAccepted, STATUS_ACCEPTED};
use crate::state::AppState;

/// Multipart field carrying the uploaded files.
const FILES_FIELD: &str = "files";

/// GET /api/v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let client_id = parse_client_id(&raw_id)?;

    let detail = ClientRepo::find_detail(&state.pool, client_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }))?;

    tracing::debug!(client_id, "Loaded client detail");
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/clients/{id}/steps/{step}
///
/// The body is the step's field object. Unknown fields are ignored.
pub async fn apply_step(
    State(state): State<AppState>,
    Path((raw_id, step_name)): Path<(String, String)>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let client_id = parse_client_id(&raw_id)?;
    let step = WizardStep::from_name(&step_name)?;
    let Json(fields) =
        body.map_err(|e| CoreError::Validation(format!("Invalid request body: {}", e.body_text())))?;
    let payload = StepPayload::parse(step, &fields)?;

    let outcome =
        OnboardingRepo::apply_step(&state.pool, client_id, &payload, state.transaction_timeout())
            .await
            .map_err(|e| storage_failure(client_id, step.as_str(), e))?;

    match &outcome.selection {
        Some(diff) => tracing::info!(
            client_id,
            step = %step,
            deleted = diff.to_delete.len(),
            inserted = diff.to_insert.len(),
            "Wizard step applied"
        ),
        None => tracing::info!(
            client_id,
            step = %step,
            account_updated = outcome.account_updated,
            "Wizard step applied"
        ),
    }

    Ok(Json(DataResponse {
        data: StepAccepted {
            client_id,
            step,
            status: STATUS_ACCEPTED,
            selection: outcome.selection,
        },
    }))
}

/// POST /api/v1/clients/{id}/attachments/{kind}
///
/// Multipart body with one or more `files` parts. Every file is stored
/// before anything is appended; a partial batch appends nothing.
pub async fn upload_attachments(
    State(state): State<AppState>,
    Path((raw_id, kind_name)): Path<(String, String)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let client_id = parse_client_id(&raw_id)?;
    let kind = AttachmentKind::from_name(&kind_name)?;
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let files = read_upload_files(&mut multipart).await?;
    validate_batch_size(files.len())?;

    // Avoid storing orphan files for a client that does not exist.
    if !ClientRepo::exists(&state.pool, client_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }));
    }

    let urls = store_batch(
        state.file_storage.as_ref(),
        &state.config.file_storage.key_prefix,
        client_id,
        kind,
        &files,
    )
    .await?;
    ensure_complete_batch(files.len(), &urls)?;

    AttachmentRepo::append(&state.pool, client_id, kind, &urls, state.transaction_timeout())
        .await
        .map_err(|e| storage_failure(client_id, kind.as_str(), e))?;

    tracing::info!(
        client_id,
        kind = %kind,
        count = urls.len(),
        provider = state.file_storage.provider(),
        "Attachments appended"
    );

    Ok(Json(DataResponse {
        data: AttachmentsAccepted {
            client_id,
            kind,
            status: STATUS_ACCEPTED,
            urls,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Collect every `files` part of a multipart body, in order.
async fn read_upload_files(multipart: &mut Multipart) -> AppResult<Vec<UploadFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue; // ignore unknown fields
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        files.push(UploadFile {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    Ok(files)
}

/// Translate a failed atomic unit, logging it with request context.
///
/// A missing client row becomes a typed `NotFound` for a clearer message.
fn storage_failure(client_id: DbId, target: &str, err: TransactionError) -> AppError {
    tracing::warn!(
        client_id,
        target_name = target,
        operation = err.failed_operation().unwrap_or("-"),
        error = %err,
        "Storage unit failed"
    );
    match err.operation_error() {
        Some(sqlx::Error::RowNotFound) => AppError::Core(CoreError::NotFound {
            entity: "Client",
            id: client_id,
        }),
        _ => AppError::Transaction(err),
    }
}
