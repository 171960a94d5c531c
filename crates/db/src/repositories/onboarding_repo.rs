//! Applies validated wizard steps to storage.

use std::time::Duration;

use intake_core::onboarding_wizard::{StepPayload, WizardStep};
use intake_core::reconcile::SelectionDiff;
use intake_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::TransactionError;
use crate::models::selection::SelectionRelation;
use crate::repositories::account_repo::UpdateManagerIdentity;
use crate::repositories::client_repo::{
    UpdateAdditionalInfo, UpdateClientPhone, UpdateDemographics, UpdateLocation,
};
use crate::repositories::selection_repo::SelectionRepo;
use crate::transaction::run_atomic;

/// What a step submission changed.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: WizardStep,
    /// Rows deleted/inserted, for the selection steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionDiff>,
    /// Whether the managing account was updated, for the contact step.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub account_updated: bool,
}

impl StepOutcome {
    fn plain(step: WizardStep) -> Self {
        Self {
            step,
            selection: None,
            account_updated: false,
        }
    }
}

pub struct OnboardingRepo;

impl OnboardingRepo {
    /// Persist one wizard step for a client as a single atomic unit.
    ///
    /// `payload` must already be validated. A client that does not exist
    /// fails with `RowNotFound` inside [`TransactionError::Operation`].
    pub async fn apply_step(
        pool: &PgPool,
        client_id: DbId,
        payload: &StepPayload,
        timeout: Duration,
    ) -> Result<StepOutcome, TransactionError> {
        let step = payload.step();

        match payload {
            StepPayload::Location(fields) => {
                let op = UpdateLocation { client_id, fields };
                run_atomic(pool, &[&op], timeout).await?;
                Ok(StepOutcome::plain(step))
            }
            StepPayload::Demographics(fields) => {
                let op = UpdateDemographics { client_id, fields };
                run_atomic(pool, &[&op], timeout).await?;
                Ok(StepOutcome::plain(step))
            }
            StepPayload::AdditionalInfo(fields) => {
                let op = UpdateAdditionalInfo { client_id, fields };
                run_atomic(pool, &[&op], timeout).await?;
                Ok(StepOutcome::plain(step))
            }
            StepPayload::ServiceChoice(fields) => {
                let diff = SelectionRepo::reconcile(
                    pool,
                    SelectionRelation::Services,
                    client_id,
                    &fields.service_ids,
                    timeout,
                )
                .await?;
                Ok(StepOutcome {
                    selection: Some(diff),
                    ..StepOutcome::plain(step)
                })
            }
            StepPayload::ProductChoice(fields) => {
                let diff = SelectionRepo::reconcile(
                    pool,
                    SelectionRelation::Products,
                    client_id,
                    &fields.product_ids,
                    timeout,
                )
                .await?;
                Ok(StepOutcome {
                    selection: Some(diff),
                    ..StepOutcome::plain(step)
                })
            }
            StepPayload::Contact(fields) => {
                let phone = UpdateClientPhone {
                    client_id,
                    phone: &fields.phone,
                };
                let account = UpdateManagerIdentity { client_id, fields };
                let account_updated = fields.has_account_changes();
                if account_updated {
                    run_atomic(pool, &[&phone, &account], timeout).await?;
                } else {
                    run_atomic(pool, &[&phone], timeout).await?;
                }
                Ok(StepOutcome {
                    account_updated,
                    ..StepOutcome::plain(step)
                })
            }
        }
    }
}
