//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Writes are exposed as
//! [`StorageOperation`](crate::transaction::StorageOperation) structs so they
//! can be composed into one atomic unit.

pub mod account_repo;
pub mod attachment_repo;
pub mod catalog_repo;
pub mod client_repo;
pub mod onboarding_repo;
pub mod selection_repo;

pub use account_repo::{AccountRepo, UpdateManagerIdentity};
pub use attachment_repo::{AppendAttachments, AttachmentRepo};
pub use catalog_repo::CatalogRepo;
pub use client_repo::{
    ClientRepo, UpdateAdditionalInfo, UpdateClientPhone, UpdateDemographics, UpdateLocation,
};
pub use onboarding_repo::{OnboardingRepo, StepOutcome};
pub use selection_repo::{ReconcileSelection, SelectionRepo};
