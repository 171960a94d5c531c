//! Domain logic for the client onboarding wizard.
//!
//! Everything in this crate is storage-agnostic: step definitions and typed
//! payloads, validation, the selection diff used by the relation reconciler,
//! attachment kinds, and the file-storage contract.

pub mod attachments;
pub mod error;
pub mod file_storage;
pub mod onboarding_wizard;
pub mod reconcile;
pub mod types;
