//! Domain model structs.
//!
//! Each submodule contains `FromRow` + `Serialize` structs matching database
//! rows or joined read views. Inputs come from the typed step payloads in
//! `intake_core::onboarding_wizard`, so there are no separate update DTOs.

pub mod account;
pub mod catalog;
pub mod client;
pub mod selection;
