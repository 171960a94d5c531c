//! Request handlers, grouped by resource.

pub mod catalog;
pub mod clients;
