//! Client entity model and the joined detail view shown on the review page.

use intake_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub manager_id: DbId,
    pub status_id: Option<StatusId>,
    pub business_name: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub micromarket_location: Option<String>,
    pub neighborhood_info: Option<String>,
    pub demographics: Option<String>,
    pub number_of_people: Option<i32>,
    pub target_age_group: Option<String>,
    pub industry: Option<String>,
    pub dimensions: Option<String>,
    pub wugs_visit: Option<String>,
    pub pictures: Vec<String>,
    pub contract: Vec<String>,
    pub last_active: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A client joined with its status label, manager identity and selections.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientDetail {
    pub client_id: DbId,
    pub business_name: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub hours_of_operation: Option<String>,
    pub micromarket_location: Option<String>,
    pub neighborhood_info: Option<String>,
    pub demographics: Option<String>,
    pub number_of_people: Option<i32>,
    pub target_age_group: Option<String>,
    pub industry: Option<String>,
    pub dimensions: Option<String>,
    pub wugs_visit: Option<String>,
    pub pictures: Vec<String>,
    pub contract: Vec<String>,
    pub last_active: Timestamp,
    pub status_name: Option<String>,
    pub manager_id: DbId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub service_ids: Vec<DbId>,
    pub service_names: Vec<String>,
    pub product_ids: Vec<DbId>,
    pub product_types: Vec<String>,
}
