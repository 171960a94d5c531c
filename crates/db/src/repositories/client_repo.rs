//! Repository for the `clients` table.

use async_trait::async_trait;
use intake_core::onboarding_wizard::{AdditionalInfoFields, DemographicsFields, LocationFields};
use intake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::client::{Client, ClientDetail};
use crate::transaction::StorageOperation;

/// Column list for the `clients` table.
const COLUMNS: &str = "id, manager_id, status_id, business_name, address_street, address_city, \
    address_state, address_zip, website, phone, hours_of_operation, micromarket_location, \
    neighborhood_info, demographics, number_of_people, target_age_group, industry, \
    dimensions, wugs_visit, pictures, contract, last_active, created_at, updated_at";

/// Column list for the joined detail view.
const DETAIL_COLUMNS: &str = "c.id AS client_id, c.business_name, c.address_street, \
    c.address_city, c.address_state, c.address_zip, c.website, c.phone, \
    c.hours_of_operation, c.micromarket_location, c.neighborhood_info, c.demographics, \
    c.number_of_people, c.target_age_group, c.industry, c.dimensions, c.wugs_visit, \
    c.pictures, c.contract, c.last_active, s.status_name, c.manager_id, \
    a.first_name, a.last_name, a.username, \
    ARRAY(SELECT cs.service_id FROM client_services cs \
          WHERE cs.client_id = c.id ORDER BY cs.service_id) AS service_ids, \
    ARRAY(SELECT sv.service_name FROM client_services cs \
          JOIN services sv ON sv.id = cs.service_id \
          WHERE cs.client_id = c.id ORDER BY cs.service_id) AS service_names, \
    ARRAY(SELECT cp.product_id FROM client_products cp \
          WHERE cp.client_id = c.id ORDER BY cp.product_id) AS product_ids, \
    ARRAY(SELECT p.product_type FROM client_products cp \
          JOIN products p ON p.id = cp.product_id \
          WHERE cp.client_id = c.id ORDER BY cp.product_id) AS product_types";

/// Read access to clients. Writes go through the operation structs below.
pub struct ClientRepo;

impl ClientRepo {
    /// Find a client by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a client with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Find a client joined with status, manager and selections.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ClientDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} \
             FROM clients c \
             JOIN accounts a ON a.id = c.manager_id \
             LEFT JOIN statuses s ON s.id = c.status_id \
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, ClientDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Fail with `RowNotFound` when an update matched no client.
pub(crate) fn ensure_matched(rows_affected: u64) -> Result<(), sqlx::Error> {
    if rows_affected == 0 {
        Err(sqlx::Error::RowNotFound)
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scalar step updates
// ---------------------------------------------------------------------------

/// Apply the `location` step. Required fields are overwritten, absent
/// optional fields keep their stored value.
pub struct UpdateLocation<'a> {
    pub client_id: DbId,
    pub fields: &'a LocationFields,
}

#[async_trait]
impl StorageOperation for UpdateLocation<'_> {
    fn name(&self) -> &'static str {
        "update_client_location"
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let f = self.fields;
        let result = sqlx::query(
            "UPDATE clients SET \
                business_name = $2, \
                address_street = COALESCE($3, address_street), \
                address_city = COALESCE($4, address_city), \
                address_state = COALESCE($5, address_state), \
                address_zip = $6, \
                website = COALESCE($7, website), \
                phone = COALESCE($8, phone), \
                hours_of_operation = COALESCE($9, hours_of_operation), \
                micromarket_location = COALESCE($10, micromarket_location), \
                last_active = NOW() \
             WHERE id = $1",
        )
        .bind(self.client_id)
        .bind(&f.business_name)
        .bind(&f.address_street)
        .bind(&f.address_city)
        .bind(&f.address_state)
        .bind(&f.address_zip)
        .bind(&f.website)
        .bind(&f.phone)
        .bind(&f.hours_of_operation)
        .bind(&f.micromarket_location)
        .execute(conn)
        .await?;
        ensure_matched(result.rows_affected())
    }
}

/// Apply the `demographics` step.
pub struct UpdateDemographics<'a> {
    pub client_id: DbId,
    pub fields: &'a DemographicsFields,
}

#[async_trait]
impl StorageOperation for UpdateDemographics<'_> {
    fn name(&self) -> &'static str {
        "update_client_demographics"
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let f = self.fields;
        let result = sqlx::query(
            "UPDATE clients SET \
                number_of_people = COALESCE($2, number_of_people), \
                demographics = COALESCE($3, demographics), \
                neighborhood_info = COALESCE($4, neighborhood_info), \
                industry = COALESCE($5, industry), \
                target_age_group = COALESCE($6, target_age_group), \
                last_active = NOW() \
             WHERE id = $1",
        )
        .bind(self.client_id)
        .bind(f.number_of_people)
        .bind(&f.demographics)
        .bind(&f.neighborhood_info)
        .bind(&f.industry)
        .bind(&f.target_age_group)
        .execute(conn)
        .await?;
        ensure_matched(result.rows_affected())
    }
}

/// Apply the `additional_info` step.
pub struct UpdateAdditionalInfo<'a> {
    pub client_id: DbId,
    pub fields: &'a AdditionalInfoFields,
}

#[async_trait]
impl StorageOperation for UpdateAdditionalInfo<'_> {
    fn name(&self) -> &'static str {
        "update_client_additional_info"
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET \
                dimensions = COALESCE($2, dimensions), \
                wugs_visit = COALESCE($3, wugs_visit), \
                last_active = NOW() \
             WHERE id = $1",
        )
        .bind(self.client_id)
        .bind(&self.fields.dimensions)
        .bind(&self.fields.wugs_visit)
        .execute(conn)
        .await?;
        ensure_matched(result.rows_affected())
    }
}

/// Client half of the `contact` step.
pub struct UpdateClientPhone<'a> {
    pub client_id: DbId,
    pub phone: &'a str,
}

#[async_trait]
impl StorageOperation for UpdateClientPhone<'_> {
    fn name(&self) -> &'static str {
        "update_client_phone"
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE clients SET phone = $2, last_active = NOW() WHERE id = $1",
        )
        .bind(self.client_id)
        .bind(self.phone)
        .execute(conn)
        .await?;
        ensure_matched(result.rows_affected())
    }
}
