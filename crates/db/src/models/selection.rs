//! Many-to-many selection relations between clients and catalogs.

use serde::Serialize;

/// A join table linking clients to a catalog.
///
/// Table and column names are fixed per variant, so they are safe to splice
/// into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionRelation {
    Services,
    Products,
}

impl SelectionRelation {
    /// Join table name.
    pub fn join_table(self) -> &'static str {
        match self {
            Self::Services => "client_services",
            Self::Products => "client_products",
        }
    }

    /// Column in the join table referencing the catalog.
    pub fn catalog_column(self) -> &'static str {
        match self {
            Self::Services => "service_id",
            Self::Products => "product_id",
        }
    }

    /// Entity name used in errors and logs.
    pub fn entity(self) -> &'static str {
        match self {
            Self::Services => "Service",
            Self::Products => "Product",
        }
    }
}

impl std::fmt::Display for SelectionRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.join_table())
    }
}
