use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use labelstack_core::types::{DbId, Timestamp};

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub title: String,
}

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub organization_id: DbId,
    pub email: String,
    pub username: String,
    /// One of the names in `labelstack_core::roles`.
    pub role: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub organization_id: DbId,
    pub email: String,
    pub username: String,
    pub role: String,
}
