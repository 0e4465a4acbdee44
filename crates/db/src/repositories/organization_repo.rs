//! Repositories for the `organizations` and `users` tables.

use sqlx::PgPool;
use labelstack_core::types::DbId;

use crate::models::organization::{CreateOrganization, CreateUser, Organization, User};

const ORG_COLUMNS: &str = "id, title, created_at, updated_at";

const USER_COLUMNS: &str =
    "id, organization_id, email, username, role, is_active, created_at, updated_at";

pub struct OrganizationRepo;

impl OrganizationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!("INSERT INTO organizations (title) VALUES ($1) RETURNING {ORG_COLUMNS}");
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (organization_id, email, username, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.organization_id)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find an active user by ID.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_active");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
