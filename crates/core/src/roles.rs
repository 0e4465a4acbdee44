//! Well-known role name constants.
//!
//! These must match the `role` check constraint in
//! `20261019000001_create_organizations_and_users.sql`.

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_REVIEWER: &str = "reviewer";
pub const ROLE_ANNOTATOR: &str = "annotator";

/// Every role accepted by the auth layer.
pub const ALL_ROLES: &[&str] = &[
    ROLE_OWNER,
    ROLE_ADMINISTRATOR,
    ROLE_MANAGER,
    ROLE_REVIEWER,
    ROLE_ANNOTATOR,
];
