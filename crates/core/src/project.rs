use crate::types::DbId;

/// The identity of the project an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: DbId,
    pub organization_id: DbId,
}
