//! Capabilities checked before a bulk action runs, and the role grants
//! that back them.

use serde::{Deserialize, Serialize};

use crate::roles::{
    ROLE_ADMINISTRATOR, ROLE_ANNOTATOR, ROLE_MANAGER, ROLE_OWNER, ROLE_REVIEWER,
};

/// A capability a user may hold on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    TasksView,
    TasksChange,
    TasksDelete,
    AnnotationsCreate,
    AnnotationsChange,
    ProjectsChange,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Self::TasksView,
        Self::TasksChange,
        Self::TasksDelete,
        Self::AnnotationsCreate,
        Self::AnnotationsChange,
        Self::ProjectsChange,
    ];

    /// Return the wire-format string for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TasksView => "tasks_view",
            Self::TasksChange => "tasks_change",
            Self::TasksDelete => "tasks_delete",
            Self::AnnotationsCreate => "annotations_create",
            Self::AnnotationsChange => "annotations_change",
            Self::ProjectsChange => "projects_change",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const REVIEWER_GRANTS: &[Permission] = &[Permission::TasksView, Permission::AnnotationsChange];
const ANNOTATOR_GRANTS: &[Permission] = &[Permission::TasksView, Permission::AnnotationsCreate];

/// Permissions granted to `role`. Unknown roles hold nothing.
pub fn permissions_for_role(role: &str) -> &'static [Permission] {
    match role {
        ROLE_OWNER | ROLE_ADMINISTRATOR | ROLE_MANAGER => &Permission::ALL,
        ROLE_REVIEWER => REVIEWER_GRANTS,
        ROLE_ANNOTATOR => ANNOTATOR_GRANTS,
        _ => &[],
    }
}

/// Whether `role` holds `permission`.
pub fn role_has_permission(role: &str, permission: Permission) -> bool {
    permissions_for_role(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ALL_ROLES;

    #[test]
    fn managers_and_above_can_change_tasks() {
        for role in [ROLE_OWNER, ROLE_ADMINISTRATOR, ROLE_MANAGER] {
            assert!(role_has_permission(role, Permission::TasksChange), "{role}");
        }
    }

    #[test]
    fn annotators_and_reviewers_cannot_change_tasks() {
        assert!(!role_has_permission(ROLE_ANNOTATOR, Permission::TasksChange));
        assert!(!role_has_permission(ROLE_REVIEWER, Permission::TasksChange));
        assert!(role_has_permission(ROLE_ANNOTATOR, Permission::AnnotationsCreate));
    }

    #[test]
    fn unknown_role_holds_nothing() {
        assert!(permissions_for_role("guest").is_empty());
    }

    #[test]
    fn every_role_can_view_tasks() {
        for role in ALL_ROLES {
            assert!(role_has_permission(role, Permission::TasksView), "{role}");
        }
    }

    #[test]
    fn wire_names_round_trip_through_serde() {
        for permission in Permission::ALL {
            let json = serde_json::to_value(permission).unwrap();
            assert_eq!(json, permission.as_str());
        }
    }
}
