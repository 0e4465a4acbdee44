//! Task selection sent by the data manager alongside a bulk action.
//!
//! Wire format: `{"all": true, "excluded": [..]}` selects every task of the
//! project except the listed ones; `{"all": false, "included": [..]}`
//! selects exactly the listed ones.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSelection", into = "RawSelection")]
pub enum TaskSelection {
    All { excluded: Vec<DbId> },
    Only { included: Vec<DbId> },
}

impl TaskSelection {
    /// Every task of the project.
    pub fn all() -> Self {
        Self::All { excluded: Vec::new() }
    }

    pub fn only(ids: impl IntoIterator<Item = DbId>) -> Self {
        Self::Only {
            included: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, task_id: DbId) -> bool {
        match self {
            Self::All { excluded } => !excluded.contains(&task_id),
            Self::Only { included } => included.contains(&task_id),
        }
    }

    /// `(select_all, included, excluded)` in the shape the SQL layer binds.
    pub fn to_bind_parts(&self) -> (bool, Vec<DbId>, Vec<DbId>) {
        match self {
            Self::All { excluded } => (true, Vec::new(), excluded.clone()),
            Self::Only { included } => (false, included.clone(), Vec::new()),
        }
    }
}

impl Default for TaskSelection {
    fn default() -> Self {
        Self::Only { included: Vec::new() }
    }
}

#[derive(Serialize, Deserialize)]
struct RawSelection {
    #[serde(default)]
    all: bool,
    #[serde(default)]
    included: Vec<DbId>,
    #[serde(default)]
    excluded: Vec<DbId>,
}

impl From<RawSelection> for TaskSelection {
    fn from(raw: RawSelection) -> Self {
        if raw.all {
            Self::All {
                excluded: raw.excluded,
            }
        } else {
            Self::Only {
                included: raw.included,
            }
        }
    }
}

impl From<TaskSelection> for RawSelection {
    fn from(selection: TaskSelection) -> Self {
        match selection {
            TaskSelection::All { excluded } => Self {
                all: true,
                included: Vec::new(),
                excluded,
            },
            TaskSelection::Only { included } => Self {
                all: false,
                included,
                excluded: Vec::new(),
            },
        }
    }
}
