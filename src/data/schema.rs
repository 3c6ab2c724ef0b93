// Schema metadata — the column names, kinds and roles selectors resolve against.

use serde::{Deserialize, Serialize};

use super::dataset::{ColumnKind, Dataset};

/// One column as seen by selector resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    /// Role tag assigned by the host (e.g. "predictor", "outcome").
    pub role: Option<String>,
}

/// Ordered column metadata for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnInfo>,
}

impl Schema {
    /// Derive names and kinds from a dataset. No roles are assigned.
    pub fn from_dataset(data: &Dataset) -> Self {
        Self {
            columns: data
                .columns()
                .iter()
                .map(|c| ColumnInfo {
                    name: c.name.clone(),
                    kind: c.data.kind(),
                    role: None,
                })
                .collect(),
        }
    }

    /// Assign a role to a column. Unknown column names are ignored.
    pub fn with_role(mut self, column: &str, role: &str) -> Self {
        if let Some(info) = self.columns.iter_mut().find(|c| c.name == column) {
            info.role = Some(role.to_string());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
