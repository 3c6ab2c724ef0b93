// Tabular dataset — ordered, named, typed columns of equal length.
//
// Steps never mutate a dataset in place. `with_column` and
// `factors_to_text` return a new value and leave the receiver untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepError};

/// The storage type of a column, used by schemas and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Factor,
    Numeric,
    Tokens,
}

impl ColumnKind {
    /// Returns the user-facing name used in selectors and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Factor => "factor",
            Self::Numeric => "numeric",
            Self::Tokens => "tokens",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "string" | "character" => Some(Self::Text),
            "factor" | "categorical" => Some(Self::Factor),
            "numeric" | "number" => Some(Self::Numeric),
            "tokens" | "tokenlist" | "token_list" => Some(Self::Tokens),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-row values of one column.
///
/// A missing row in a token-list column is represented by an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    /// Categorical text: each row is an index into `levels` (or missing).
    Factor {
        levels: Vec<String>,
        codes: Vec<Option<usize>>,
    },
    Numeric(Vec<Option<f64>>),
    Tokens(Vec<Vec<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::Factor { .. } => ColumnKind::Factor,
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Tokens(_) => ColumnKind::Tokens,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Factor { codes, .. } => codes.len(),
            Self::Numeric(v) => v.len(),
            Self::Tokens(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the rows of a token-list column.
    pub fn as_tokens(&self) -> Option<&[Vec<String>]> {
        match self {
            Self::Tokens(rows) => Some(rows),
            _ => None,
        }
    }

    /// Convert a factor to plain text; any other column is returned as is.
    ///
    /// A code pointing past the level table becomes a missing value.
    pub fn into_text_if_factor(self) -> Self {
        match self {
            Self::Factor { levels, codes } => Self::Text(
                codes
                    .into_iter()
                    .map(|code| code.and_then(|i| levels.get(i).cloned()))
                    .collect(),
            ),
            other => other,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// An ordered collection of equal-length columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.data.len();
            for column in &columns {
                if column.data.len() != expected {
                    return Err(StepError::Dataset(format!(
                        "column `{}` has {} rows, expected {}",
                        column.name,
                        column.data.len(),
                        expected
                    )));
                }
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(StepError::Dataset(format!(
                    "duplicate column name `{}`",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.data)
    }

    /// Return a copy with `name` replaced by `data`, keeping its position.
    ///
    /// The replacement must have the same row count, and the column must
    /// already exist.
    pub fn with_column(&self, name: &str, data: ColumnData) -> Result<Self> {
        if data.len() != self.n_rows() {
            return Err(StepError::Dataset(format!(
                "replacement for `{}` has {} rows, expected {}",
                name,
                data.len(),
                self.n_rows()
            )));
        }

        let position = self
            .columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StepError::Dataset(format!("no column named `{name}`")))?;

        let mut columns = self.columns.clone();
        columns[position].data = data;
        Ok(Self { columns })
    }

    /// Convert every factor column to plain text, leaving the rest alone.
    pub fn factors_to_text(self) -> Self {
        Self {
            columns: self
                .columns
                .into_iter()
                .map(|c| Column {
                    name: c.name,
                    data: c.data.into_text_if_factor(),
                })
                .collect(),
        }
    }

    /// Parse a dataset from its JSON form, with the same checks as `new`.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            columns: Vec<Column>,
        }

        let raw: Raw = serde_json::from_str(json)?;
        Self::new(raw.columns)
    }
}
