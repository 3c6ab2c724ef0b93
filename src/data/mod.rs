// Host-side data model — datasets, schemas and column selectors.

pub mod dataset;
pub mod schema;
pub mod selector;

pub use dataset::{Column, ColumnData, ColumnKind, Dataset};
pub use schema::{ColumnInfo, Schema};
pub use selector::{resolve, Selector};
