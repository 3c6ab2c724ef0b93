// Step trait — the contract every preprocessing step kind implements.
//
// The host sequences steps through this trait only. Training returns a new
// boxed step instead of mutating the receiver, so an untrained step and its
// trained successor can coexist.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Schema};
use crate::error::Result;

/// One row of a step's tidy summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TidyRow {
    /// Resolved column name, or selector text before training.
    pub terms: String,
    /// Step-specific value; `None` until the step is trained.
    pub value: Option<String>,
    /// The owning step's id.
    pub id: String,
}

/// A preprocessing step with a train ("prep") and apply ("bake") phase.
pub trait Step: Send + Sync + std::fmt::Debug {
    /// Stable id assigned at construction.
    fn id(&self) -> &str;

    /// Short step-kind name (e.g. "stem").
    fn kind(&self) -> &'static str;

    fn is_trained(&self) -> bool;

    /// Whether the host should leave this step out when baking new data.
    fn skip(&self) -> bool;

    /// Learn whatever the step needs from training data.
    fn train(&self, data: &Dataset, schema: &Schema) -> Result<Box<dyn Step>>;

    /// Transform data with the trained step.
    fn apply(&self, data: &Dataset) -> Result<Dataset>;

    /// Tidy summary rows for introspection.
    fn describe(&self) -> Vec<TidyRow>;

    /// One-line human-readable summary, column list bounded by `width`.
    fn render(&self, width: usize) -> String;
}

/// Generate a step id: `prefix` followed by five random alphanumerics.
pub fn new_id(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(char::from)
        .collect();
    format!("{prefix}_{suffix}")
}
