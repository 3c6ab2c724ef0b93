// Recipe — a thin sequencer that trains and applies steps in order.
//
// Only what a step needs from its host lives here: role tracking for the
// schema, prep over training data, bake over new data, and tidy/print
// views across all steps.

use std::collections::BTreeMap;
use std::io::{self, Write};

use tracing::{debug, info};

use super::traits::{Step, TidyRow};
use crate::data::{Dataset, Schema};
use crate::error::{Result, StepError};

/// An ordered list of steps plus the column roles used to build schemas.
#[derive(Debug, Default)]
pub struct Recipe {
    steps: Vec<Box<dyn Step>>,
    roles: BTreeMap<String, String>,
    trained: bool,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step. Adding to a trained recipe is a state error.
    pub fn add_step(mut self, step: impl Step + 'static) -> Result<Self> {
        if self.trained {
            return Err(StepError::State(
                "cannot add steps to a trained recipe".to_string(),
            ));
        }
        self.steps.push(Box::new(step));
        Ok(self)
    }

    /// Tag a column with a role, visible to `has_role(..)` selectors.
    pub fn update_role(mut self, column: impl Into<String>, role: impl Into<String>) -> Self {
        self.roles.insert(column.into(), role.into());
        self
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    fn schema_for(&self, data: &Dataset) -> Schema {
        self.roles
            .iter()
            .fold(Schema::from_dataset(data), |schema, (column, role)| {
                schema.with_role(column, role)
            })
    }

    /// Train every step in order, feeding each one the output of the last.
    ///
    /// Steps marked `skip` still run on the training data here; they are
    /// only left out of `bake`.
    pub fn prep(&self, training: &Dataset) -> Result<Recipe> {
        let mut current = training.clone();
        let mut trained = Vec::with_capacity(self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            let schema = self.schema_for(&current);
            let fitted = step.train(&current, &schema)?;
            current = fitted.apply(&current)?;
            debug!(step = i + 1, kind = step.kind(), id = step.id(), "Prepped step");
            trained.push(fitted);
        }

        info!(
            steps = trained.len(),
            rows = training.n_rows(),
            "Recipe trained"
        );

        Ok(Recipe {
            steps: trained,
            roles: self.roles.clone(),
            trained: true,
        })
    }

    /// Apply the trained steps to new data, leaving out `skip` steps.
    pub fn bake(&self, data: &Dataset) -> Result<Dataset> {
        if !self.trained {
            return Err(StepError::State(
                "recipe must be prepped before it can bake data".to_string(),
            ));
        }

        let mut current = data.clone();
        for step in self.steps.iter().filter(|s| !s.skip()) {
            current = step.apply(&current)?;
        }
        Ok(current)
    }

    /// Tidy rows of every step, paired with the 1-based step number.
    pub fn tidy(&self) -> Vec<(usize, TidyRow)> {
        self.steps
            .iter()
            .enumerate()
            .flat_map(|(i, step)| step.describe().into_iter().map(move |row| (i + 1, row)))
            .collect()
    }

    /// Write one rendered line per step. The output is plain text.
    pub fn print<W: Write>(&self, out: &mut W, width: usize) -> io::Result<&Self> {
        writeln!(out, "Operations:")?;
        writeln!(out)?;
        for step in &self.steps {
            writeln!(out, "{}", step.render(width))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, ColumnData, Selector};
    use crate::steps::stem::StemStep;

    fn data() -> Dataset {
        Dataset::new(vec![Column::new(
            "text",
            ColumnData::Tokens(vec![vec!["running".to_string()]]),
        )])
        .unwrap()
    }

    #[test]
    fn test_bake_before_prep_is_state_error() {
        let recipe = Recipe::new()
            .add_step(StemStep::new(vec![Selector::name("text")]))
            .unwrap();
        assert!(matches!(recipe.bake(&data()), Err(StepError::State(_))));
    }

    #[test]
    fn test_add_after_prep_is_state_error() {
        let recipe = Recipe::new()
            .add_step(StemStep::new(vec![Selector::name("text")]))
            .unwrap()
            .prep(&data())
            .unwrap();
        assert!(recipe
            .add_step(StemStep::new(vec![Selector::name("text")]))
            .is_err());
    }

    #[test]
    fn test_prep_leaves_original_untrained() {
        let recipe = Recipe::new()
            .add_step(StemStep::new(vec![Selector::name("text")]))
            .unwrap();
        let prepped = recipe.prep(&data()).unwrap();
        assert!(!recipe.is_trained());
        assert!(!recipe.steps()[0].is_trained());
        assert!(prepped.is_trained());
        assert!(prepped.steps()[0].is_trained());
    }
}
