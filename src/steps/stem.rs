// Stem step — reduce every token of selected token-list columns to its stem.
//
// Training resolves selectors and checks that each selected column holds
// token lists. It learns nothing from the token contents. Applying maps
// each token through the named stemmer, keeping row count, column order
// and list lengths intact.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::{new_id, Step, TidyRow};
use crate::data::{resolve, ColumnData, Dataset, Schema, Selector};
use crate::error::{Result, StepError};
use crate::output::format_names;
use crate::stem::{resolve_stemmer, StemOptions, DEFAULT_STEMMER};

/// Column selection state. The variant doubles as the trained flag.
///
/// Training never yields an empty `Resolved` list, so a saved step that
/// carries one is rejected on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColumnsRepr", into = "ColumnsRepr")]
pub enum Columns {
    /// Selector expressions as given at construction.
    Unresolved(Vec<Selector>),
    /// Concrete column names, fixed by training.
    Resolved(Vec<String>),
}

/// Wire form of `Columns`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "state", content = "columns", rename_all = "snake_case")]
enum ColumnsRepr {
    Unresolved(Vec<Selector>),
    Resolved(Vec<String>),
}

impl TryFrom<ColumnsRepr> for Columns {
    type Error = String;

    fn try_from(repr: ColumnsRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ColumnsRepr::Resolved(names) if names.is_empty() => {
                Err("a trained step must name at least one column".to_string())
            }
            ColumnsRepr::Resolved(names) => Ok(Self::Resolved(names)),
            ColumnsRepr::Unresolved(selectors) => Ok(Self::Unresolved(selectors)),
        }
    }
}

impl From<Columns> for ColumnsRepr {
    fn from(columns: Columns) -> Self {
        match columns {
            Columns::Unresolved(selectors) => Self::Unresolved(selectors),
            Columns::Resolved(names) => Self::Resolved(names),
        }
    }
}

/// Stemming step configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemStep {
    columns: Columns,
    /// Accepted for interface parity with other steps; stemming adds no columns.
    #[serde(default)]
    role: Option<String>,
    stemmer: String,
    #[serde(default)]
    options: StemOptions,
    #[serde(default)]
    skip: bool,
    id: String,
}

impl StemStep {
    /// Create an untrained step over the given selectors.
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self {
            columns: Columns::Unresolved(selectors),
            role: None,
            stemmer: DEFAULT_STEMMER.to_string(),
            options: StemOptions::new(),
            skip: false,
            id: new_id("stem"),
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the stemmer name. Not validated until the step is applied.
    pub fn stemmer(mut self, name: impl Into<String>) -> Self {
        self.stemmer = name.into();
        self
    }

    pub fn options(mut self, options: StemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Resolved column names, once trained.
    pub fn selected_columns(&self) -> Option<&[String]> {
        match &self.columns {
            Columns::Resolved(names) => Some(names),
            Columns::Unresolved(_) => None,
        }
    }

    pub fn stemmer_name(&self) -> &str {
        &self.stemmer
    }

    pub fn stem_options(&self) -> &StemOptions {
        &self.options
    }

    pub fn role_tag(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn step_id(&self) -> &str {
        &self.id
    }

    pub fn skips_bake(&self) -> bool {
        self.skip
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.columns, Columns::Resolved(_))
    }

    /// Resolve selectors and check column shapes, returning a trained copy.
    ///
    /// A step that is already trained keeps its resolved names; they are
    /// re-checked against `data`.
    pub fn train(&self, data: &Dataset, schema: &Schema) -> Result<StemStep> {
        let names = match &self.columns {
            Columns::Unresolved(selectors) => resolve(selectors, schema)?,
            Columns::Resolved(names) => names.clone(),
        };

        for name in &names {
            token_rows(data, name)?;
        }

        info!(
            id = %self.id,
            columns = names.len(),
            stemmer = %self.stemmer,
            "Trained stem step"
        );

        Ok(StemStep {
            columns: Columns::Resolved(names),
            ..self.clone()
        })
    }

    /// Stem every token of the selected columns, returning a new dataset.
    ///
    /// Factor columns anywhere in the output are converted to plain text.
    pub fn apply(&self, data: &Dataset) -> Result<Dataset> {
        let Columns::Resolved(names) = &self.columns else {
            return Err(StepError::State(format!(
                "stem step `{}` must be trained before it is applied",
                self.id
            )));
        };

        let build = resolve_stemmer(&self.stemmer)?;
        let stemmer = build(&self.options)?;

        let mut out = data.clone();
        for name in names {
            let rows = token_rows(data, name)?;
            let stemmed = rows
                .iter()
                .map(|tokens| stemmer.stem_tokens(tokens))
                .collect();
            out = out.with_column(name, ColumnData::Tokens(stemmed))?;
        }

        debug!(
            id = %self.id,
            rows = data.n_rows(),
            columns = names.len(),
            "Applied stem step"
        );

        Ok(out.factors_to_text())
    }

    /// Tidy rows: one per selector before training, one per column after.
    pub fn describe(&self) -> Vec<TidyRow> {
        match &self.columns {
            Columns::Unresolved(selectors) => selectors
                .iter()
                .map(|s| TidyRow {
                    terms: s.to_string(),
                    value: None,
                    id: self.id.clone(),
                })
                .collect(),
            Columns::Resolved(names) => names
                .iter()
                .map(|n| TidyRow {
                    terms: n.clone(),
                    value: Some(self.stemmer.clone()),
                    id: self.id.clone(),
                })
                .collect(),
        }
    }

    /// "Stemming for <columns>", with " [trained]" once trained.
    pub fn render(&self, width: usize) -> String {
        let (names, marker) = match &self.columns {
            Columns::Unresolved(selectors) => (
                format_names(
                    &selectors.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                    width,
                ),
                "",
            ),
            Columns::Resolved(names) => (format_names(names, width), " [trained]"),
        };
        format!("Stemming for {names}{marker}")
    }

    /// Write the rendered line to `out` and hand the step back for chaining.
    pub fn print<W: Write>(&self, out: &mut W, width: usize) -> io::Result<&Self> {
        writeln!(out, "{}", self.render(width))?;
        Ok(self)
    }
}

/// Borrow the rows of a token-list column, or explain why it isn't one.
fn token_rows<'a>(data: &'a Dataset, name: &str) -> Result<&'a [Vec<String>]> {
    let column = data.column(name).ok_or_else(|| {
        StepError::Selection(format!("column `{name}` is not present in the data"))
    })?;

    column.as_tokens().ok_or_else(|| StepError::Type {
        column: name.to_string(),
        found: column.kind().to_string(),
    })
}

impl Step for StemStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "stem"
    }

    fn is_trained(&self) -> bool {
        StemStep::is_trained(self)
    }

    fn skip(&self) -> bool {
        self.skip
    }

    fn train(&self, data: &Dataset, schema: &Schema) -> Result<Box<dyn Step>> {
        Ok(Box::new(StemStep::train(self, data, schema)?))
    }

    fn apply(&self, data: &Dataset) -> Result<Dataset> {
        StemStep::apply(self, data)
    }

    fn describe(&self) -> Vec<TidyRow> {
        StemStep::describe(self)
    }

    fn render(&self, width: usize) -> String {
        StemStep::render(self, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn toks(rows: &[&[&str]]) -> ColumnData {
        ColumnData::Tokens(
            rows.iter()
                .map(|r| r.iter().map(|t| t.to_string()).collect())
                .collect(),
        )
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new("text", toks(&[&["organizing", "organizes"], &[]])),
            Column::new("score", ColumnData::Numeric(vec![Some(1.0), None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let step = StemStep::new(vec![Selector::name("text")]);
        assert_eq!(step.stemmer_name(), "snowball");
        assert!(step.stem_options().is_empty());
        assert!(!step.skips_bake());
        assert!(!step.is_trained());
        assert!(step.step_id().starts_with("stem_"));
        assert!(step.selected_columns().is_none());
    }

    #[test]
    fn test_train_leaves_original_untrained() {
        let ds = sample();
        let step = StemStep::new(vec![Selector::name("text")]).id("stem_abc");
        let trained = step.train(&ds, &Schema::from_dataset(&ds)).unwrap();

        assert!(!step.is_trained());
        assert!(trained.is_trained());
        assert_eq!(trained.step_id(), "stem_abc");
        assert_eq!(trained.selected_columns(), Some(&["text".to_string()][..]));
    }

    #[test]
    fn test_train_rejects_scalar_column() {
        let ds = sample();
        let step = StemStep::new(vec![Selector::name("score")]);
        let err = step.train(&ds, &Schema::from_dataset(&ds)).unwrap_err();
        match err {
            StepError::Type { column, found } => {
                assert_eq!(column, "score");
                assert_eq!(found, "numeric");
            }
            other => panic!("expected type error, got {other}"),
        }
    }

    #[test]
    fn test_empty_row_stays_empty() {
        let ds = sample();
        let step = StemStep::new(vec![Selector::name("text")])
            .train(&ds, &Schema::from_dataset(&ds))
            .unwrap();
        let out = step.apply(&ds).unwrap();
        assert_eq!(out.column("text"), Some(&toks(&[&["organ", "organ"], &[]])));
        assert_eq!(out.column("score"), ds.column("score"));
    }

    #[test]
    fn test_apply_untrained_is_state_error() {
        let step = StemStep::new(vec![Selector::name("text")]);
        assert!(matches!(step.apply(&sample()), Err(StepError::State(_))));
    }

    #[test]
    fn test_render() {
        let ds = sample();
        let step = StemStep::new(vec![Selector::name("text"), Selector::EndsWith("_x".into())]);
        assert_eq!(step.render(60), "Stemming for text, ends_with(_x)");

        let trained = StemStep::new(vec![Selector::name("text")])
            .train(&ds, &Schema::from_dataset(&ds))
            .unwrap();
        assert_eq!(trained.render(60), "Stemming for text [trained]");
        assert_eq!(trained.render(2), "Stemming for te... [trained]");
    }

    #[test]
    fn test_print_returns_self() {
        let step = StemStep::new(vec![Selector::name("text")]);
        let mut buf = Vec::new();
        let back = step.print(&mut buf, 60).unwrap();
        assert_eq!(back, &step);
        assert_eq!(String::from_utf8(buf).unwrap(), "Stemming for text\n");
    }

    #[test]
    fn test_json_roundtrip_of_trained_step() {
        let ds = sample();
        let mut options = StemOptions::new();
        options.insert("language".into(), "english".into());
        let trained = StemStep::new(vec![Selector::StartsWith("te".into())])
            .options(options)
            .skip(true)
            .train(&ds, &Schema::from_dataset(&ds))
            .unwrap();

        let json = serde_json::to_string(&trained).unwrap();
        let back: StemStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trained);
        assert_eq!(back.apply(&ds).unwrap(), trained.apply(&ds).unwrap());
    }

    #[test]
    fn test_json_with_empty_resolved_columns_rejected() {
        let json = r#"{
            "columns": {"state": "resolved", "columns": []},
            "stemmer": "snowball",
            "id": "stem_empty"
        }"#;
        let err = serde_json::from_str::<StemStep>(json).unwrap_err();
        assert!(err.to_string().contains("at least one column"));

        let untrained = r#"{
            "columns": {"state": "unresolved", "columns": ["text"]},
            "stemmer": "snowball",
            "id": "stem_ok"
        }"#;
        let step: StemStep = serde_json::from_str(untrained).unwrap();
        assert!(!step.is_trained());
    }

    #[test]
    fn test_awkward_selector_names_survive_json() {
        let ds = Dataset::new(vec![
            Column::new("f(x)", toks(&[&["running"]])),
            Column::new("-x", toks(&[&["dogs"]])),
            Column::new(" padded ", toks(&[&["cats"]])),
        ])
        .unwrap();
        let step = StemStep::new(vec![
            Selector::name("f(x)"),
            Selector::name("-x"),
            Selector::name(" padded "),
        ]);

        let json = serde_json::to_string(&step).unwrap();
        let back: StemStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);

        let trained = back.train(&ds, &Schema::from_dataset(&ds)).unwrap();
        assert_eq!(
            trained.selected_columns().unwrap(),
            &["f(x)".to_string(), "-x".to_string(), " padded ".to_string()][..]
        );
    }
}
