// Column selectors — declarative references to columns, resolved at train time.
//
// Selectors have a small textual syntax so they survive a JSON round trip
// and can be typed on the command line:
//
//   text                  exact column name
//   starts_with(tok)      name prefix
//   ends_with(_tok)       name suffix
//   contains(body)        name substring
//   matches(^t.*$)        name regex (regex-lite syntax)
//   has_role(predictor)   role tag assigned by the host
//   has_type(tokens)      column storage kind
//   everything()          all columns
//   name(-odd (name))     exact column name, taken verbatim
//   -<selector>           remove what the inner selector matches
//
// Function arguments are taken verbatim up to the final `)`. Names that
// would read back as something else are written in the `name(..)` form.

use std::fmt;
use std::str::FromStr;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::dataset::ColumnKind;
use super::schema::Schema;
use crate::error::{Result, StepError};

/// An unresolved column reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    Name(String),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    Matches(String),
    HasRole(String),
    HasKind(ColumnKind),
    Everything,
    Exclude(Box<Selector>),
}

impl Selector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn exclude(inner: Selector) -> Self {
        Self::Exclude(Box::new(inner))
    }

    pub fn is_exclusion(&self) -> bool {
        matches!(self, Self::Exclude(_))
    }

    /// Names of the schema columns this selector matches, in schema order.
    ///
    /// A `Name` that the schema lacks is an error rather than an empty
    /// match, so typos surface at train time.
    pub fn matches(&self, schema: &Schema) -> Result<Vec<String>> {
        let pick = |pred: &dyn Fn(&str) -> bool| -> Vec<String> {
            schema
                .columns
                .iter()
                .filter(|c| pred(&c.name))
                .map(|c| c.name.clone())
                .collect()
        };

        let matched = match self {
            Self::Name(name) => {
                if !schema.contains(name) {
                    return Err(StepError::Selection(format!(
                        "column `{name}` does not exist in the training data"
                    )));
                }
                vec![name.clone()]
            }
            Self::StartsWith(prefix) => pick(&|n: &str| n.starts_with(prefix.as_str())),
            Self::EndsWith(suffix) => pick(&|n: &str| n.ends_with(suffix.as_str())),
            Self::Contains(needle) => pick(&|n: &str| n.contains(needle.as_str())),
            Self::Matches(pattern) => {
                let re = Regex::new(pattern).map_err(|e| {
                    StepError::Selection(format!("invalid pattern in `{self}`: {e}"))
                })?;
                pick(&|n: &str| re.is_match(n))
            }
            Self::HasRole(role) => schema
                .columns
                .iter()
                .filter(|c| c.role.as_deref() == Some(role.as_str()))
                .map(|c| c.name.clone())
                .collect(),
            Self::HasKind(kind) => schema
                .columns
                .iter()
                .filter(|c| c.kind == *kind)
                .map(|c| c.name.clone())
                .collect(),
            Self::Everything => pick(&|_: &str| true),
            Self::Exclude(inner) => {
                let removed = inner.matches(schema)?;
                pick(&|n: &str| !removed.iter().any(|r| r == n))
            }
        };

        Ok(matched)
    }
}

/// Resolve selectors against a schema to an ordered list of column names.
///
/// Inclusions are unioned in selector order (schema order within one
/// selector) without duplicates; exclusions are then removed. A list of
/// only exclusions starts from every column. Any inclusion that matches
/// nothing, or an empty final result, is a selection error.
pub fn resolve(selectors: &[Selector], schema: &Schema) -> Result<Vec<String>> {
    if selectors.is_empty() {
        return Err(StepError::Selection(
            "no column selectors were given".to_string(),
        ));
    }

    let mut included: Vec<String> = Vec::new();
    let mut excluded: Vec<String> = Vec::new();

    if selectors.iter().all(Selector::is_exclusion) {
        included = Selector::Everything.matches(schema)?;
    }

    for selector in selectors {
        match selector {
            Selector::Exclude(inner) => excluded.extend(inner.matches(schema)?),
            other => {
                let matched = other.matches(schema)?;
                if matched.is_empty() {
                    return Err(StepError::Selection(format!(
                        "selector `{other}` did not match any columns"
                    )));
                }
                for name in matched {
                    if !included.contains(&name) {
                        included.push(name);
                    }
                }
            }
        }
    }

    included.retain(|name| !excluded.contains(name));

    if included.is_empty() {
        let shown: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        return Err(StepError::Selection(format!(
            "selectors [{}] resolved to no columns",
            shown.join(", ")
        )));
    }

    Ok(included)
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) if is_plain_name(name) => write!(f, "{name}"),
            Self::Name(name) => write!(f, "name({name})"),
            Self::StartsWith(s) => write!(f, "starts_with({s})"),
            Self::EndsWith(s) => write!(f, "ends_with({s})"),
            Self::Contains(s) => write!(f, "contains({s})"),
            Self::Matches(s) => write!(f, "matches({s})"),
            Self::HasRole(s) => write!(f, "has_role({s})"),
            Self::HasKind(kind) => write!(f, "has_type({kind})"),
            Self::Everything => write!(f, "everything()"),
            Self::Exclude(inner) => write!(f, "-{inner}"),
        }
    }
}

/// A name that parses back to itself without the `name(..)` wrapper.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name.trim() == name
        && !name.starts_with('-')
        && !name.contains(['(', ')'])
}

impl FromStr for Selector {
    type Err = StepError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StepError::Selection("empty selector".to_string()));
        }

        if let Some(rest) = value.strip_prefix('-') {
            return Ok(Self::exclude(rest.parse()?));
        }

        let call = value
            .strip_suffix(')')
            .and_then(|head| head.split_once('('));

        let Some((func, arg)) = call else {
            return Ok(Self::Name(value.to_string()));
        };

        let arg = arg.to_string();
        let selector = match func.trim() {
            "name" => Self::Name(arg),
            "starts_with" => Self::StartsWith(arg),
            "ends_with" => Self::EndsWith(arg),
            "contains" => Self::Contains(arg),
            "matches" => Self::Matches(arg),
            "has_role" => Self::HasRole(arg),
            "has_type" => Self::HasKind(ColumnKind::parse(arg.trim()).ok_or_else(|| {
                StepError::Selection(format!("unknown column type `{arg}` in `{value}`"))
            })?),
            "everything" if arg.is_empty() => Self::Everything,
            _ => {
                return Err(StepError::Selection(format!(
                    "unknown selector function in `{value}`"
                )))
            }
        };

        Ok(selector)
    }
}

impl TryFrom<String> for Selector {
    type Error = StepError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}
