// stemstep: stemming for tokenized text columns in preprocessing recipes
//
// This is the library root. `steps` holds the step contract and the stem
// step; `data` and `stem` are the collaborators it is trained and applied
// against.

pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod stem;
pub mod steps;

pub use error::{Result, StepError};
