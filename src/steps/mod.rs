// Preprocessing steps — the Step trait, the stem step, and a thin recipe host.

pub mod recipe;
pub mod stem;
pub mod traits;

pub use recipe::Recipe;
pub use stem::{Columns, StemStep};
pub use traits::{new_id, Step, TidyRow};
