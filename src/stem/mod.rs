// Stemming backends — name lookup over the external stemming algorithms.

pub mod backend;

pub use backend::{
    resolve_stemmer, StemFn, StemOptions, TokenStemmer, DEFAULT_STEMMER, SUPPORTED_STEMMERS,
};
