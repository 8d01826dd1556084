//! Keyword handling for the boolean full-text predicate.
//!
//! The raw `keys` parameter is split into quote-aware tokens, then rewritten
//! into a boolean-mode full-text expression (implicit AND, `OR` markers,
//! automatic wildcards) depending on configuration.

mod boolean;
mod tokenize;

pub use boolean::{apply_auto_wildcard, apply_default_and, KeywordQueryBuilder};
pub use tokenize::{tokenize_quoted, DEFAULT_QUOTATION_MARKS};
