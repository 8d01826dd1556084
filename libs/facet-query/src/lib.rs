//! Facet and keyword query construction for a single flat table.
//!
//! Turns query-string facet selections and free-text keywords into one
//! parameterized SQL query:
//! - Keyword tokenization and boolean full-text expression building
//! - Date facets interpreted as year/month/day ranges
//! - Discrete facets matched against their column plus any additional columns
//! - Required columns enforced on every query
//!
//! The query is built as a predicate tree with named placeholders; rendering
//! to SQL text is a separate step so the tree can be inspected without a
//! database.

pub mod config;
pub mod error;
pub mod granularity;
pub mod keywords;
pub mod params;
pub mod query_builder;
pub mod request;

pub use config::{ColumnMap, FacetConfig};
pub use error::{Error, Result};
pub use granularity::{DateGranularities, Granularity};
pub use keywords::{tokenize_quoted, KeywordQueryBuilder};
pub use params::{FacetSelection, ParamValue, RequestParameters, SortDirection};
pub use query_builder::{
    build_facet_clause, Bindings, Condition, FacetQueryBuilder, Placeholder, Predicate,
    Projection, SelectQuery,
};
pub use request::SearchRequest;
