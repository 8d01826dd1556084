//! Facet clause builders.
//!
//! Date facets select a range per value; every other facet tests membership
//! of the selected values against its column and any additional columns.

mod date;
mod membership;

pub use date::{date_value_range, DateRange};

use super::bind::Bindings;
use super::predicate::Predicate;
use crate::params::FacetSelection;
use crate::{Error, FacetConfig, Result};

/// Build the predicate for one facet selection.
///
/// Returns `Ok(None)` when the selection contributes nothing (no values, or
/// only malformed date values). A facet missing from `facet labels` is an
/// [`Error::UnknownFacet`]; parsed request parameters never contain one.
pub fn build_facet_clause(
    config: &FacetConfig,
    selection: &FacetSelection,
    bindings: &mut Bindings,
) -> Result<Option<Predicate>> {
    if !config.is_facet(&selection.facet) {
        return Err(Error::UnknownFacet(selection.facet.clone()));
    }
    if selection.values.is_empty() {
        return Ok(None);
    }

    let columns = columns_to_check(config, &selection.facet);
    let clause = if config.is_date_facet(&selection.facet) {
        date::build_date_clause(&columns, &selection.values, bindings)
    } else {
        membership::build_membership_clause(&columns, &selection.values, bindings)
    };
    Ok(clause)
}

/// The facet's own column followed by the additional columns aliased to it.
fn columns_to_check(config: &FacetConfig, facet: &str) -> Vec<String> {
    std::iter::once(facet)
        .chain(config.additional_columns_for(facet))
        .map(str::to_string)
        .collect()
}
