use super::super::bind::Bindings;
use super::super::predicate::{Condition, Predicate};

/// `:value IN (column, additional...)` per selected value, ORed. Duplicate
/// values each get their own binding and clause.
pub(super) fn build_membership_clause(
    columns: &[String],
    values: &[String],
    bindings: &mut Bindings,
) -> Option<Predicate> {
    let parts: Vec<Predicate> = values
        .iter()
        .map(|value| {
            Condition::ValueInColumns {
                value: bindings.bind(value.clone()),
                columns: columns.to_vec(),
            }
            .into()
        })
        .collect();
    Predicate::any(parts)
}
