//! Entry-point column validation for the aggregations.

use std::fmt;

use tracing::debug;

use seperlima_data::Table;

use crate::spec::ChartOutput;

/// Columns an aggregation needs but the input table lacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMismatch {
    pub missing: Vec<String>,
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing column(s): {}.", self.missing.join(", "))
    }
}

/// Check that `table` has every column in `required`.
pub fn validate(table: &Table, required: &[&str]) -> Result<(), SchemaMismatch> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaMismatch { missing })
    }
}

/// Empty-state output when `table` fails validation, `None` when it passes.
pub(crate) fn guard(
    table: &Table,
    required: &[&str],
    title: &str,
    summary_columns: &[&str],
) -> Option<ChartOutput> {
    match validate(table, required) {
        Ok(()) => None,
        Err(mismatch) => {
            debug!(chart = title, missing = ?mismatch.missing, "schema mismatch");
            Some(ChartOutput::empty(title, mismatch.to_string(), summary_columns))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_lists_every_missing_column() {
        let table = Table::with_columns(&["a"]);
        assert_eq!(validate(&table, &["a"]), Ok(()));
        let err = validate(&table, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err.missing, vec!["b", "c"]);
        assert_eq!(err.to_string(), "Missing column(s): b, c.");
    }

    #[test]
    fn test_guard_routes_to_empty_state() {
        let table = Table::with_columns(&["a"]);
        let out = guard(&table, &["z"], "T", &["z", "count"]).unwrap();
        assert!(out.is_empty());
        assert!(out.summary.is_empty());
        assert!(guard(&table, &["a"], "T", &[]).is_none());
    }
}
