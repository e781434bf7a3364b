//! Group-by primitives shared by the aggregations.
//!
//! Groups are emitted in ascending key order, and every ranking sort is
//! stable, so ties keep key order and output is reproducible.

use std::collections::BTreeMap;

use seperlima_data::{Row, Table, Value};

/// Column holding group sizes in every summary table.
pub const COUNT: &str = "count";

/// Number of rows per distinct key tuple. Rows with a null key are skipped.
pub fn count_by(table: &Table, keys: &[&str]) -> Vec<(Vec<Value>, u64)> {
    count_by_derived(table.iter(), |row| {
        let key: Vec<Value> = keys.iter().map(|k| row.get(k).clone()).collect();
        (!key.iter().any(Value::is_null)).then_some(key)
    })
}

/// Like `count_by`, but keys are computed per row. `None` skips the row.
pub fn count_by_derived<'a, K: Ord>(
    rows: impl Iterator<Item = Row<'a>>,
    key: impl Fn(Row<'a>) -> Option<K>,
) -> Vec<(K, u64)> {
    let mut groups: BTreeMap<K, u64> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            *groups.entry(k).or_insert(0) += 1;
        }
    }
    groups.into_iter().collect()
}

/// Mean of `value` per `key`. Null keys and null values are excluded; a group
/// with no non-null values is dropped rather than reported as zero.
pub fn mean_by(table: &Table, key: &str, value: &str) -> Vec<(Value, f64)> {
    let mut groups: BTreeMap<Value, (f64, u64)> = BTreeMap::new();
    for row in table.iter() {
        let k = row.get(key);
        let Some(v) = row.get(value).as_f64() else {
            continue;
        };
        if k.is_null() {
            continue;
        }
        let entry = groups.entry(k.clone()).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Stable sort, largest count first.
pub fn rank_by_count<K>(groups: &mut [(K, u64)]) {
    groups.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Stable sort, largest measure first.
pub fn rank_by_measure<K>(groups: &mut [(K, f64)]) {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Summary table from single-key counts.
pub fn single_key_summary(key_column: &str, groups: Vec<(Value, u64)>) -> Table {
    let mut table = Table::with_columns(&[key_column, COUNT]);
    for (key, count) in groups {
        table.push_row(vec![key, Value::from(count)]);
    }
    table
}

/// Flatten one-element key tuples from `count_by`.
pub fn first_key(groups: Vec<(Vec<Value>, u64)>) -> Vec<(Value, u64)> {
    groups
        .into_iter()
        .filter_map(|(mut key, n)| (!key.is_empty()).then(|| (key.swap_remove(0), n)))
        .collect()
}

/// Row with the largest numeric `measure`; the first one wins ties.
pub fn leader<'a>(summary: &'a Table, measure: &str) -> Option<Row<'a>> {
    let mut best: Option<(Row<'a>, f64)> = None;
    for row in summary.iter() {
        let Some(v) = row.get(measure).as_f64() else {
            continue;
        };
        if best.as_ref().is_none_or(|(_, b)| v > *b) {
            best = Some((row, v));
        }
    }
    best.map(|(row, _)| row)
}
