// Copyright 2025 Andrea Gilot
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expansion of multi-valued metadata fields and aggregation of word counts per field value.
//!
//! Metadata fields such as subjects often hold several values separated by `/`
//! (e.g., `"history/politics"`). Counting per subject requires one row per value:
//! [`expand`] produces these rows and [`aggregate`] sums the word counts of the documents of each value.

use std::collections::{HashMap, HashSet};

use num_traits::Zero;
use snafu::ensure;
use tracing::debug;

use super::counts::{Count, CountTable, GroupedCountTable};
use super::error::*;
use super::record::{DocumentRecord, ExpandedRecord};
use super::value::Value;

/// Separator between the values of a multi-valued field.
pub const SEPARATOR: char = '/';

/// Splits a multi-valued cell into its distinct trimmed parts, in order of first appearance.
/// Only leading and trailing whitespace is removed from each part.
///
/// # Arguments
///
/// * `value` - The content of the cell.
pub fn split_parts(value: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    for part in value.split(SEPARATOR).map(str::trim) {
        if !parts.contains(&part) {
            parts.push(part);
        }
    }
    parts
}

/// Expands every document whose grouping field is a string into one record per distinct part of the field.
/// Documents where the field is missing or is not a string are kept as is.
/// Exact duplicate records are removed, keeping the first occurrence.
///
/// # Arguments
///
/// * `documents` - The corpus.
/// * `field` - The grouping field.
///
/// # Returns
///
/// The expanded records in corpus order.
pub fn expand(documents: &[DocumentRecord], field: &str) -> Vec<ExpandedRecord> {
    let mut seen: HashSet<ExpandedRecord> = HashSet::new();
    let mut expanded: Vec<ExpandedRecord> = Vec::with_capacity(documents.len());

    for doc in documents {
        let rows: Vec<ExpandedRecord> = match doc.get(field).and_then(Value::as_str) {
            Some(value) => split_parts(value)
                .into_iter()
                .map(|part| ExpandedRecord::with_part(doc, field, part))
                .collect(),
            None => vec![ExpandedRecord::unchanged(doc)],
        };
        for row in rows {
            if seen.insert(row.clone()) {
                expanded.push(row);
            }
        }
    }

    debug!(
        field,
        documents = documents.len(),
        rows = expanded.len(),
        "expanded corpus"
    );
    expanded
}

/// Sums the count vectors of the documents sharing the same value of the grouping field.
///
/// A document contributes once to each of its values, with its full count vector.
/// Documents without counts contribute zeros, documents whose field is missing or null belong to no group.
///
/// # Arguments
///
/// * `expanded` - The records returned by [`expand`].
/// * `counts` - The word counts indexed by document identifier.
/// * `field` - The grouping field.
///
/// # Returns
///
/// The grouped counts, ordered by first appearance of each value,
/// or an error if no record has the grouping field.
pub fn aggregate(
    expanded: &[ExpandedRecord],
    counts: &CountTable,
    field: &str,
) -> Result<GroupedCountTable, GroupingError> {
    ensure!(
        expanded.iter().any(|r| r.has_field(field)),
        InvalidGroupingFieldSnafu { field }
    );

    let terms: Vec<String> = counts.terms().to_vec();
    let mut index: HashMap<&Value, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<Count>)> = Vec::new();
    let mut memberships: HashSet<(&str, &Value)> = HashSet::new();
    let mut missing_counts: usize = 0;

    for record in expanded {
        let key: &Value = match record.get(field) {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        // A document counts once per value
        if !memberships.insert((record.id(), key)) {
            continue;
        }
        let pos: usize = *index.entry(key).or_insert_with(|| {
            groups.push((key.clone(), vec![Count::zero(); terms.len()]));
            groups.len() - 1
        });
        match counts.vector(record.id()) {
            Some(vector) => {
                for (acc, count) in groups[pos].1.iter_mut().zip(vector) {
                    *acc += *count;
                }
            }
            None => missing_counts += 1,
        }
    }

    debug!(
        field,
        groups = groups.len(),
        terms = terms.len(),
        missing_counts,
        "aggregated counts"
    );
    Ok(GroupedCountTable::from_parts(field, terms, groups))
}

#[cfg(test)]
mod tests {

    use super::*;

    fn corpus() -> Vec<DocumentRecord> {
        vec![
            DocumentRecord::new("1").with("subj", "a/b"),
            DocumentRecord::new("2").with("subj", "b"),
        ]
    }

    #[test]
    fn test_split_parts() {
        assert_eq!(split_parts("a/b/b"), vec!["a", "b"]);
        assert_eq!(
            split_parts(" politics / history "),
            vec!["politics", "history"]
        );
        assert_eq!(split_parts("world war two"), vec!["world war two"]);
        assert_eq!(split_parts("a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_expand_collapses_duplicate_parts() {
        let docs = vec![DocumentRecord::new("1").with("subj", "a/b/b")];
        let expanded = expand(&docs, "subj");
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].get("subj"), Some(&Value::from("a")));
        assert_eq!(expanded[1].get("subj"), Some(&Value::from("b")));
    }

    #[test]
    fn test_expand_passes_through_non_strings() {
        let docs = vec![
            DocumentRecord::new("1").with("subj", Value::Null),
            DocumentRecord::new("2").with("subj", 1990_i64),
            DocumentRecord::new("3").with("title", "no subject"),
        ];
        let expanded = expand(&docs, "subj");
        assert_eq!(expanded.len(), 3);
        for (doc, row) in docs.iter().zip(expanded.iter()) {
            assert_eq!(doc.id(), row.id());
            assert_eq!(doc.fields(), row.fields());
        }
    }

    #[test]
    fn test_expand_trims_and_keeps_other_fields() {
        let docs = vec![DocumentRecord::new("1")
            .with("subj", " politics / history ")
            .with("year", 1905_i64)];
        let expanded = expand(&docs, "subj");
        let values: Vec<&Value> = expanded.iter().filter_map(|r| r.get("subj")).collect();
        assert_eq!(values, vec![&Value::from("politics"), &Value::from("history")]);
        assert!(expanded
            .iter()
            .all(|r| r.get("year") == Some(&Value::Int(1905))));
    }

    #[test]
    fn test_expand_removes_duplicate_rows() {
        let docs = vec![
            DocumentRecord::new("1").with("subj", "a/b"),
            DocumentRecord::new("1").with("subj", "b/a"),
            DocumentRecord::new("2").with("subj", "a"),
        ];
        let expanded = expand(&docs, "subj");
        let pairs: Vec<(&str, String)> = expanded
            .iter()
            .map(|r| (r.id(), r.get("subj").unwrap().to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1", "a".to_string()),
                ("1", "b".to_string()),
                ("2", "a".to_string())
            ]
        );
    }

    #[test]
    fn test_aggregate_end_to_end() {
        let counts = CountTable::new().with("1", "x", 2_u64).with("2", "x", 3_u64);
        let grouped = aggregate(&expand(&corpus(), "subj"), &counts, "subj").unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get(&Value::from("a"), "x"), Some(Count::Int(2)));
        assert_eq!(grouped.get(&Value::from("b"), "x"), Some(Count::Int(5)));
        let keys: Vec<&Value> = grouped.keys().collect();
        assert_eq!(keys, vec![&Value::from("a"), &Value::from("b")]);
    }

    #[test]
    fn test_aggregate_invalid_field() {
        let counts = CountTable::new().with("1", "x", 2_u64);
        let res = aggregate(&expand(&corpus(), "subj"), &counts, "genre");
        assert!(matches!(
            res,
            Err(GroupingError::InvalidGroupingField { .. })
        ));
        assert_eq!(res.err().unwrap().field(), "genre");

        assert!(aggregate(&[], &counts, "subj").is_err());
    }

    #[test]
    fn test_aggregate_missing_counts_are_zero() {
        let counts = CountTable::new().with("1", "x", 2_u64);
        let grouped = aggregate(&expand(&corpus(), "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.get(&Value::from("a"), "x"), Some(Count::Int(2)));
        assert_eq!(grouped.get(&Value::from("b"), "x"), Some(Count::Int(2)));

        let docs = vec![DocumentRecord::new("9").with("subj", "c")];
        let grouped = aggregate(&expand(&docs, "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.get(&Value::from("c"), "x"), Some(Count::Int(0)));
    }

    #[test]
    fn test_aggregate_skips_null_and_groups_non_strings() {
        let docs = vec![
            DocumentRecord::new("1").with("subj", Value::Null),
            DocumentRecord::new("2").with("subj", 1990_i64),
            DocumentRecord::new("3").with("title", "untitled"),
            DocumentRecord::new("4").with("subj", 1990_i64),
        ];
        let counts = CountTable::new()
            .with("1", "x", 1_u64)
            .with("2", "x", 2_u64)
            .with("3", "x", 4_u64)
            .with("4", "x", 8_u64);
        let grouped = aggregate(&expand(&docs, "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get(&Value::Int(1990), "x"), Some(Count::Int(10)));
        assert_eq!(grouped.get(&Value::Null, "x"), None);
    }

    #[test]
    fn test_aggregate_keeps_fractional_counts() {
        let counts = CountTable::new()
            .with("1", "x", 1.5)
            .with("2", "x", 2_u64);
        let grouped = aggregate(&expand(&corpus(), "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.get(&Value::from("b"), "x"), Some(Count::Float(3.5)));
        assert_eq!(grouped.get(&Value::from("a"), "x"), Some(Count::Float(1.5)));
    }

    #[test]
    fn test_aggregate_conserves_totals() {
        let docs: Vec<DocumentRecord> = (0..20)
            .map(|i| DocumentRecord::new(i.to_string()).with("subj", format!("s{}", i % 3)))
            .collect();
        let mut counts = CountTable::new();
        for i in 0..20_u64 {
            counts.insert(i.to_string(), "x", i);
            counts.insert(i.to_string(), "y", 2 * i + 1);
        }
        let grouped = aggregate(&expand(&docs, "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped.total("x"), counts.total("x"));
        assert_eq!(grouped.total("y"), counts.total("y"));
    }

    #[test]
    fn test_aggregate_repeated_values_never_inflate() {
        let docs = vec![
            DocumentRecord::new("1").with("subj", "a/a/a"),
            DocumentRecord::new("2").with("subj", "b/ b"),
        ];
        let counts = CountTable::new().with("1", "x", 4_u64).with("2", "x", 6_u64);
        let grouped = aggregate(&expand(&docs, "subj"), &counts, "subj").unwrap();
        assert_eq!(grouped.get(&Value::from("a"), "x"), Some(Count::Int(4)));
        assert_eq!(grouped.get(&Value::from("b"), "x"), Some(Count::Int(6)));
        assert_eq!(grouped.total("x"), counts.total("x"));
    }

    #[test]
    fn test_aggregate_widens_overflowing_sums() {
        let docs = vec![
            DocumentRecord::new("1").with("subj", "a"),
            DocumentRecord::new("2").with("subj", "a"),
        ];
        let counts = CountTable::new()
            .with("1", "x", u64::MAX)
            .with("2", "x", 1_u64);
        let grouped = aggregate(&expand(&docs, "subj"), &counts, "subj").unwrap();
        let sum = grouped.get(&Value::from("a"), "x").unwrap();
        assert!(sum.is_float());
        assert_eq!(sum.as_f64(), u64::MAX as f64 + 1.0);
    }

    #[test]
    fn test_aggregate_merges_signed_zeros_and_skips_nan() {
        let docs = vec![
            DocumentRecord::new("1").with("score", 0.0),
            DocumentRecord::new("2").with("score", -0.0),
            DocumentRecord::new("3").with("score", f64::NAN),
        ];
        let counts = CountTable::new()
            .with("1", "x", 1_u64)
            .with("2", "x", 2_u64)
            .with("3", "x", 4_u64);
        let grouped = aggregate(&expand(&docs, "score"), &counts, "score").unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get(&Value::Float(0.0), "x"), Some(Count::Int(3)));
    }
}
