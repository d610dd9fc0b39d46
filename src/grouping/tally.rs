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

//! Frequency of the values of a multi-valued field, counted in documents.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use snafu::ensure;

use super::error::*;
use super::pipeline::expand;
use super::record::{DocumentRecord, ExpandedRecord};

/// Restriction on the first letters of the values kept in a tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFilter {
    Any,
    /// Values in title case (e.g., "Norway", "World War").
    Title,
    /// Values without upper case letters (e.g., "fishing").
    Lower,
}

impl CaseFilter {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            CaseFilter::Any => true,
            CaseFilter::Title => is_title(value),
            CaseFilter::Lower => is_lower(value),
        }
    }
}

impl FromStr for CaseFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(CaseFilter::Any),
            "title" => Ok(CaseFilter::Title),
            "lower" => Ok(CaseFilter::Lower),
            _ => Err(format!("Unknown case filter {}", s)),
        }
    }
}

/// Whether every word starts with an upper case letter followed by lower case letters only.
/// Requires at least one cased character.
pub fn is_title(s: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

/// Whether the string has cased characters and all of them are lower case.
pub fn is_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

/// Number of documents carrying each value of a field, by decreasing frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    field: String,
    rows: Vec<(String, u64)>,
}

impl Tally {
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rows(&self) -> &[(String, u64)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, value: &str) -> Option<u64> {
        self.rows.iter().find(|(v, _)| v == value).map(|(_, n)| *n)
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|(_, n)| n).sum()
    }

    /// Keeps the values accepted by the filter.
    pub fn filter(self, case: CaseFilter) -> Self {
        Tally {
            field: self.field,
            rows: self
                .rows
                .into_iter()
                .filter(|(v, _)| case.accepts(v))
                .collect(),
        }
    }

    /// Frequencies as percentages of the total. Empty if the tally is empty.
    pub fn percentages(&self) -> Vec<(String, f64)> {
        let total = self.total() as f64;
        self.rows
            .iter()
            .map(|(v, n)| (v.clone(), *n as f64 * 100.0 / total))
            .collect()
    }
}

/// Counts in how many documents each value of a multi-valued field appears.
/// Documents where the field is not a string are ignored.
///
/// # Arguments
///
/// * `documents` - The corpus.
/// * `field` - The multi-valued field (e.g., subjects).
///
/// # Returns
///
/// The tally sorted by decreasing frequency, ties in order of first appearance,
/// or an error if no document has the field.
pub fn tally(documents: &[DocumentRecord], field: &str) -> Result<Tally, GroupingError> {
    ensure!(
        documents.iter().any(|d| d.has_field(field)),
        InvalidGroupingFieldSnafu { field }
    );

    Ok(count_values(&expand(documents, field), field))
}

/// Counts in how many documents each value of an expanded field appears.
/// Records where the field is not a string are ignored.
///
/// # Arguments
///
/// * `expanded` - The records returned by [`expand`].
/// * `field` - The expanded field.
pub fn count_values(expanded: &[ExpandedRecord], field: &str) -> Tally {
    let mut memberships: HashSet<(&str, &str)> = HashSet::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<(String, u64)> = Vec::new();

    for record in expanded {
        if let Some(value) = record.get(field).and_then(|v| v.as_str()) {
            if memberships.insert((record.id(), value)) {
                let pos = *positions.entry(value).or_insert_with(|| {
                    rows.push((value.to_string(), 0));
                    rows.len() - 1
                });
                rows[pos].1 += 1;
            }
        }
    }

    rows.sort_by(|a, b| b.1.cmp(&a.1));
    Tally {
        field: field.to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grouping::value::Value;
    use approx::assert_relative_eq;

    fn corpus() -> Vec<DocumentRecord> {
        vec![
            DocumentRecord::new("1").with("subjects", "Norge/fiske/fiske"),
            DocumentRecord::new("2").with("subjects", "fiske / Historie"),
            DocumentRecord::new("3").with("subjects", Value::Null),
            DocumentRecord::new("4").with("subjects", "Norge/fiske"),
            DocumentRecord::new("5").with("title", "Uten emne"),
        ]
    }

    #[test]
    fn test_tally_counts_documents() {
        let t = tally(&corpus(), "subjects").unwrap();
        assert_eq!(
            t.rows(),
            &[
                ("fiske".to_string(), 3),
                ("Norge".to_string(), 2),
                ("Historie".to_string(), 1)
            ]
        );
        assert_eq!(t.total(), 6);
        assert_eq!(t.get("Norge"), Some(2));
        assert_eq!(t.get("Sverige"), None);
        assert_eq!(t.field(), "subjects");
    }

    #[test]
    fn test_tally_invalid_field() {
        assert!(tally(&corpus(), "genre").is_err());
    }

    #[test]
    fn test_filters() {
        let t = tally(&corpus(), "subjects").unwrap();
        let title = t.clone().filter(CaseFilter::Title);
        assert_eq!(title.len(), 2);
        assert_eq!(title.get("fiske"), None);
        let lower = t.clone().filter(CaseFilter::Lower);
        assert_eq!(lower.rows(), &[("fiske".to_string(), 3)]);
        assert_eq!(t.clone().filter(CaseFilter::Any), t);
    }

    #[test]
    fn test_percentages() {
        let t = tally(&corpus(), "subjects").unwrap();
        let p = t.percentages();
        assert_relative_eq!(p[0].1, 50.0);
        assert_relative_eq!(p.iter().map(|(_, x)| x).sum::<f64>(), 100.0);
    }

    #[test]
    fn test_case_predicates() {
        assert!(is_title("World War Two"));
        assert!(is_title("Norge"));
        assert!(!is_title("NATO"));
        assert!(!is_title("fiske"));
        assert!(!is_title("1905"));
        assert!(is_lower("fiske og fangst"));
        assert!(!is_lower("Fiske"));
        assert!(!is_lower("1905"));
        assert_eq!("title".parse::<CaseFilter>(), Ok(CaseFilter::Title));
        assert!("upper".parse::<CaseFilter>().is_err());
    }
}
