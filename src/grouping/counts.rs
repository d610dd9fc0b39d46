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

//! Word counts per document and per group of documents.

use std::collections::HashMap;
use std::fmt::Display;
use std::ops::{Add, AddAssign};

use num_traits::Zero;

use super::record::DocumentId;
use super::value::Value;

/// Number of occurrences of a term.
/// Integer counts stay integers as long as they are only added to integers.
/// As soon as a float is involved, the sum is a float, so that fractional counts are never truncated.
#[derive(Debug, Clone, Copy)]
pub enum Count {
    Int(u64),
    Float(f64),
}

impl Count {
    pub fn as_f64(&self) -> f64 {
        match self {
            Count::Int(i) => *i as f64,
            Count::Float(x) => *x,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Count::Float(_))
    }
}

impl Default for Count {
    fn default() -> Self {
        Count::zero()
    }
}

impl Add for Count {
    type Output = Count;

    fn add(self, other: Count) -> Count {
        match (self, other) {
            // Sums beyond u64 widen to floats like mixed sums
            (Count::Int(a), Count::Int(b)) => a
                .checked_add(b)
                .map(Count::Int)
                .unwrap_or_else(|| Count::Float(a as f64 + b as f64)),
            (a, b) => Count::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl AddAssign for Count {
    fn add_assign(&mut self, other: Count) {
        *self = *self + other;
    }
}

impl Zero for Count {
    fn zero() -> Self {
        Count::Int(0)
    }

    fn is_zero(&self) -> bool {
        match self {
            Count::Int(i) => *i == 0,
            Count::Float(x) => *x == 0.0,
        }
    }
}

impl PartialEq for Count {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Count::Int(a), Count::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl From<u64> for Count {
    fn from(i: u64) -> Self {
        Count::Int(i)
    }
}

impl From<f64> for Count {
    fn from(x: f64) -> Self {
        Count::Float(x)
    }
}

impl Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Count::Int(i) => write!(f, "{}", i),
            Count::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Term counts indexed by document identifier.
/// The table remembers the order in which terms were first inserted.
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
    /// Count vectors aligned with `terms`. A vector shorter than `terms` is padded with zeros.
    rows: HashMap<DocumentId, Vec<Count>>,
}

impl CountTable {
    pub fn new() -> Self {
        CountTable::default()
    }

    /// Position of a term in the table, registering it if it is new.
    fn position(&mut self, term: &str) -> usize {
        match self.positions.get(term) {
            Some(pos) => *pos,
            None => {
                self.terms.push(term.to_string());
                self.positions.insert(term.to_string(), self.terms.len() - 1);
                self.terms.len() - 1
            }
        }
    }

    /// Registers a term without any count.
    pub fn add_term(&mut self, term: &str) {
        self.position(term);
    }

    /// Sets the count of a term in a document, overriding any previous count.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier of the document.
    /// * `term` - The term.
    /// * `count` - The number of occurrences of the term in the document.
    pub fn insert<I, C>(&mut self, id: I, term: &str, count: C)
    where
        I: Into<DocumentId>,
        C: Into<Count>,
    {
        let pos = self.position(term);
        let row = self.rows.entry(id.into()).or_default();
        if row.len() <= pos {
            row.resize(pos + 1, Count::zero());
        }
        row[pos] = count.into();
    }

    /// Builder version of [`CountTable::insert`].
    pub fn with<I, C>(mut self, id: I, term: &str, count: C) -> Self
    where
        I: Into<DocumentId>,
        C: Into<Count>,
    {
        self.insert(id, term, count);
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of documents in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of a term in a document. Zero if either is unknown.
    pub fn get(&self, id: &str, term: &str) -> Count {
        self.positions
            .get(term)
            .and_then(|pos| self.rows.get(id).and_then(|row| row.get(*pos)))
            .copied()
            .unwrap_or_default()
    }

    /// Count vector of a document, aligned with [`CountTable::terms`].
    /// Trailing zeros may be omitted.
    pub fn vector(&self, id: &str) -> Option<&[Count]> {
        self.rows.get(id).map(|row| row.as_slice())
    }

    /// Sum of the counts of a term over all documents.
    pub fn total(&self, term: &str) -> Count {
        match self.positions.get(term) {
            Some(pos) => self
                .rows
                .values()
                .filter_map(|row| row.get(*pos))
                .fold(Count::zero(), |acc, c| acc + *c),
            None => Count::zero(),
        }
    }

    /// Returns a table restricted to the given terms, in the order of the list.
    /// Terms absent from this table are skipped.
    ///
    /// # Arguments
    ///
    /// * `words` - The terms to keep.
    pub fn select<S>(&self, words: &[S]) -> CountTable
    where
        S: AsRef<str>,
    {
        let mut selected = CountTable::new();
        let kept: Vec<&str> = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| self.positions.contains_key(*w))
            .collect();
        for word in kept.iter() {
            selected.add_term(word);
        }
        for id in self.rows.keys() {
            for word in kept.iter() {
                selected.insert(id.clone(), word, self.get(id, word));
            }
        }
        selected
    }
}

/// Summed term counts per value of a grouping field.
#[derive(Debug, Clone)]
pub struct GroupedCountTable {
    field: String,
    terms: Vec<String>,
    groups: Vec<(Value, Vec<Count>)>,
}

impl GroupedCountTable {
    pub(crate) fn from_parts(
        field: &str,
        terms: Vec<String>,
        groups: Vec<(Value, Vec<Count>)>,
    ) -> Self {
        GroupedCountTable {
            field: field.to_string(),
            terms,
            groups,
        }
    }

    /// Name of the grouping field.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Groups with their count vectors aligned with [`GroupedCountTable::terms`].
    pub fn groups(&self) -> &[(Value, Vec<Count>)] {
        &self.groups
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Summed count of a term in a group, or None if the group or the term does not exist.
    pub fn get(&self, group: &Value, term: &str) -> Option<Count> {
        let pos = self.terms.iter().position(|t| t == term)?;
        self.groups
            .iter()
            .find(|(key, _)| key == group)
            .map(|(_, counts)| counts[pos])
    }

    /// Sum of the counts of a term over all groups.
    pub fn total(&self, term: &str) -> Count {
        match self.terms.iter().position(|t| t == term) {
            Some(pos) => self
                .groups
                .iter()
                .fold(Count::zero(), |acc, (_, counts)| acc + counts[pos]),
            None => Count::zero(),
        }
    }

    /// Sorts the groups by key. The sort is stable.
    pub fn sorted(mut self) -> Self {
        self.groups.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}
