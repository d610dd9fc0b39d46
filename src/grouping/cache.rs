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

//! Memoization of expansions of a corpus.
//! Entries are keyed by grouping field and live until they are invalidated or the corpus is replaced.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::counts::{CountTable, GroupedCountTable};
use super::error::GroupingError;
use super::pipeline::{aggregate, expand};
use super::record::{DocumentRecord, ExpandedRecord};

/// A corpus together with the expansions already computed for it.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    documents: Vec<DocumentRecord>,
    entries: HashMap<String, Rc<Vec<ExpandedRecord>>>,
    hits: usize,
    misses: usize,
}

impl ExpansionCache {
    pub fn new(documents: Vec<DocumentRecord>) -> Self {
        ExpansionCache {
            documents,
            ..Default::default()
        }
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Replaces the corpus. All cached expansions are dropped.
    pub fn replace(&mut self, documents: Vec<DocumentRecord>) {
        self.documents = documents;
        self.clear();
    }

    /// Expansion of the corpus along a field, computed on first request.
    ///
    /// # Arguments
    ///
    /// * `field` - The grouping field.
    pub fn expanded(&mut self, field: &str) -> Rc<Vec<ExpandedRecord>> {
        match self.entries.get(field) {
            Some(rows) => {
                self.hits += 1;
                debug!(field, "expansion cache hit");
                Rc::clone(rows)
            }
            None => {
                self.misses += 1;
                debug!(field, "expansion cache miss");
                let rows = Rc::new(expand(&self.documents, field));
                self.entries.insert(field.to_string(), Rc::clone(&rows));
                rows
            }
        }
    }

    /// Aggregates counts along a field, reusing the cached expansion when there is one.
    ///
    /// # Arguments
    ///
    /// * `counts` - The word counts indexed by document identifier.
    /// * `field` - The grouping field.
    pub fn grouped(
        &mut self,
        counts: &CountTable,
        field: &str,
    ) -> Result<GroupedCountTable, GroupingError> {
        let rows = self.expanded(field);
        aggregate(&rows, counts, field)
    }

    /// Drops the cached expansion of a field. Returns whether there was one.
    pub fn invalidate(&mut self, field: &str) -> bool {
        self.entries.remove(field).is_some()
    }

    /// Drops every cached expansion.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grouping::counts::Count;
    use crate::grouping::value::Value;

    fn cache() -> ExpansionCache {
        ExpansionCache::new(vec![
            DocumentRecord::new("1")
                .with("subj", "a/b")
                .with("lang", "nob"),
            DocumentRecord::new("2").with("subj", "b").with("lang", "nno"),
        ])
    }

    #[test]
    fn test_hits_and_misses() {
        let mut cache = cache();
        let first = cache.expanded("subj");
        let second = cache.expanded("subj");
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);

        cache.expanded("lang");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_invalidation() {
        let mut cache = cache();
        let first = cache.expanded("subj");
        assert!(cache.invalidate("subj"));
        assert!(!cache.invalidate("subj"));
        let second = cache.expanded("subj");
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(first, second);

        cache.replace(vec![DocumentRecord::new("3").with("subj", "c")]);
        assert!(cache.is_empty());
        assert_eq!(cache.expanded("subj").len(), 1);
    }

    #[test]
    fn test_grouped() {
        let mut cache = cache();
        let counts = CountTable::new().with("1", "x", 2_u64).with("2", "x", 3_u64);
        let grouped = cache.grouped(&counts, "subj").unwrap();
        assert_eq!(grouped.get(&Value::from("b"), "x"), Some(Count::Int(5)));
        assert!(cache.grouped(&counts, "genre").is_err());
        assert_eq!(cache.documents().len(), 2);
    }
}
