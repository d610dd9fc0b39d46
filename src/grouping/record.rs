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

//! Document rows of a corpus, before and after expansion of a grouping field.

use std::collections::BTreeMap;

use super::value::Value;

/// Identifier of a document in a corpus (e.g., its dhlabid).
pub type DocumentId = String;

/// One row of a corpus: an identifier and the metadata fields of the document.
/// The identifier is not one of the fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRecord {
    id: DocumentId,
    fields: BTreeMap<String, Value>,
}

impl DocumentRecord {
    pub fn new<I>(id: I) -> Self
    where
        I: Into<DocumentId>,
    {
        DocumentRecord {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the same record with one more field.
    ///
    /// # Arguments
    ///
    /// * `field` - Name of the field.
    /// * `value` - Value of the field. Overrides any previous value of the field.
    pub fn with<V>(mut self, field: &str, value: V) -> Self
    where
        V: Into<Value>,
    {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

/// A corpus row whose grouping field holds at most one value.
/// Built from a [`DocumentRecord`] without touching it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedRecord {
    id: DocumentId,
    fields: BTreeMap<String, Value>,
}

impl ExpandedRecord {
    /// Copy of a document where the grouping field is replaced by a single part of its value.
    ///
    /// # Arguments
    ///
    /// * `doc` - The original document.
    /// * `field` - The grouping field.
    /// * `part` - The value the grouping field takes in the new record.
    pub fn with_part(doc: &DocumentRecord, field: &str, part: &str) -> Self {
        let mut fields = doc.fields.clone();
        fields.insert(field.to_string(), Value::from(part));
        ExpandedRecord {
            id: doc.id.clone(),
            fields,
        }
    }

    /// Copy of a document that could not be expanded.
    pub fn unchanged(doc: &DocumentRecord) -> Self {
        ExpandedRecord {
            id: doc.id.clone(),
            fields: doc.fields.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}
