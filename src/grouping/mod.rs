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

//! In-memory grouping of word counts by corpus metadata.

pub mod cache;
pub mod counts;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod tally;
pub mod value;

pub use cache::ExpansionCache;
pub use counts::{Count, CountTable, GroupedCountTable};
pub use error::GroupingError;
pub use pipeline::{aggregate, expand, split_parts};
pub use record::{DocumentId, DocumentRecord, ExpandedRecord};
pub use tally::{count_values, tally, CaseFilter, Tally};
pub use value::Value;
