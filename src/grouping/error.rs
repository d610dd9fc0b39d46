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

use snafu::Snafu;

/// Errors raised by the grouping pipeline.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GroupingError {
    /// The grouping field is not a field of any document.
    #[snafu(display("Invalid grouping field: no document has a field named {}", field))]
    InvalidGroupingField {
        field: String,
        backtrace: snafu::Backtrace,
    },
}

impl GroupingError {
    /// Name of the field that caused the error.
    pub fn field(&self) -> &str {
        match self {
            GroupingError::InvalidGroupingField { field, .. } => field,
        }
    }
}
