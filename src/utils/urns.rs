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

//! Extraction of document URNs from free text and selection of the documents they identify.

use lazy_static::lazy_static;
use polars::frame::DataFrame;
use polars::prelude::{col, lit, IntoLazy, NamedFrom, Series};
use regex::Regex;

use super::dataframes::has_column;
use super::error::*;

/// Column of a corpus storing the URN of each document.
pub const URN_COLUMN: &str = "urn";

lazy_static! {
    // Safe unwrap as the pattern is valid
    static ref URN: Regex = Regex::new(r"URN:NBN[^\s.,]+").unwrap();
}

/// Finds the URNs in a text. The text needs no formatting.
///
/// # Arguments
///
/// * `text` - Any text, e.g., pasted from a web page.
///
/// # Returns
///
/// The URNs in order of first appearance, without duplicates.
pub fn extract_urns(text: &str) -> Vec<String> {
    let mut urns: Vec<String> = Vec::new();
    for m in URN.find_iter(text) {
        if !urns.iter().any(|u| u == m.as_str()) {
            urns.push(m.as_str().to_string());
        }
    }
    urns
}

/// Keeps the documents of a corpus whose URN is in a list.
///
/// # Arguments
///
/// * `corpus` - The corpus.
/// * `urns` - The URNs to keep.
///
/// # Returns
///
/// The selected documents in corpus order, or an error if the corpus has no URN column.
pub fn select_urns(corpus: DataFrame, urns: &[String]) -> Result<DataFrame, Error> {
    if !has_column(&corpus, URN_COLUMN) {
        Error::new(&format!("The corpus has no {} column", URN_COLUMN)).to_res()
    } else {
        let listed = Series::new("listed".into(), urns);
        map_err(
            corpus
                .lazy()
                .filter(col(URN_COLUMN).is_in(lit(listed)))
                .collect(),
            "Could not select documents by URN",
        )
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::fs::{open_csv, read_text};

    #[test]
    fn test_extract_urns() {
        let text = "Se URN:NBN:no-nb_digibok_2008051404065, og\nURN:NBN:no-nb_digibok_2014020406101.\
                    Igjen: URN:NBN:no-nb_digibok_2008051404065 slutt";
        assert_eq!(
            extract_urns(text),
            vec![
                "URN:NBN:no-nb_digibok_2008051404065",
                "URN:NBN:no-nb_digibok_2014020406101"
            ]
        );
        assert!(extract_urns("no identifiers here").is_empty());
    }

    #[test]
    fn test_select_urns() {
        let corpus = open_csv("tests/data/corpus.csv", &["dhlabid"]).unwrap();
        let urns = extract_urns(&read_text("tests/data/urns.txt").unwrap());
        assert_eq!(urns.len(), 3);

        let selected = select_urns(corpus.clone(), &urns).unwrap();
        assert_eq!(selected.height(), 2);

        let counts = open_csv("tests/data/counts.csv", &[]).unwrap();
        assert!(select_urns(counts, &urns).is_err());
    }
}
