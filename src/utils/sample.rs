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

//! Reproducible sampling of large corpora.

use polars::frame::DataFrame;
use polars::prelude::IdxCa;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::*;

/// Corpora larger than this are sampled.
pub const MAX_DOCUMENTS: usize = 1200;

/// Default number of documents kept when a corpus is sampled.
pub const DEFAULT_SAMPLE_SIZE: usize = 400;

/// Draws rows of a DataFrame at random, without replacement.
/// The drawn rows keep their original order.
///
/// # Arguments
///
/// * `df` - The DataFrame to sample.
/// * `size` - The number of rows to draw. If larger than the DataFrame, all rows are kept.
/// * `seed` - The seed of the random number generator.
pub fn sample_rows(df: &DataFrame, size: usize, seed: u64) -> Result<DataFrame, Error> {
    if size >= df.height() {
        Ok(df.clone())
    } else {
        let mut rng: StdRng = SeedableRng::seed_from_u64(seed);
        let mut rows: Vec<usize> = rand::seq::index::sample(&mut rng, df.height(), size).into_vec();
        rows.sort_unstable();
        let mask = rows
            .into_iter()
            .map(|idx| Some(idx as u32))
            .collect::<IdxCa>();
        map_err(df.take(&mask), "Could not sample the corpus")
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::dataframes::{identifiers, DEFAULT_ID_COLUMN};
    use crate::utils::fs::open_csv;

    #[test]
    fn test_sample_rows() {
        let corpus = open_csv("tests/data/corpus.csv", &[DEFAULT_ID_COLUMN]).unwrap();

        let sample = sample_rows(&corpus, 3, 42).unwrap();
        assert_eq!(sample.height(), 3);
        let ids = identifiers(&sample, DEFAULT_ID_COLUMN).unwrap();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        let again = sample_rows(&corpus, 3, 42).unwrap();
        assert!(again.equals_missing(&sample));

        assert_eq!(sample_rows(&corpus, 10, 42).unwrap().height(), 5);
    }
}
