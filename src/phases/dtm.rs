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

//! Builds document-term matrices from a corpus and the word counts of its documents.
//!
//! Without grouping column, the matrix has one row per document.
//! With grouping columns, the counts of the documents sharing a value of the column are summed.
//! Multi-valued cells (e.g., "history/politics") are split first, so that a document counts fully
//! in each of its groups.

use clap::{value_parser, Arg, ArgAction, Command};
use polars::frame::DataFrame;

use crate::grouping::{count_values, CountTable, DocumentRecord, ExpansionCache, GroupedCountTable};
use crate::utils::dataframes::*;
use crate::utils::error::*;
use crate::utils::fs::*;
use crate::utils::logger::{log_output_file, log_write_output, Logger};
use crate::utils::sample::sample_rows;
use crate::utils::urns::{extract_urns, select_urns};
use crate::utils::words::parse_words;

/// Command line arguments parsing.
pub fn cli() -> Command {
    Command::new("dtm")
        .about("Builds document-term matrices, optionally grouped by corpus metadata.")
        .long_about(
            "Builds document-term matrices from a corpus and the word counts of its documents.\n\
             Without grouping column, writes one row per document with a link to the document.\n\
             For each grouping column, sums the counts of the documents sharing a value of the column. \
             Cells with several values separated by '/' count fully in each of their values.\n\
             By default, the output file name is the input file name with \".dtm.csv\" \
             (resp. \".<column>.dtm.csv\") appended.",
        )
        .disable_version_flag(true)
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("CORPUS.csv")
                .help("Path to the input csv file storing the corpus.")
                .required(true),
        )
        .arg(
            Arg::new("counts")
                .short('n')
                .long("counts")
                .value_name("COUNTS.csv")
                .help("Path to the csv file storing the word counts, one row per document and one column per word.")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_FILE.csv")
                .help("Path to the output csv file. With several grouping columns, \
                       used as a prefix followed by \".<column>.csv\".")
                .required(false),
        )
        .arg(
            Arg::new("column")
                .short('c')
                .long("column")
                .value_name("COLUMN_NAME")
                .help("Grouping column. Can be repeated.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("words")
                .short('w')
                .long("words")
                .value_name("WORD, WORD, ...")
                .help("Comma-separated words to keep. End the list with a comma to keep the comma itself.")
                .required(false),
        )
        .arg(
            Arg::new("urns")
                .short('u')
                .long("urns")
                .value_name("URNS.txt")
                .help("Text file containing the URNs of the documents to keep. The text needs no formatting.")
                .required(false),
        )
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Sort groups by value instead of order of first appearance.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max")
                .long("max")
                .value_name("DOCUMENTS")
                .help("Corpora larger than this are sampled.")
                .default_value("1200")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .value_name("DOCUMENTS")
                .help("Number of documents kept when the corpus is sampled.")
                .default_value("400")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .help("Seed used to sample large corpora.")
                .default_value("12393566520031723923")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .value_name("COLUMN_NAME")
                .help("Name of the column storing the document identifiers in both files.")
                .default_value(DEFAULT_ID_COLUMN),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Override the output files if they already exist.")
                .action(ArgAction::SetTrue),
        )
}

/// Output path of the matrix grouped by a column.
fn grouped_output_path(input_path: &str, output_path: Option<&str>, column: &str, several: bool) -> String {
    match output_path {
        Some(path) if several => format!("{}.{}.csv", path, column),
        Some(path) => path.to_string(),
        None => format!("{}.{}.dtm.csv", input_path, column),
    }
}

/// Builds document-term matrices.
///
/// # Arguments
///
/// * `input_path` - The path to the corpus.
/// * `counts_path` - The path to the word counts.
/// * `output_path` - The optional path to the output CSV file.
/// * `columns` - The grouping columns. If empty, the matrix is not grouped.
/// * `words` - Optional comma-separated list of the words to keep.
/// * `urns_path` - Optional path to a text file listing the URNs of the documents to keep.
/// * `sort` - Whether to sort the groups by value.
/// * `max_documents` - Corpora larger than this are sampled.
/// * `sample_size` - Number of documents kept when the corpus is sampled.
/// * `seed` - The seed used to sample the corpus.
/// * `id_column` - The column storing the document identifiers.
/// * `force` - Whether to override the output files if they already exist.
/// * `logger` - The logger displaying the progress.
///
/// # Returns
///
/// A result indicating success or failure of the operation.
pub fn run(
    input_path: &str,
    counts_path: &str,
    output_path: Option<&str>,
    columns: &[&str],
    words: Option<&str>,
    urns_path: Option<&str>,
    sort: bool,
    max_documents: usize,
    sample_size: usize,
    seed: u64,
    id_column: &str,
    force: bool,
    logger: &mut Logger,
) -> Result<(), Error> {
    check_path(input_path)?;
    check_path(counts_path)?;

    let mut unique_columns: Vec<&str> = Vec::with_capacity(columns.len());
    for column in columns {
        if !unique_columns.contains(column) {
            unique_columns.push(column);
        }
    }
    let several = unique_columns.len() > 1;
    let output_paths: Vec<String> = if unique_columns.is_empty() {
        vec![output_path
            .map(|p| p.to_string())
            .unwrap_or(format!("{}.dtm.csv", input_path))]
    } else {
        unique_columns
            .iter()
            .map(|c| grouped_output_path(input_path, output_path, c, several))
            .collect()
    };

    // Checks if the output files already exist
    for path in output_paths.iter() {
        log_output_file(logger, path, force)?;
    }

    let mut corpus: DataFrame = logger.log_completion("Loading corpus", || {
        open_csv(input_path, &[id_column])
    })?;
    for column in unique_columns.iter() {
        check_grouping_column(&corpus, id_column, column)?;
    }
    logger.log(&format!("{} documents found in the corpus.", corpus.height()))?;

    if let Some(urns_path) = urns_path {
        let urns: Vec<String> = extract_urns(&read_text(urns_path)?);
        if urns.is_empty() {
            logger.log_warning(&format!("No URN found in {}", urns_path))?;
        }
        let listed = corpus.height();
        corpus = select_urns(corpus, &urns)?;
        logger.log_ratio("Documents with a listed URN", corpus.height(), listed)?;
    }

    if corpus.height() > max_documents {
        logger.log_warning(&format!(
            "The corpus is larger than {} documents, a sample of {} documents is used instead.",
            max_documents, sample_size
        ))?;
        logger.log_seed(seed)?;
        corpus = sample_rows(&corpus, sample_size, seed)?;
    }

    let docs: Vec<DocumentRecord> = documents(&corpus, id_column)?;

    let mut table: CountTable = logger.log_completion("Loading word counts", || {
        open_csv(counts_path, &[id_column]).and_then(|df| counts(&df, id_column))
    })?;

    if let Some(words) = words {
        let words: Vec<String> = parse_words(words);
        table = table.select(&words);
        let missing: Vec<&str> = words
            .iter()
            .map(|w| w.as_str())
            .filter(|w| !table.terms().iter().any(|t| t == w))
            .collect();
        if !missing.is_empty() {
            logger.log_warning(&format!("No counts for {}", missing.join(", ")))?;
        }
    }
    logger.log(&format!("{} words in the matrix.", table.terms().len()))?;

    let with_counts = docs.iter().filter(|d| table.contains(d.id())).count();
    logger.log_ratio("Documents with counts", with_counts, docs.len())?;

    if unique_columns.is_empty() {
        let mut frame = matrix_frame(&docs, &table, id_column)?;
        return log_write_output(logger, &output_paths[0], &mut frame);
    }

    let mut cache = ExpansionCache::new(docs);
    for (column, path) in unique_columns.iter().zip(output_paths.iter()) {
        let mut grouped: GroupedCountTable = cache.grouped(&table, column)?;
        if sort {
            grouped = grouped.sorted();
        }

        let sizes = count_values(&cache.expanded(column), column);
        match sizes.rows().first() {
            Some((largest, size)) => logger.log(&format!(
                "\n{}: {} groups, the largest is {} ({} documents).",
                column,
                grouped.len(),
                largest,
                size
            ))?,
            None => logger.log(&format!("\n{}: {} groups.", column, grouped.len()))?,
        }

        let mut frame = grouped_frame(&grouped)?;
        log_write_output(logger, path, &mut frame)?;
    }
    Ok(())
}
