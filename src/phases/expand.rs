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

//! Splits a multi-valued column of a corpus so that every row holds a single value.
//! Values are separated by '/' (e.g., "history/politics") and trimmed.
//! A document with N distinct values yields N rows, all other columns being copied.
//! Duplicate rows are discarded.
//! By default, the output file name is the same as the input file name with \".expanded.csv\" appended.

use clap::{Arg, ArgAction, Command};
use polars::frame::DataFrame;

use crate::grouping::{expand, split_parts, DocumentRecord, ExpandedRecord, Value};
use crate::utils::dataframes::*;
use crate::utils::error::*;
use crate::utils::fs::*;
use crate::utils::logger::{log_output_file, log_write_output, Logger};

/// Command line arguments parsing.
pub fn cli() -> Command {
    Command::new("expand")
        .about("Splits a multi-valued column of a corpus into one row per value.")
        .long_about(
            "Splits a multi-valued column of a corpus into one row per value.\n\
             Values are separated by '/' and trimmed. All other columns are copied and duplicate rows are discarded.\n\
             By default, the output file name is the same as the input file name with \".expanded.csv\" appended.",
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
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_FILE.csv")
                .help("Path to the output csv file storing the expanded corpus.")
                .required(false),
        )
        .arg(
            Arg::new("column")
                .short('c')
                .long("column")
                .value_name("COLUMN_NAME")
                .help("Name of the multi-valued column.")
                .default_value("subjects"),
        )
        .arg(
            Arg::new("id")
                .long("id")
                .value_name("COLUMN_NAME")
                .help("Name of the column storing the document identifiers.")
                .default_value(DEFAULT_ID_COLUMN),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Override the output file if it already exists.")
                .action(ArgAction::SetTrue),
        )
}

/// Expands a multi-valued column of a corpus.
///
/// # Arguments
///
/// * `input_path` - The path to the corpus.
/// * `output_path` - The optional path to the output CSV file. Defaults to the input path with ".expanded.csv" appended.
/// * `column` - The multi-valued column.
/// * `id_column` - The column storing the document identifiers.
/// * `force` - Whether to override the output file if it already exists.
/// * `logger` - The logger displaying the progress.
///
/// # Returns
///
/// A result indicating success or failure of the operation.
pub fn run(
    input_path: &str,
    output_path: Option<&str>,
    column: &str,
    id_column: &str,
    force: bool,
    logger: &mut Logger,
) -> Result<(), Error> {
    let default_output_path = format!("{}.expanded.csv", input_path);
    let output_path = output_path.unwrap_or(&default_output_path);

    check_path(input_path)?;

    // Checks if the output file already exists
    log_output_file(logger, output_path, force)?;

    let corpus: DataFrame = logger.log_completion("Loading corpus", || {
        open_csv(input_path, &[id_column])
    })?;
    check_grouping_column(&corpus, id_column, column)?;

    let docs: Vec<DocumentRecord> = documents(&corpus, id_column)?;
    logger.log(&format!("{} documents found in the file.", docs.len()))?;

    let multi_valued = docs
        .iter()
        .filter(|d| {
            d.get(column)
                .and_then(Value::as_str)
                .is_some_and(|s| split_parts(s).len() > 1)
        })
        .count();
    let without_value = docs
        .iter()
        .filter(|d| d.get(column).is_none_or(Value::is_null))
        .count();
    logger.log_ratio("Documents with several values", multi_valued, docs.len())?;
    logger.log_ratio("Documents without value", without_value, docs.len())?;

    let expanded: Vec<ExpandedRecord> = expand(&docs, column);
    logger.log(&format!("{} rows after expansion.", expanded.len()))?;

    let mut frame = expanded_frame(&expanded, id_column, &metadata_columns(&corpus, id_column))?;

    // Writes the result to the output CSV file
    log_write_output(logger, output_path, &mut frame)
}
