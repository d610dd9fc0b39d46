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

//! Counts in how many documents of a corpus each subject appears.
//! Subjects are the '/'-separated values of a multi-valued column.
//! By default, the output file name is the same as the input file name with \".subjects.csv\" appended.

use clap::{Arg, ArgAction, Command};
use polars::frame::DataFrame;

use crate::grouping::{tally, CaseFilter, DocumentRecord, Tally};
use crate::utils::dataframes::*;
use crate::utils::error::*;
use crate::utils::fs::*;
use crate::utils::logger::{log_output_file, log_write_output, Logger};

/// Command line arguments parsing.
pub fn cli() -> Command {
    Command::new("subjects")
        .about("Counts in how many documents each subject appears.")
        .long_about(
            "Counts in how many documents of a corpus each value of a multi-valued column appears.\n\
             Values are separated by '/' and trimmed. Subjects are sorted by decreasing frequency.\n\
             By default, the output file name is the same as the input file name with \".subjects.csv\" appended.",
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
                .help("Path to the output csv file storing the frequencies.")
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
            Arg::new("case")
                .long("case")
                .value_name("CASE")
                .help("Keeps only the subjects in title case or in lower case.")
                .value_parser(["any", "title", "lower"])
                .default_value("any"),
        )
        .arg(
            Arg::new("percent")
                .long("percent")
                .help("Write frequencies as percentages of the kept subjects.")
                .action(ArgAction::SetTrue),
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

/// Writes the frequency of the subjects of a corpus.
///
/// # Arguments
///
/// * `input_path` - The path to the corpus.
/// * `output_path` - The optional path to the output CSV file. Defaults to the input path with ".subjects.csv" appended.
/// * `column` - The multi-valued column.
/// * `case` - Restriction on the case of the kept subjects: "any", "title" or "lower".
/// * `percent` - Whether frequencies are written as percentages.
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
    case: &str,
    percent: bool,
    id_column: &str,
    force: bool,
    logger: &mut Logger,
) -> Result<(), Error> {
    let default_output_path = format!("{}.subjects.csv", input_path);
    let output_path = output_path.unwrap_or(&default_output_path);
    let case: CaseFilter = map_err(case.parse::<CaseFilter>(), "Invalid case filter")?;

    check_path(input_path)?;

    // Checks if the output file already exists
    log_output_file(logger, output_path, force)?;

    let corpus: DataFrame = logger.log_completion("Loading corpus", || {
        open_csv(input_path, &[id_column])
    })?;
    check_grouping_column(&corpus, id_column, column)?;

    let docs: Vec<DocumentRecord> = documents(&corpus, id_column)?;
    logger.log(&format!("{} documents found in the file.", docs.len()))?;

    let all: Tally = tally(&docs, column)?;
    let kept: Tally = all.clone().filter(case);
    logger.log_ratio("Distinct subjects kept", kept.len(), all.len())?;

    if let Some((subject, frequency)) = kept.rows().first() {
        logger.log(&format!(
            "Most frequent subject: {} ({} documents).",
            subject, frequency
        ))?;
    } else {
        logger.log_warning(&format!("No subject found in column {}", column))?;
    }

    let mut frame = tally_frame(&kept, percent)?;

    // Writes the result to the output CSV file
    log_write_output(logger, output_path, &mut frame)
}
