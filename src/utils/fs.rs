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

//! Utility functions for file operations and I/O.

use polars::io::SerWriter;
use polars::prelude::{CsvReadOptions, CsvWriter, DataType, Field, Schema};
use polars::{frame::DataFrame, io::SerReader};

use super::error::*;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use std::{fs::File, io::BufReader, path::Path};

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum FileMode {
    Read,
    Overwrite,
}

/// Opens a file. In overwrite mode, creates the file and its parent directories if they do not exist.
///
/// # Arguments
///
/// * `path` - The path to the file.
/// * `mode` - The mode to open the file in.
///
/// # Returns
///
/// A file in the specified mode or an error if the file could not be opened or created.
pub fn open_file(path: &str, mode: FileMode) -> Result<File, Error> {
    if mode == FileMode::Overwrite {
        if let Some(parent) = Path::new(path).parent() {
            create_dir(parent)?;
        }
    }

    map_err(
        match mode {
            FileMode::Read => std::fs::File::open(path),
            FileMode::Overwrite => std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path),
        },
        &format!("Could not open {}", path),
    )
}

pub fn check_path(path: &str) -> Result<PathBuf, Error> {
    if Path::new(path).exists() {
        Ok(PathBuf::from(path))
    } else {
        Error::new(&format!("File or directory {} not found", path)).to_res()
    }
}

/// Reads a whole text file.
pub fn read_text(path: &str) -> Result<String, Error> {
    map_err(
        std::fs::read_to_string(path),
        &format!("Could not read {}", path),
    )
}

/// Creates a directory and its missing parents. Does nothing if it already exists.
///
/// # Arguments
///
/// * `path` - The path to the directory.
pub fn create_dir<P>(path: P) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let path_buf = path.as_ref().to_path_buf();
    match std::fs::create_dir_all(&path_buf) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Error::new(&format!(
            "Could not create directory {}: {}",
            path_buf.display(),
            e
        ))
        .to_res(),
    }
}

/// Deletes a file.
///
/// # Arguments
///
/// * `path` - The path to the file.
/// * `silent` - If true, does not raise an error if the file does not exist.
pub fn delete_file<P>(path: P, silent: bool) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let path_buf = path.as_ref().to_path_buf();
    match std::fs::remove_file(&path_buf) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && silent => Ok(()),
        Err(e) => Error::new(&format!(
            "Could not delete file {}: {}",
            path_buf.display(),
            e
        ))
        .to_res(),
    }
}

/// Reads a CSV file with a header into a DataFrame.
/// Column types are inferred from the whole file, except for the columns listed in `text_columns`
/// which are always read as strings (e.g., document identifiers that must match across files).
///
/// # Arguments
///
/// * `path` - The path to the CSV file.
/// * `text_columns` - Columns read as strings.
pub fn open_csv(path: &str, text_columns: &[&str]) -> Result<DataFrame, Error> {
    let overwrite: Option<Schema> = if text_columns.is_empty() {
        None
    } else {
        Some(Schema::from_iter(
            text_columns
                .iter()
                .map(|c| Field::new((*c).into(), DataType::String)),
        ))
    };
    map_err(
        CsvReadOptions::default()
            .with_schema_overwrite(overwrite.map(Arc::new))
            .with_infer_schema_length(None)
            .with_has_header(true)
            .into_reader_with_file_handle(BufReader::new(open_file(path, FileMode::Read)?))
            .finish(),
        &format!("Could not read {}", path),
    )
}

pub fn write_csv(path: &str, df: &mut DataFrame) -> Result<(), Error> {
    map_err(
        CsvWriter::new(BufWriter::new(open_file(path, FileMode::Overwrite)?))
            .include_header(true)
            .with_separator(b',')
            .finish(df),
        &format!("Could not write to {}", path),
    )
}
