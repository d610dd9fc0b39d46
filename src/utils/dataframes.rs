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

//! Conversions between polars DataFrames and the tables of the grouping pipeline.

use polars::frame::DataFrame;
use polars::prelude::{Column, DataType, NamedFrom, Series};

use crate::grouping::{
    Count, CountTable, DocumentRecord, ExpandedRecord, GroupedCountTable, Tally, Value,
};
use crate::utils::error::*;

/// Default name of the column storing document identifiers.
pub const DEFAULT_ID_COLUMN: &str = "dhlabid";

/// Columns holding identifiers, which make no sense as grouping fields.
pub const IDENTIFIER_COLUMNS: [&str; 6] = ["dhlabid", "urn", "sesamid", "isbn", "oaiid", "isbn10"];

/// Prefix of the link to a document in the online library.
pub const ITEM_LINK_PREFIX: &str = "https://nb.no/items/";

pub fn has_column(df: &DataFrame, column: &str) -> bool {
    df.get_column_names()
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<&str>>()
        .contains(&column)
}

/// Names of the columns of a corpus, except the identifier column.
pub fn metadata_columns(df: &DataFrame, id_column: &str) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|s| s != id_column)
        .collect()
}

/// Names of the columns of a corpus that can be used to group documents.
pub fn groupable_columns(df: &DataFrame, id_column: &str) -> Vec<String> {
    metadata_columns(df, id_column)
        .into_iter()
        .filter(|c| !IDENTIFIER_COLUMNS.contains(&c.as_str()))
        .collect()
}

/// Checks that a column of a corpus exists and is not the identifier column.
/// The error message lists the columns that can be used instead.
///
/// # Arguments
///
/// * `df` - The corpus.
/// * `id_column` - The column storing the identifiers of the documents.
/// * `column` - The requested grouping column.
pub fn check_grouping_column(df: &DataFrame, id_column: &str, column: &str) -> Result<(), Error> {
    if column != id_column && has_column(df, column) {
        Ok(())
    } else {
        Error::new(&format!(
            "Cannot group by {}. Columns available for grouping: {}",
            column,
            groupable_columns(df, id_column).join(", ")
        ))
        .to_res()
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, Error> {
    map_err(df.column(name), &format!("Could not find column {}", name))
}

/// Values of a column of a DataFrame, null cells included.
pub fn values(df: &DataFrame, name: &str) -> Result<Vec<Value>, Error> {
    let col = column(df, name)?;
    let dtype: DataType = col.dtype().clone();
    let msg = format!("Could not read the values of column {}", name);
    if dtype.is_integer() {
        let cast = map_err(col.cast(&DataType::Int64), &msg)?;
        Ok(map_err(cast.i64(), &msg)?.into_iter().map(Value::from).collect())
    } else if dtype.is_float() {
        let cast = map_err(col.cast(&DataType::Float64), &msg)?;
        Ok(map_err(cast.f64(), &msg)?.into_iter().map(Value::from).collect())
    } else if dtype == DataType::Boolean {
        Ok(map_err(col.bool(), &msg)?.into_iter().map(Value::from).collect())
    } else {
        let cast = map_err(col.cast(&DataType::String), &msg)?;
        Ok(map_err(cast.str(), &msg)?.into_iter().map(Value::from).collect())
    }
}

/// Document identifiers stored in a column. Null identifiers are an error.
pub fn identifiers(df: &DataFrame, id_column: &str) -> Result<Vec<String>, Error> {
    let col = column(df, id_column)?;
    let cast = map_err(
        col.cast(&DataType::String),
        &format!("Could not read identifiers in column {}", id_column),
    )?;
    map_err(cast.str(), "Identifiers are not strings")?
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            ok_or_else(
                id.map(|s| s.to_string()),
                &format!("Missing identifier in row {}", row + 1),
            )
        })
        .collect()
}

/// Converts a corpus into document records.
///
/// # Arguments
///
/// * `df` - The corpus, one row per document.
/// * `id_column` - The column storing the identifiers of the documents.
pub fn documents(df: &DataFrame, id_column: &str) -> Result<Vec<DocumentRecord>, Error> {
    let ids = identifiers(df, id_column)?;
    let columns: Vec<(String, Vec<Value>)> = metadata_columns(df, id_column)
        .into_iter()
        .map(|name| values(df, &name).map(|v| (name, v)))
        .collect::<Result<_, _>>()?;

    Ok(ids
        .into_iter()
        .enumerate()
        .map(|(row, id)| {
            columns
                .iter()
                .fold(DocumentRecord::new(id), |doc, (name, values)| {
                    doc.with(name, values[row].clone())
                })
        })
        .collect())
}

/// Converts a table of word counts into a count table.
/// Every column except the identifier column is a term. Null cells are zero counts.
///
/// # Arguments
///
/// * `df` - The counts, one row per document.
/// * `id_column` - The column storing the identifiers of the documents.
pub fn counts(df: &DataFrame, id_column: &str) -> Result<CountTable, Error> {
    let ids = identifiers(df, id_column)?;
    let mut table = CountTable::new();

    for term in metadata_columns(df, id_column) {
        table.add_term(&term);
        let col = column(df, &term)?;
        let msg = format!("Could not read the counts of {}", term);
        if col.dtype().is_integer() {
            let cast = map_err(col.cast(&DataType::Int64), &msg)?;
            for (id, count) in ids.iter().zip(map_err(cast.i64(), &msg)?.into_iter()) {
                let count = map_err(u64::try_from(count.unwrap_or(0)), &msg)?;
                table.insert(id.clone(), &term, count);
            }
        } else if col.dtype().is_float() {
            let cast = map_err(col.cast(&DataType::Float64), &msg)?;
            for (id, count) in ids.iter().zip(map_err(cast.f64(), &msg)?.into_iter()) {
                table.insert(id.clone(), &term, count.unwrap_or(0.0));
            }
        } else {
            return Error::new(&format!("Column {} does not contain counts", term)).to_res();
        }
    }
    Ok(table)
}

/// Builds a column from values, choosing the narrowest type holding all of them.
fn values_column(name: &str, values: &[Value]) -> Column {
    let non_null = || values.iter().filter(|v| !v.is_null());
    if non_null().all(|v| matches!(v, Value::Int(_))) {
        let cells: Vec<Option<i64>> = values
            .iter()
            .map(|v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        Series::new(name.into(), cells).into()
    } else if non_null().all(|v| matches!(v, Value::Int(_) | Value::Float(_))) {
        let cells: Vec<Option<f64>> = values
            .iter()
            .map(|v| match v {
                Value::Int(i) => Some(*i as f64),
                Value::Float(x) => Some(*x),
                _ => None,
            })
            .collect();
        Series::new(name.into(), cells).into()
    } else if non_null().all(|v| matches!(v, Value::Bool(_))) {
        let cells: Vec<Option<bool>> = values
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name.into(), cells).into()
    } else {
        let cells: Vec<Option<String>> = values
            .iter()
            .map(|v| Some(v.to_string()).filter(|_| !v.is_null()))
            .collect();
        Series::new(name.into(), cells).into()
    }
}

/// Builds a column of counts. Integer columns stay integers unless one of the counts is a float.
fn counts_column(name: &str, counts: &[Count]) -> Column {
    if counts.iter().any(Count::is_float) {
        let cells: Vec<f64> = counts.iter().map(Count::as_f64).collect();
        Series::new(name.into(), cells).into()
    } else {
        let cells: Vec<u64> = counts
            .iter()
            .map(|c| match c {
                Count::Int(i) => *i,
                Count::Float(x) => *x as u64,
            })
            .collect();
        Series::new(name.into(), cells).into()
    }
}

/// Converts expanded records back into a corpus.
/// Empty parts (e.g., from "a//b") stay empty strings in the DataFrame.
/// Written to CSV they become empty cells, which are read back as nulls.
///
/// # Arguments
///
/// * `records` - The expanded records.
/// * `id_column` - Name of the identifier column, written first.
/// * `columns` - The metadata columns, in output order.
pub fn expanded_frame(
    records: &[ExpandedRecord],
    id_column: &str,
    columns: &[String],
) -> Result<DataFrame, Error> {
    let ids: Vec<&str> = records.iter().map(|r| r.id()).collect();
    let mut frame: Vec<Column> = vec![Series::new(id_column.into(), ids).into()];
    for name in columns {
        let cells: Vec<Value> = records
            .iter()
            .map(|r| r.get(name).cloned().unwrap_or(Value::Null))
            .collect();
        frame.push(values_column(name, &cells));
    }
    map_err(DataFrame::new(frame), "Could not build the expanded corpus")
}

/// Converts grouped counts into a DataFrame with one row per group.
/// The first column holds the groups and is named after the grouping field.
pub fn grouped_frame(grouped: &GroupedCountTable) -> Result<DataFrame, Error> {
    let keys: Vec<Value> = grouped.keys().cloned().collect();
    let mut frame: Vec<Column> = vec![values_column(grouped.field(), &keys)];
    for (pos, term) in grouped.terms().iter().enumerate() {
        let cells: Vec<Count> = grouped
            .groups()
            .iter()
            .map(|(_, counts)| counts[pos])
            .collect();
        frame.push(counts_column(term, &cells));
    }
    map_err(DataFrame::new(frame), "Could not build the grouped counts")
}

/// Builds the document-term matrix of the documents of a corpus that have counts, in corpus order.
/// If the corpus has a `urn` column, a `link` column points to each document in the online library.
///
/// # Arguments
///
/// * `documents` - The corpus.
/// * `counts` - The word counts.
/// * `id_column` - Name of the identifier column, written first.
pub fn matrix_frame(
    documents: &[DocumentRecord],
    counts: &CountTable,
    id_column: &str,
) -> Result<DataFrame, Error> {
    let rows: Vec<&DocumentRecord> = documents
        .iter()
        .filter(|d| counts.contains(d.id()))
        .collect();
    let ids: Vec<&str> = rows.iter().map(|d| d.id()).collect();
    let mut frame: Vec<Column> = vec![Series::new(id_column.into(), ids).into()];

    for term in counts.terms() {
        let cells: Vec<Count> = rows.iter().map(|d| counts.get(d.id(), term)).collect();
        frame.push(counts_column(term, &cells));
    }

    if documents.iter().any(|d| d.has_field("urn")) {
        let links: Vec<Option<String>> = rows
            .iter()
            .map(|d| {
                d.get("urn")
                    .and_then(Value::as_str)
                    .map(|urn| format!("{}{}", ITEM_LINK_PREFIX, urn))
            })
            .collect();
        frame.push(Series::new("link".into(), links).into());
    }
    map_err(DataFrame::new(frame), "Could not build the document-term matrix")
}

/// Converts a tally into a DataFrame with one row per value.
///
/// # Arguments
///
/// * `tally` - The tally.
/// * `percent` - Whether frequencies are written as percentages of the total.
pub fn tally_frame(tally: &Tally, percent: bool) -> Result<DataFrame, Error> {
    let keys: Vec<&str> = tally.rows().iter().map(|(v, _)| v.as_str()).collect();
    let frequencies: Column = if percent {
        let cells: Vec<f64> = tally.percentages().into_iter().map(|(_, p)| p).collect();
        Series::new("percent".into(), cells).into()
    } else {
        let cells: Vec<u64> = tally.rows().iter().map(|(_, n)| *n).collect();
        Series::new("frequency".into(), cells).into()
    };
    map_err(
        DataFrame::new(vec![Series::new(tally.field().into(), keys).into(), frequencies]),
        "Could not build the tally",
    )
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::grouping::{aggregate, expand, tally};
    use crate::utils::fs::open_csv;

    fn corpus() -> DataFrame {
        open_csv("tests/data/corpus.csv", &[DEFAULT_ID_COLUMN]).unwrap()
    }

    fn word_counts() -> DataFrame {
        open_csv("tests/data/counts.csv", &[DEFAULT_ID_COLUMN]).unwrap()
    }

    #[test]
    fn test_columns() {
        let df = corpus();
        assert!(has_column(&df, "subjects"));
        assert!(!has_column(&df, "genre"));
        assert_eq!(
            metadata_columns(&df, DEFAULT_ID_COLUMN),
            vec!["urn", "title", "year", "subjects"]
        );
        assert_eq!(
            groupable_columns(&df, DEFAULT_ID_COLUMN),
            vec!["title", "year", "subjects"]
        );
        assert!(check_grouping_column(&df, DEFAULT_ID_COLUMN, "subjects").is_ok());
        assert!(check_grouping_column(&df, DEFAULT_ID_COLUMN, DEFAULT_ID_COLUMN).is_err());
        let err = check_grouping_column(&df, DEFAULT_ID_COLUMN, "genre").err().unwrap();
        assert!(err.to_string(false).contains("title, year, subjects"));
    }

    #[test]
    fn test_documents() {
        let docs = documents(&corpus(), DEFAULT_ID_COLUMN).unwrap();
        assert_eq!(docs.len(), 5);
        assert_eq!(docs[0].id(), "100");
        assert_eq!(docs[0].get("year"), Some(&Value::Int(1905)));
        assert_eq!(docs[0].get("subjects"), Some(&Value::from("Norge/fiske")));
        assert_eq!(docs[2].get("subjects"), Some(&Value::Null));
        assert!(docs[0].get(DEFAULT_ID_COLUMN).is_none());

        assert!(documents(&corpus(), "missing").is_err());
    }

    #[test]
    fn test_counts() {
        let table = counts(&word_counts(), DEFAULT_ID_COLUMN).unwrap();
        assert_eq!(table.terms(), &["hav", "fisk", "krig"]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("101", "fisk"), Count::Int(7));
        assert!(!table.contains("102"));

        // Text columns are not counts
        assert!(counts(&corpus(), DEFAULT_ID_COLUMN).is_err());
    }

    #[test]
    fn test_expanded_frame() {
        let df = corpus();
        let docs = documents(&df, DEFAULT_ID_COLUMN).unwrap();
        let expanded = expand(&docs, "subjects");
        let frame = expanded_frame(
            &expanded,
            DEFAULT_ID_COLUMN,
            &metadata_columns(&df, DEFAULT_ID_COLUMN),
        )
        .unwrap();
        assert_eq!(frame.height(), expanded.len());
        assert_eq!(frame.width(), 5);
        assert_eq!(frame.column("year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            frame.column(DEFAULT_ID_COLUMN).unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_expanded_frame_keeps_empty_parts() {
        let docs = vec![DocumentRecord::new("1").with("subjects", "a//b")];
        let expanded = expand(&docs, "subjects");
        let frame = expanded_frame(&expanded, DEFAULT_ID_COLUMN, &["subjects".to_string()]).unwrap();
        let parts = frame.column("subjects").unwrap().str().unwrap().clone();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.get(1), Some(""));
        assert_eq!(parts.null_count(), 0);
    }

    #[test]
    fn test_float_values() {
        let df = DataFrame::new(vec![
            Series::new("score".into(), [1.5, -0.0, f64::NAN]).into(),
        ])
        .unwrap();
        let scores = values(&df, "score").unwrap();
        assert_eq!(scores[0], Value::Float(1.5));
        assert_eq!(scores[1], Value::Float(0.0));
        assert!(scores[2].is_null());
    }

    #[test]
    fn test_grouped_frame() {
        let docs = documents(&corpus(), DEFAULT_ID_COLUMN).unwrap();
        let table = counts(&word_counts(), DEFAULT_ID_COLUMN).unwrap();
        let grouped = aggregate(&expand(&docs, "subjects"), &table, "subjects").unwrap();
        let frame = grouped_frame(&grouped).unwrap();
        assert_eq!(frame.height(), grouped.len());
        assert_eq!(
            frame.get_column_names()[0].as_str(),
            "subjects"
        );
        assert_eq!(frame.column("fisk").unwrap().dtype(), &DataType::UInt64);
    }

    #[test]
    fn test_matrix_frame() {
        let docs = documents(&corpus(), DEFAULT_ID_COLUMN).unwrap();
        let table = counts(&word_counts(), DEFAULT_ID_COLUMN).unwrap();
        let frame = matrix_frame(&docs, &table, DEFAULT_ID_COLUMN).unwrap();
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.width(), 5);
        let links = frame.column("link").unwrap().str().unwrap().clone();
        assert_eq!(
            links.get(0),
            Some("https://nb.no/items/URN:NBN:no-nb_digibok_2008051404065")
        );
    }

    #[test]
    fn test_tally_frame() {
        let docs = documents(&corpus(), DEFAULT_ID_COLUMN).unwrap();
        let t = tally(&docs, "subjects").unwrap();
        let frame = tally_frame(&t, false).unwrap();
        assert_eq!(frame.height(), t.len());
        assert!(has_column(&frame, "frequency"));
        let frame = tally_frame(&t, true).unwrap();
        assert!(has_column(&frame, "percent"));
    }
}
