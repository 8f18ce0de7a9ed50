use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use csv::ReaderBuilder;

use crate::error::Result;

/// One CSV record keyed by the header, columns in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Value of `column`. With duplicated header names the last one wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .rposition(|h| h == column)
            .map(|i| self.values[i].as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys().zip(self.values())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse CSV text (header row first) into rows.
///
/// Every call parses `text` again and returns an independent `Vec`.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    Ok(Table::from_csv(text)?.into_rows())
}

/// A materialized CSV table: header plus rectangular string rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Short records are padded with empty strings, long ones truncated to the header.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn into_rows(self) -> Vec<Row> {
        let headers: Arc<[String]> = self.headers.into();
        self.rows
            .into_iter()
            .map(|values| Row {
                headers: Arc::clone(&headers),
                values,
            })
            .collect()
    }

    /// All columns become nullable `Utf8`.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .headers
            .iter()
            .map(|h| Field::new(h, DataType::Utf8, true))
            .collect();
        let columns: Vec<ArrayRef> = (0..self.headers.len())
            .map(|i| {
                Arc::new(StringArray::from_iter_values(
                    self.rows.iter().map(|row| row[i].as_str()),
                )) as ArrayRef
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            columns,
            &options,
        )?)
    }
}
