//! Left outer joins over Arrow record batches, plus the fixed join rules
//! relating each bulk table to its parent.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, UInt32Array};
use arrow::compute::{cast, take};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use tracing::debug;

use crate::error::{Error, Result};
use crate::file_type::FileType;

/// Key columns and the name suffixes applied to overlapping columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinKeys {
    pub left_on: &'static str,
    pub right_on: &'static str,
    pub suffixes: (&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPlan {
    /// The table is returned unjoined.
    Identity,
    /// `parent ⟕ table`
    Parent { parent: FileType, keys: JoinKeys },
    /// `(root ⟕ middle) ⟕ table`
    Chain {
        root: FileType,
        middle: FileType,
        first: JoinKeys,
        second: JoinKeys,
    },
}

/// Left outer join of `left` and `right` on `keys`.
///
/// Left rows keep their order and repeat once per matching right row (in
/// right order); unmatched left rows get nulls in every right column. Null
/// keys never match. Both key columns are kept. A column name present on
/// both sides is renamed to `name + suffix` on each side.
pub fn left_join(left: &RecordBatch, right: &RecordBatch, keys: &JoinKeys) -> Result<RecordBatch> {
    let left_key = key_column(left, keys.left_on)?;
    let right_key = key_column(right, keys.right_on)?;
    let left_key = left_key.as_string::<i32>();
    let right_key = right_key.as_string::<i32>();

    let mut lookup: HashMap<&str, Vec<u32>> = HashMap::new();
    for (j, key) in right_key.iter().enumerate() {
        if let Some(key) = key {
            lookup.entry(key).or_default().push(j as u32);
        }
    }

    let mut left_idx: Vec<u32> = Vec::with_capacity(left.num_rows());
    let mut right_idx: Vec<Option<u32>> = Vec::with_capacity(left.num_rows());
    for (i, key) in left_key.iter().enumerate() {
        match key.and_then(|k| lookup.get(k)) {
            Some(matches) => {
                for &j in matches {
                    left_idx.push(i as u32);
                    right_idx.push(Some(j));
                }
            }
            None => {
                left_idx.push(i as u32);
                right_idx.push(None);
            }
        }
    }
    let num_rows = left_idx.len();
    let left_idx = UInt32Array::from(left_idx);
    let right_idx = UInt32Array::from(right_idx);

    let left_schema = left.schema();
    let right_schema = right.schema();
    let left_names: HashSet<&str> = left_schema.fields().iter().map(|f| f.name().as_str()).collect();
    let overlap: HashSet<&str> = right_schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .filter(|n| left_names.contains(n))
        .collect();

    let mut fields = Vec::with_capacity(left.num_columns() + right.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());
    for (side, schema, indices, suffix) in [
        (left, &left_schema, &left_idx, keys.suffixes.0),
        (right, &right_schema, &right_idx, keys.suffixes.1),
    ] {
        for (field, column) in schema.fields().iter().zip(side.columns()) {
            let name = if overlap.contains(field.name().as_str()) {
                format!("{}{}", field.name(), suffix)
            } else {
                field.name().clone()
            };
            fields.push(Field::new(name, field.data_type().clone(), true));
            columns.push(take(column.as_ref(), indices, None)?);
        }
    }

    debug!(
        left_rows = left.num_rows(),
        right_rows = right.num_rows(),
        rows = num_rows,
        on = keys.left_on,
        "left join"
    );
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &options,
    )?)
}

fn key_column(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })?;
    Ok(cast(column.as_ref(), &DataType::Utf8)?)
}
