use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde_json::{Map, Value};

use crate::detection::coercer::coerce_text;
use crate::errors::DetectError;

/// Cell spellings decoded as missing values.
const NA_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

static MISSING: Value = Value::Null;

/// A decoded trade table: named columns over rows of loosely typed cells.
///
/// Column names are trimmed and lower-cased. Missing cells are `Value::Null`.
#[derive(Debug, Clone, Default)]
pub struct TradeTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

fn decode_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if NA_MARKERS.contains(&trimmed) {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

impl TradeTable {
    pub fn new(columns: Vec<String>) -> Self {
        let mut table = Self::default();
        for column in columns {
            table.add_column(&column);
        }
        table
    }

    fn add_column(&mut self, raw: &str) -> usize {
        let name = normalize_header(raw);
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.columns.len();
        self.index.insert(name.clone(), idx);
        self.columns.push(name);
        idx
    }

    /// Append a row. Short rows are padded with missing cells.
    pub fn push_row(&mut self, mut cells: Vec<Value>) -> Result<(), DetectError> {
        if cells.len() > self.columns.len() {
            return Err(DetectError::MalformedTable(format!(
                "row {} has {} fields, header has {}",
                self.rows.len() + 1,
                cells.len(),
                self.columns.len()
            )));
        }
        cells.resize(self.columns.len(), Value::Null);
        self.rows.push(cells);
        Ok(())
    }

    /// Decode CSV text with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DetectError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DetectError::MalformedTable(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut table = Self::new(headers);

        for record in csv_reader.records() {
            let record = record.map_err(|e| DetectError::MalformedTable(e.to_string()))?;
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }
            table.push_row(record.iter().map(decode_cell).collect())?;
        }

        Ok(table)
    }

    /// Build a table from JSON objects. Columns are the union of keys in
    /// encounter order; structured values (arrays, numbers) are kept as-is.
    pub fn from_json_rows(rows: Vec<Map<String, Value>>) -> Self {
        let mut table = Self::default();
        let mut decoded = Vec::with_capacity(rows.len());

        for row in rows {
            let mut cells: Vec<(usize, Value)> = Vec::with_capacity(row.len());
            for (key, value) in row {
                let idx = table.add_column(&key);
                let value = match value {
                    Value::String(s) => decode_cell(&s),
                    other => other,
                };
                cells.push((idx, value));
            }
            decoded.push(cells);
        }

        let width = table.columns.len();
        for cells in decoded {
            let mut row = vec![Value::Null; width];
            for (idx, value) in cells {
                row[idx] = value;
            }
            table.rows.push(row);
        }

        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `(row, column)`; unknown columns and rows read as missing.
    pub fn cell(&self, row: usize, column: &str) -> &Value {
        match (self.rows.get(row), self.index.get(column)) {
            (Some(cells), Some(&idx)) => cells.get(idx).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }

    /// Fail with the first required column that is absent.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), DetectError> {
        match required.iter().find(|c| !self.has_column(c)) {
            Some(missing) => Err(DetectError::MissingColumn((*missing).to_string())),
            None => Ok(()),
        }
    }

    /// Distinct non-missing values in a column, over every row.
    pub fn distinct_count(&self, column: &str) -> usize {
        let Some(&idx) = self.index.get(column) else {
            return 0;
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(coerce_text))
            .collect::<HashSet<String>>()
            .len()
    }
}
