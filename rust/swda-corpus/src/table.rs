//! Headerless metadata tables from the Switchboard distribution (`conv.tab`,
//! `caller.tab` and friends), keyed by one of their columns.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::error::{Result, SwdaError};

/// One table row: column name to raw (trimmed) value.
pub type TableRow = HashMap<String, String>;

/// A headerless comma-delimited table loaded into memory, keyed by the value
/// of one column.
///
/// When a key repeats, the last row wins.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    rows: HashMap<String, TableRow>,
}

impl MetadataTable {
    /// Load `path`, naming its columns with `columns` and keying every row by
    /// the value in column `key_index`.
    ///
    /// Every field is trimmed of whitespace and then of surrounding `"`
    /// characters. Rows are zipped against `columns`, so extra fields are
    /// ignored and short rows simply lack the trailing columns.
    pub fn from_path(
        path: impl AsRef<Path>,
        columns: &[&str],
        key_index: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| SwdaError::file_access(path, error))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|error| SwdaError::from_csv(path, error))?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let fields: Vec<&str> = record
                .iter()
                .map(|field| field.trim().trim_matches('"'))
                .collect();

            let Some(key) = fields.get(key_index) else {
                return Err(SwdaError::malformed_row(
                    path,
                    line,
                    format!(
                        "key column {key_index} requested but the row has {} fields",
                        fields.len()
                    ),
                ));
            };

            let row = columns
                .iter()
                .zip(fields.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            rows.insert(key.to_string(), row);
        }

        tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded metadata table");

        Ok(Self { rows })
    }

    pub fn get(&self, key: &str) -> Option<&TableRow> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableRow)> {
        self.rows.iter().map(|(key, row)| (key.as_str(), row))
    }
}
