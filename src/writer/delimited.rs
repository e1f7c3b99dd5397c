//! Delimited text target. Rows accumulate in memory and are flushed once,
//! through a temp file in the destination directory so a failed write never
//! leaves a readable partial file.

use std::path::Path;

use crate::error::{ExtractError, Result};
use crate::writer::{Cell, Schema};

pub struct CsvTable {
    schema: Schema,
    rows: Vec<Vec<Cell>>,
}

impl CsvTable {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn append_row(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.schema.len());
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Write header row, units row, then every appended row, and atomically
    /// move the result to `destination`.
    pub fn finalize(self, destination: &Path) -> Result<()> {
        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;

        {
            let mut writer = csv::Writer::from_writer(temp.as_file_mut());
            writer.write_record(self.schema.names())?;
            writer.write_record(self.schema.unit_labels())?;

            for row in &self.rows {
                writer.write_record(row.iter().map(|cell| cell.to_field()))?;
            }

            writer.flush()?;
        }

        temp.persist(destination)
            .map_err(|e| ExtractError::Io(e.error))?;

        Ok(())
    }
}
