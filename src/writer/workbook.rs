//! Spreadsheet target built on rust_xlsxwriter. The worksheet is assembled
//! in memory and serialized to a buffer, then moved into place through a
//! temp file in the destination directory.

use std::io::Write as _;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::{ExtractError, Result};
use crate::writer::{Cell, Schema};

pub struct WorkbookTable {
    worksheet: Worksheet,
    schema: Schema,
    next_row: u32,
}

impl WorkbookTable {
    pub fn new(sheet_name: &str, schema: Schema) -> Result<Self> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(sheet_name)?;

        for (col, name) in schema.names().enumerate() {
            worksheet.write_string(0, col as u16, name)?;
        }

        Ok(Self {
            worksheet,
            schema,
            next_row: 1,
        })
    }

    pub fn append_row(&mut self, cells: Vec<Cell>) -> Result<()> {
        debug_assert_eq!(cells.len(), self.schema.len());

        for (col, cell) in cells.into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(value) => {
                    self.worksheet.write_string(self.next_row, col, &value)?;
                }
                Cell::Int(value) => {
                    self.worksheet
                        .write_number(self.next_row, col, value as f64)?;
                }
                Cell::Float(value) => {
                    self.worksheet.write_number(self.next_row, col, value)?;
                }
            }
        }

        self.next_row += 1;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        (self.next_row - 1) as usize
    }

    pub fn finalize(self, destination: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.worksheet);
        let buffer = workbook.save_to_buffer()?;

        let parent = destination.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(&buffer)?;
        temp.persist(destination)
            .map_err(|e| ExtractError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::schemas::{member_forces_sheet_schema, MEMBER_FORCES_SHEET};
    use tempfile::TempDir;

    #[test]
    fn test_finalize_writes_xlsx_package() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("MemberForceExtraction.xlsx");

        let mut table =
            WorkbookTable::new(MEMBER_FORCES_SHEET, member_forces_sheet_schema()).unwrap();
        table
            .append_row(vec![
                Cell::Text("B1".to_string()),
                Cell::Text("Beam".to_string()),
                Cell::Text("UB 305x165x40".to_string()),
                Cell::Float(3048.0),
                Cell::Int(1),
                Cell::Float(3048.0),
                Cell::Text("DL".to_string()),
                Cell::Float(0.5),
                Cell::Float(12.0),
                Cell::Float(0.0),
                Cell::Float(4.5),
                Cell::Float(0.0),
                Cell::Float(18.2),
                Cell::Float(0.1),
            ])
            .unwrap();
        assert_eq!(table.row_count(), 1);
        table.finalize(&destination).unwrap();

        let bytes = std::fs::read(&destination).unwrap();
        // An xlsx file is a zip package.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_rejects_invalid_sheet_name() {
        assert!(WorkbookTable::new("bad[name]", member_forces_sheet_schema()).is_err());
    }
}
