//! Tabular output: a fixed column schema, rows appended in traversal order,
//! one atomic flush at the end. Two targets share the same row shape: a
//! workbook sheet and a delimited text file.

pub mod delimited;
pub mod schemas;
pub mod workbook;

pub use delimited::CsvTable;
pub use workbook::WorkbookTable;

/// One value in an output row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    /// Field representation for delimited output. Floats use the shortest
    /// round-trip form.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    /// Unit label for the units row, e.g. `[kip-ft]`. `None` for
    /// non-physical columns, which get a blank field.
    pub unit: Option<&'static str>,
}

/// Ordered column list for one output target.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn unit_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.unit.unwrap_or(""))
    }
}
