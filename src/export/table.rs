//! Flat table model shared by the projector and the reconciler.

/// A single cell. `None` is the explicit "no value" marker; missing values
/// are never represented by omission.
pub type Cell = Option<String>;

/// An ordered set of rows under an ordered, duplicate-free column header.
///
/// Built once per export run by the projector, possibly extended by the
/// reconciler, and written out as one sheet of the workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Rows are aligned 1:1 with the header.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A table with no rows; an empty sheet is never written to disk.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let table = Table::new(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(table.column_index("id"), Some(0));
        assert_eq!(table.column_index("name"), Some(1));
        assert_eq!(table.column_index("album"), None);
    }

    #[test]
    fn test_push_row_and_counts() {
        let mut table = Table::new(vec!["id".to_string()]);
        assert!(table.is_empty());

        table.push_row(vec![Some("a".to_string())]);
        table.push_row(vec![None]);

        assert_eq!(table.row_count(), 2);
        assert!(!table.is_empty());
    }
}
