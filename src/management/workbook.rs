use std::path::PathBuf;

use crate::export::table::{Cell, Table};

#[derive(Debug)]
pub enum WorkbookError {
    IoError(std::io::Error),
    CsvError(csv::Error),
    CriticalError(String),
}

impl From<std::io::Error> for WorkbookError {
    fn from(err: std::io::Error) -> Self {
        WorkbookError::IoError(err)
    }
}

impl From<csv::Error> for WorkbookError {
    fn from(err: csv::Error) -> Self {
        WorkbookError::CsvError(err)
    }
}

impl std::fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkbookError::IoError(e) => write!(f, "io error: {}", e),
            WorkbookError::CsvError(e) => write!(f, "csv error: {}", e),
            WorkbookError::CriticalError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for WorkbookError {}

/// Persists an export run as a family of CSV sheet files sharing one stem.
///
/// The first sheet is written at the workbook path itself; every further
/// sheet lands next to it as `<stem>.<sheet-name>.csv`. Sheets are written in
/// the order given; empty sheets are skipped so no blank file appears.
/// Reading back a previous export only ever touches the primary sheet.
pub struct WorkbookManager {
    path: PathBuf,
}

impl WorkbookManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn sheet_path(&self, index: usize, sheet: &str) -> PathBuf {
        if index == 0 {
            return self.path.clone();
        }

        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());
        self.path.with_file_name(format!("{}.{}.csv", stem, sheet))
    }

    /// Writes the given sheets in order and returns the paths produced.
    pub async fn write_sheets(
        &self,
        sheets: &[(String, Table)],
    ) -> Result<Vec<PathBuf>, WorkbookError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let mut written: Vec<PathBuf> = Vec::new();
        for (index, (sheet, table)) in sheets.iter().enumerate() {
            if table.is_empty() {
                continue;
            }

            let bytes = sheet_to_csv(table)?;
            let path = self.sheet_path(index, sheet);
            async_fs::write(&path, bytes).await?;
            written.push(path);
        }

        Ok(written)
    }

    /// Loads the primary (all-songs) sheet of a previous export run.
    pub async fn read_primary(&self) -> Result<Table, WorkbookError> {
        let bytes = async_fs::read(&self.path).await?;
        sheet_from_csv(&bytes)
    }
}

fn sheet_to_csv(table: &Table) -> Result<Vec<u8>, WorkbookError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer
        .into_inner()
        .map_err(|e| WorkbookError::CriticalError(e.to_string()))
}

fn sheet_from_csv(bytes: &[u8]) -> Result<Table, WorkbookError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut table: Option<Table> = None;
    for record in reader.records() {
        let record = record?;
        match table {
            None => {
                table = Some(Table::new(record.iter().map(str::to_string).collect()));
            }
            Some(ref mut t) => {
                let mut row: Vec<Cell> = record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            None
                        } else {
                            Some(field.to_string())
                        }
                    })
                    .collect();
                // ragged rows align to the header width
                row.resize(t.header.len(), None);
                t.push_row(row);
            }
        }
    }

    table.ok_or_else(|| WorkbookError::CriticalError("spreadsheet file has no header row".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(vec![
            "id".to_string(),
            "name".to_string(),
            "primary-artist".to_string(),
        ]);
        table.push_row(vec![
            Some("t1".to_string()),
            Some("Song One".to_string()),
            Some("A".to_string()),
        ]);
        table.push_row(vec![Some("t2".to_string()), Some("Song Two".to_string()), None]);
        table
    }

    #[test]
    fn test_sheet_to_csv_marks_no_value_as_empty_field() {
        let bytes = sheet_to_csv(&sample_table()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("id,name,primary-artist\n"));
        assert!(text.contains("t2,Song Two,\n"));
    }

    #[test]
    fn test_sheet_from_csv_restores_markers_and_header() {
        let bytes = sheet_to_csv(&sample_table()).unwrap();
        let table = sheet_from_csv(&bytes).unwrap();

        assert_eq!(table.header, vec!["id", "name", "primary-artist"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1][2], None);
    }

    #[test]
    fn test_sheet_from_csv_rejects_empty_input() {
        assert!(sheet_from_csv(b"").is_err());
    }

    #[test]
    fn test_sheet_from_csv_aligns_ragged_rows() {
        let table = sheet_from_csv(b"id,name\nt1\n").unwrap();
        assert_eq!(table.rows[0], vec![Some("t1".to_string()), None]);
    }
}
