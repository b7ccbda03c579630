use std::collections::HashSet;

use crate::export::{
    ExportError,
    table::{Cell, Table},
};

/// The stable track identifier column reconciliation keys on.
pub const ID_COLUMN: &str = "id";

pub const SHEET_ALL_SONGS: &str = "all-songs";
pub const SHEET_MISSING: &str = "missing-songs";
pub const SHEET_NEWLY_ADDED: &str = "newly-added";

/// Outcome of reconciling a fresh export against a previous one.
///
/// `missing` holds tracks present only in the previous export (removed since
/// then), `newly_added` tracks present only in the current one. Both are
/// `None` when the respective diff set is empty, which omits the sheet from
/// the written workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub all_songs: Table,
    pub missing: Option<Table>,
    pub newly_added: Option<Table>,
}

impl MergeResult {
    /// The sheets to persist, in write order. Empty tables are dropped.
    pub fn into_sheets(self) -> Vec<(String, Table)> {
        let mut sheets: Vec<(String, Table)> = Vec::new();

        if !self.all_songs.is_empty() {
            sheets.push((SHEET_ALL_SONGS.to_string(), self.all_songs));
        }
        if let Some(missing) = self.missing {
            if !missing.is_empty() {
                sheets.push((SHEET_MISSING.to_string(), missing));
            }
        }
        if let Some(newly_added) = self.newly_added {
            if !newly_added.is_empty() {
                sheets.push((SHEET_NEWLY_ADDED.to_string(), newly_added));
            }
        }

        sheets
    }
}

/// Reconciles the current export against an optional previous one.
///
/// Without a previous table the current table passes through unchanged.
/// Otherwise both tables must carry an [`ID_COLUMN`]; the id sets are diffed,
/// previous-only rows become `missing`, current-only rows become
/// `newly_added`, and `all_songs` is the union with the current table's row
/// winning whenever both sides define the same id. Rows from the previous
/// table are re-aligned to the current header by column name first; columns
/// the previous export lacks fill with the no-value marker.
pub fn reconcile(current: Table, previous: Option<Table>) -> Result<MergeResult, ExportError> {
    let Some(previous) = previous else {
        return Ok(MergeResult {
            all_songs: current,
            missing: None,
            newly_added: None,
        });
    };

    let cur_id = current
        .column_index(ID_COLUMN)
        .ok_or_else(|| ExportError::MissingIdColumn("current export".to_string()))?;
    let prev_id = previous
        .column_index(ID_COLUMN)
        .ok_or_else(|| ExportError::MissingIdColumn("previous export".to_string()))?;

    let new_ids: HashSet<&str> = current
        .rows
        .iter()
        .filter_map(|row| row_id(row, cur_id))
        .collect();
    let old_ids: HashSet<&str> = previous
        .rows
        .iter()
        .filter_map(|row| row_id(row, prev_id))
        .collect();

    // previous-header position for each current column
    let column_map: Vec<Option<usize>> = current
        .header
        .iter()
        .map(|name| previous.column_index(name))
        .collect();

    let mut missing = Table::new(current.header.clone());
    for row in &previous.rows {
        if let Some(id) = row_id(row, prev_id) {
            if !new_ids.contains(id) {
                missing.push_row(align_row(row, &column_map));
            }
        }
    }

    let mut newly_added = Table::new(current.header.clone());
    for row in &current.rows {
        if let Some(id) = row_id(row, cur_id) {
            if !old_ids.contains(id) {
                newly_added.push_row(row.clone());
            }
        }
    }

    // Union: current rows first, then missing rows whose id the current
    // table does not already define (new data wins over stale data).
    let mut all_songs = Table::new(current.header.clone());
    let mut seen: HashSet<String> = HashSet::new();
    for row in &current.rows {
        if let Some(id) = row_id(row, cur_id) {
            seen.insert(id.to_string());
        }
        all_songs.push_row(row.clone());
    }
    for row in &missing.rows {
        match row_id(row, cur_id) {
            Some(id) if seen.contains(id) => continue,
            Some(id) => {
                seen.insert(id.to_string());
                all_songs.push_row(row.clone());
            }
            None => all_songs.push_row(row.clone()),
        }
    }

    Ok(MergeResult {
        all_songs,
        missing: if missing.is_empty() {
            None
        } else {
            Some(missing)
        },
        newly_added: if newly_added.is_empty() {
            None
        } else {
            Some(newly_added)
        },
    })
}

fn row_id(row: &[Cell], id_index: usize) -> Option<&str> {
    row.get(id_index).and_then(|cell| cell.as_deref())
}

fn align_row(row: &[Cell], column_map: &[Option<usize>]) -> Vec<Cell> {
    column_map
        .iter()
        .map(|source| source.and_then(|i| row.get(i).cloned().flatten()))
        .collect()
}
