use std::collections::HashSet;

use spexcli::export::{
    Cell, ExportError, Table, reconcile,
    reconciler::{SHEET_ALL_SONGS, SHEET_MISSING, SHEET_NEWLY_ADDED},
};

// Helper function to create a two-column table with one row per id
fn create_test_table(ids: &[&str]) -> Table {
    let mut table = Table::new(vec!["id".to_string(), "name".to_string()]);
    for id in ids {
        table.push_row(vec![
            Some(id.to_string()),
            Some(format!("Song {}", id)),
        ]);
    }
    table
}

fn ids_of(table: &Table) -> Vec<String> {
    let id_col = table.column_index("id").unwrap();
    table
        .rows
        .iter()
        .map(|row| row[id_col].clone().unwrap_or_default())
        .collect()
}

#[test]
fn test_reconcile_without_previous_passes_current_through() {
    let current = create_test_table(&["1", "2"]);
    let result = reconcile(current.clone(), None).unwrap();

    assert_eq!(result.all_songs, current);
    assert!(result.missing.is_none());
    assert!(result.newly_added.is_none());
}

#[test]
fn test_reconcile_detects_missing_and_newly_added() {
    let previous = create_test_table(&["1", "2", "3"]);
    let current = create_test_table(&["2", "3", "4"]);

    let result = reconcile(current, Some(previous)).unwrap();

    // Track 1 was removed, track 4 was added
    assert_eq!(ids_of(result.missing.as_ref().unwrap()), vec!["1"]);
    assert_eq!(ids_of(result.newly_added.as_ref().unwrap()), vec!["4"]);

    // The union carries every id exactly once
    let all_ids = ids_of(&result.all_songs);
    let unique: HashSet<&String> = all_ids.iter().collect();
    assert_eq!(all_ids.len(), 4);
    assert_eq!(unique.len(), 4);
    for id in ["1", "2", "3", "4"] {
        assert!(all_ids.contains(&id.to_string()));
    }
}

#[test]
fn test_reconcile_identical_id_sets_yields_no_diffs() {
    let previous = create_test_table(&["1", "2", "3"]);
    let current = create_test_table(&["1", "2", "3"]);

    let result = reconcile(current.clone(), Some(previous)).unwrap();

    assert!(result.missing.is_none());
    assert!(result.newly_added.is_none());
    assert_eq!(result.all_songs, current);
}

#[test]
fn test_reconcile_is_idempotent_against_itself() {
    let current = create_test_table(&["a", "b", "c"]);

    let result = reconcile(current.clone(), Some(current.clone())).unwrap();

    // Reconciling against an identical previous export reproduces the
    // current table unchanged, with no duplicated rows
    assert_eq!(result.all_songs, current);
    assert!(result.missing.is_none());
    assert!(result.newly_added.is_none());
}

#[test]
fn test_reconcile_new_data_wins_for_shared_ids() {
    let mut previous = Table::new(vec!["id".to_string(), "name".to_string()]);
    previous.push_row(vec![Some("1".to_string()), Some("Old Title".to_string())]);
    previous.push_row(vec![Some("2".to_string()), Some("Gone".to_string())]);

    let mut current = Table::new(vec!["id".to_string(), "name".to_string()]);
    current.push_row(vec![Some("1".to_string()), Some("New Title".to_string())]);

    let result = reconcile(current, Some(previous)).unwrap();

    // Shared id 1 keeps the current table's row
    let name_col = result.all_songs.column_index("name").unwrap();
    let row1 = result
        .all_songs
        .rows
        .iter()
        .find(|row| row[0] == Some("1".to_string()))
        .unwrap();
    assert_eq!(row1[name_col], Some("New Title".to_string()));

    // Id 2 survives through the missing sheet into the union
    assert_eq!(ids_of(&result.all_songs), vec!["1", "2"]);
    assert_eq!(ids_of(result.missing.as_ref().unwrap()), vec!["2"]);
}

#[test]
fn test_reconcile_requires_id_column() {
    let mut no_id = Table::new(vec!["name".to_string()]);
    no_id.push_row(vec![Some("Song".to_string())]);

    let current = create_test_table(&["1"]);
    let result = reconcile(current.clone(), Some(no_id.clone()));
    assert!(matches!(result, Err(ExportError::MissingIdColumn(_))));

    let result = reconcile(no_id, Some(current));
    assert!(matches!(result, Err(ExportError::MissingIdColumn(_))));
}

#[test]
fn test_reconcile_aligns_previous_rows_to_current_header() {
    // The previous export used different columns and a different order
    let mut previous = Table::new(vec!["popularity".to_string(), "id".to_string()]);
    previous.push_row(vec![Some("55".to_string()), Some("1".to_string())]);

    let mut current = Table::new(vec!["id".to_string(), "name".to_string()]);
    current.push_row(vec![Some("2".to_string()), Some("Song 2".to_string())]);

    let result = reconcile(current, Some(previous)).unwrap();

    let missing = result.missing.unwrap();
    assert_eq!(missing.header, vec!["id", "name"]);

    // The id travels to its new position; columns the previous export
    // lacked fill with the no-value marker
    assert_eq!(missing.rows[0], vec![Some("1".to_string()), None]);
}

#[test]
fn test_reconcile_ignores_rows_without_id_value() {
    let mut previous = Table::new(vec!["id".to_string(), "name".to_string()]);
    previous.push_row(vec![None, Some("Unidentified".to_string())]);
    previous.push_row(vec![Some("1".to_string()), Some("Song 1".to_string())]);

    let mut current = Table::new(vec!["id".to_string(), "name".to_string()]);
    current.push_row(vec![None, Some("Also unidentified".to_string())]);

    let result = reconcile(current, Some(previous)).unwrap();

    // Only rows with a non-null id participate in the diff sets
    assert_eq!(ids_of(result.missing.as_ref().unwrap()), vec!["1"]);
    assert!(result.newly_added.is_none());

    // The current table's id-less row still reaches the union
    assert_eq!(result.all_songs.row_count(), 2);
}

#[test]
fn test_into_sheets_order_and_omission() {
    let previous = create_test_table(&["1", "2"]);
    let current = create_test_table(&["2", "3"]);

    let sheets = reconcile(current, Some(previous)).unwrap().into_sheets();
    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();

    // Insertion order: all songs, then missing, then newly added
    assert_eq!(names, vec![SHEET_ALL_SONGS, SHEET_MISSING, SHEET_NEWLY_ADDED]);
}

#[test]
fn test_into_sheets_skips_empty_diff_sheets() {
    let current = create_test_table(&["1"]);

    let sheets = reconcile(current.clone(), Some(current))
        .unwrap()
        .into_sheets();
    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();

    // No blank missing/newly-added sheets
    assert_eq!(names, vec![SHEET_ALL_SONGS]);
}

#[test]
fn test_into_sheets_on_empty_export() {
    let empty = Table::new(vec!["id".to_string()]);
    let sheets = reconcile(empty, None).unwrap().into_sheets();

    // Nothing to write at all
    assert!(sheets.is_empty());
}

#[test]
fn test_cell_markers_survive_reconciliation() {
    let mut current = Table::new(vec!["id".to_string(), "featured-artists".to_string()]);
    current.push_row(vec![Some("1".to_string()), None]);

    let result = reconcile(current, None).unwrap();
    let cell: &Cell = &result.all_songs.rows[0][1];
    assert!(cell.is_none());
}
