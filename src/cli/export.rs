use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error,
    export::{
        ExportError, MergeResult, MissingTrackPolicy, Projection, Table, reconcile,
    },
    info,
    management::{TokenManager, WorkbookManager},
    spotify::{self, tracks::SpotifyTrackSource},
    success,
    types::SheetTableRow,
    utils::{AttributePaths, NameMatching},
    warning,
};

/// Runs the export pipeline: resolve the playlist reference, project the
/// selected attributes over all pages of tracks, reconcile against a previous
/// export when requested, and write the resulting sheets.
///
/// In update mode (`--update FILE`) the previous all-songs sheet is read from
/// FILE and the workbook is written back over it unless `-o` names another
/// path. An unreadable FILE is fatal (the user named it explicitly); a FILE
/// without an `id` column degrades to a plain export with a warning.
pub async fn export(
    playlist: Option<String>,
    attrs: AttributePaths,
    output: Option<PathBuf>,
    update: Option<PathBuf>,
    keep_missing_tracks: bool,
    ignore_case: bool,
) {
    let mut token_mgr = match TokenManager::load().await {
        Ok(t) => t,
        Err(e) => {
            error!(
                "Failed to load token. Please run spexcli auth\n Error: {}",
                e
            );
        }
    };

    let projection = match Projection::new(&attrs) {
        Ok(p) => p,
        Err(e) => error!("{}", e),
    };

    let matching = if ignore_case {
        NameMatching::IgnoreCase
    } else {
        NameMatching::Exact
    };

    let selector =
        match spotify::playlists::resolve_reference(playlist.as_deref(), &mut token_mgr, matching)
            .await
        {
            Ok(selector) => selector,
            Err(e) => error!("{}", e),
        };

    info!("Exporting {} with attributes {}", selector, attrs);

    let previous: Option<Table> = match &update {
        Some(path) => match WorkbookManager::new(path.clone()).read_primary().await {
            Ok(table) => {
                info!(
                    "Loaded previous export {} ({} rows).",
                    path.display(),
                    table.row_count()
                );
                Some(table)
            }
            Err(e) => error!("Cannot read previous export {}: {}", path.display(), e),
        },
        None => None,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let policy = if keep_missing_tracks {
        MissingTrackPolicy::BlankRow
    } else {
        MissingTrackPolicy::Skip
    };

    let mut source = SpotifyTrackSource::new(&mut token_mgr).with_progress(pb.clone());
    let projected = match projection.project(&mut source, &selector, policy).await {
        Ok(projected) => {
            pb.finish_and_clear();
            projected
        }
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };

    success!("Fetched {} tracks.", projected.table.row_count());
    if projected.missing_tracks > 0 {
        match policy {
            MissingTrackPolicy::Skip => warning!(
                "{} entries had no track metadata and were skipped.",
                projected.missing_tracks
            ),
            MissingTrackPolicy::BlankRow => warning!(
                "{} entries had no track metadata and were kept as blank rows.",
                projected.missing_tracks
            ),
        }
    }

    let current = projected.table;
    let result = match reconcile(current.clone(), previous) {
        Ok(result) => result,
        Err(e @ ExportError::MissingIdColumn(_)) => {
            warning!("{}; exporting new data only.", e);
            MergeResult {
                all_songs: current,
                missing: None,
                newly_added: None,
            }
        }
        Err(e) => error!("{}", e),
    };

    if update.is_some() {
        let missing_count = result.missing.as_ref().map(Table::row_count).unwrap_or(0);
        let added_count = result
            .newly_added
            .as_ref()
            .map(Table::row_count)
            .unwrap_or(0);
        info!(
            "{} tracks gone since the previous export, {} newly added.",
            missing_count, added_count
        );
    }

    let output_path = output
        .or_else(|| update.clone())
        .unwrap_or_else(|| PathBuf::from("spotify-export.csv"));

    let sheets = result.into_sheets();
    if sheets.is_empty() {
        warning!("Nothing to export; no files written.");
        return;
    }

    let workbook = WorkbookManager::new(output_path);
    match workbook.write_sheets(&sheets).await {
        Ok(written) => {
            let table_rows: Vec<SheetTableRow> = sheets
                .iter()
                .zip(written.iter())
                .map(|((sheet, table), path)| SheetTableRow {
                    sheet: sheet.clone(),
                    rows: table.row_count(),
                    file: path.display().to_string(),
                })
                .collect();

            let table = tabled::Table::new(table_rows);
            println!("{}", table);
            success!("Export complete.");
        }
        Err(e) => error!("Failed to write export: {}", e),
    }
}
