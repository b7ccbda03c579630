use serde_json::Value;

use crate::{
    export::{
        ExportError,
        table::{Cell, Table},
    },
    types::{TrackPage, TrackSelector},
    utils::AttributePaths,
};

/// The only attribute path that expands to more than one output column.
pub const ARTIST_NAME_PATH: &str = "artists.name";
pub const PRIMARY_ARTIST_COLUMN: &str = "primary-artist";
pub const FEATURED_ARTISTS_COLUMN: &str = "featured-artists";

/// A page-at-a-time supplier of track records.
///
/// Page cursors are stateful on the provider side, so callers must consume
/// pages strictly one at a time: [`Projection::project`] never requests the
/// next page before the previous page's items are fully processed, and
/// implementations must not prefetch.
#[allow(async_fn_in_trait)]
pub trait TrackSource {
    async fn first_page(&mut self, selector: &TrackSelector) -> Result<TrackPage, String>;
    async fn next_page(&mut self, page: &TrackPage) -> Result<Option<TrackPage>, String>;
}

/// What to do with a playlist entry whose track metadata is absent or null.
///
/// `Skip` drops the entry; `BlankRow` keeps an all-no-value row in its place.
/// Either way the entry is counted in [`ProjectedTracks::missing_tracks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTrackPolicy {
    #[default]
    Skip,
    BlankRow,
}

/// Column metadata derived from one attribute path at setup time.
#[derive(Debug, Clone, PartialEq)]
enum ColumnSpec {
    Scalar { segments: Vec<String>, column: usize },
    ArtistPair { primary: usize, featured: usize },
}

/// A compiled set of output columns, ready to project track records.
///
/// Setup runs once, before any page is consumed: every attribute path
/// contributes one column named by replacing `.` with `-`, except
/// `artists.name`, which contributes the `primary-artist`/`featured-artists`
/// pair at the position it would have occupied.
#[derive(Debug, Clone)]
pub struct Projection {
    header: Vec<String>,
    specs: Vec<ColumnSpec>,
}

/// Result of a projection run: the projected table plus how many entries had
/// no usable track metadata.
#[derive(Debug)]
pub struct ProjectedTracks {
    pub table: Table,
    pub missing_tracks: u64,
}

impl Projection {
    /// Builds the column set for an ordered attribute list.
    ///
    /// Fails with [`ExportError::NoAttributes`] when the list is empty.
    pub fn new(attributes: &AttributePaths) -> Result<Self, ExportError> {
        if attributes.is_empty() {
            return Err(ExportError::NoAttributes);
        }

        let mut header: Vec<String> = Vec::new();
        let mut specs: Vec<ColumnSpec> = Vec::new();

        for path in attributes.iter() {
            if path == ARTIST_NAME_PATH {
                let primary = header.len();
                header.push(PRIMARY_ARTIST_COLUMN.to_string());
                header.push(FEATURED_ARTISTS_COLUMN.to_string());
                specs.push(ColumnSpec::ArtistPair {
                    primary,
                    featured: primary + 1,
                });
            } else {
                let column = header.len();
                header.push(path.replace('.', "-"));
                specs.push(ColumnSpec::Scalar {
                    segments: path.split('.').map(str::to_string).collect(),
                    column,
                });
            }
        }

        Ok(Self { header, specs })
    }

    /// The expanded column names, in output order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Projects a single track record into a row aligned with the header.
    pub fn project_track(&self, track: &Value) -> Vec<Cell> {
        let mut row: Vec<Cell> = vec![None; self.header.len()];

        for spec in &self.specs {
            match spec {
                ColumnSpec::Scalar { segments, column } => {
                    row[*column] = resolve_scalar(track, segments);
                }
                ColumnSpec::ArtistPair { primary, featured } => {
                    let (primary_cell, featured_cell) = artist_cells(track);
                    row[*primary] = primary_cell;
                    row[*featured] = featured_cell;
                }
            }
        }

        row
    }

    fn blank_row(&self) -> Vec<Cell> {
        vec![None; self.header.len()]
    }

    /// Drains the source page by page and projects every accepted item.
    ///
    /// Pages are consumed in provider order, one in flight at a time; the
    /// next page is requested only after the current page's items are all
    /// appended. Row order is page order then item order. A failed page fetch
    /// aborts the whole run and discards the partial table.
    pub async fn project<S: TrackSource>(
        &self,
        source: &mut S,
        selector: &TrackSelector,
        policy: MissingTrackPolicy,
    ) -> Result<ProjectedTracks, ExportError> {
        let mut table = Table::new(self.header.clone());
        let mut missing_tracks: u64 = 0;

        let mut page = source
            .first_page(selector)
            .await
            .map_err(ExportError::SourceUnavailable)?;

        loop {
            for item in &page.items {
                match item.track.as_ref().filter(|t| !t.is_null()) {
                    Some(track) => table.push_row(self.project_track(track)),
                    None => {
                        missing_tracks += 1;
                        if policy == MissingTrackPolicy::BlankRow {
                            table.push_row(self.blank_row());
                        }
                    }
                }
            }

            match source
                .next_page(&page)
                .await
                .map_err(ExportError::SourceUnavailable)?
            {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(ProjectedTracks {
            table,
            missing_tracks,
        })
    }
}

/// Descends the record one path segment at a time. Any absent key or
/// non-object intermediate resolves to the no-value marker; traversal never
/// fails.
fn resolve_scalar(track: &Value, segments: &[String]) -> Cell {
    let mut current = track;
    for segment in segments {
        match current.get(segment) {
            Some(next) => current = next,
            None => return None,
        }
    }
    scalar_to_cell(current)
}

fn scalar_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Splits the artist list into the primary artist and the joined featured
/// artists. Fewer than two artists leaves `featured-artists` as the no-value
/// marker, never an empty string.
fn artist_cells(track: &Value) -> (Cell, Cell) {
    let artists: &[Value] = track
        .get("artists")
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or(&[]);

    let primary = artists
        .first()
        .and_then(|a| a.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let featured = if artists.len() < 2 {
        None
    } else {
        let names: Vec<&str> = artists[1..]
            .iter()
            .filter_map(|a| a.get("name").and_then(Value::as_str))
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(","))
        }
    };

    (primary, featured)
}
