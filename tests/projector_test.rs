use serde_json::{Value, json};

use spexcli::export::{
    ExportError, MissingTrackPolicy, Projection, TrackSource,
    projector::{FEATURED_ARTISTS_COLUMN, PRIMARY_ARTIST_COLUMN},
};
use spexcli::types::{TrackItem, TrackPage, TrackSelector};
use spexcli::utils::{AttributePaths, parse_attribute_paths};

// Helper function to build a projection from a comma-separated attribute list
fn projection(attrs: &str) -> Projection {
    Projection::new(&parse_attribute_paths(attrs).unwrap()).unwrap()
}

// Helper function to create a track record with the given artists
fn track_with_artists(id: &str, artist_names: &[&str]) -> Value {
    let artists: Vec<Value> = artist_names.iter().map(|name| json!({ "name": name })).collect();
    json!({ "id": id, "name": format!("Track {}", id), "artists": artists })
}

fn item(track: Value) -> TrackItem {
    TrackItem { track: Some(track) }
}

fn page(items: Vec<TrackItem>, next: Option<&str>) -> TrackPage {
    TrackPage {
        items,
        next: next.map(str::to_string),
        total: None,
    }
}

/// A scripted track source that records the order of page requests.
struct PagedSource {
    pages: Vec<TrackPage>,
    cursor: usize,
    calls: Vec<String>,
}

impl PagedSource {
    fn new(pages: Vec<TrackPage>) -> Self {
        Self {
            pages,
            cursor: 0,
            calls: Vec::new(),
        }
    }
}

impl TrackSource for PagedSource {
    async fn first_page(&mut self, _selector: &TrackSelector) -> Result<TrackPage, String> {
        self.calls.push("first".to_string());
        self.cursor = 1;
        Ok(self.pages[0].clone())
    }

    async fn next_page(&mut self, page: &TrackPage) -> Result<Option<TrackPage>, String> {
        self.calls.push(format!(
            "next-after:{}",
            page.next.clone().unwrap_or_else(|| "end".to_string())
        ));

        if page.next.is_none() {
            return Ok(None);
        }

        let next = self.pages[self.cursor].clone();
        self.cursor += 1;
        Ok(Some(next))
    }
}

#[test]
fn test_header_expansion_for_artist_path() {
    let projection = projection("id,artists.name,album.release_date");
    let header = projection.header();

    // One extra column: artists.name expands into the artist pair
    assert_eq!(header.len(), 4);

    // The pair sits exactly where artists.name would have been
    assert_eq!(header[0], "id");
    assert_eq!(header[1], PRIMARY_ARTIST_COLUMN);
    assert_eq!(header[2], FEATURED_ARTISTS_COLUMN);
    assert_eq!(header[3], "album-release_date");
}

#[test]
fn test_header_scalar_names_replace_dots() {
    let projection = projection("album.release_date,album.name,popularity");
    assert_eq!(
        projection.header(),
        &["album-release_date", "album-name", "popularity"]
    );
}

#[test]
fn test_empty_attribute_list_is_a_configuration_error() {
    let result = Projection::new(&AttributePaths(Vec::new()));
    assert!(matches!(result, Err(ExportError::NoAttributes)));
}

#[test]
fn test_artist_pair_with_no_artists() {
    let projection = projection("artists.name");
    let row = projection.project_track(&json!({ "id": "t1", "artists": [] }));

    // Both cells carry the no-value marker
    assert_eq!(row, vec![None, None]);
}

#[test]
fn test_artist_pair_with_one_artist() {
    let projection = projection("artists.name");
    let row = projection.project_track(&track_with_artists("t1", &["A"]));

    assert_eq!(row[0], Some("A".to_string()));
    // A single artist leaves featured-artists as the marker, not ""
    assert_eq!(row[1], None);
}

#[test]
fn test_artist_pair_with_three_artists() {
    let projection = projection("artists.name");
    let row = projection.project_track(&track_with_artists("t1", &["A", "B", "C"]));

    assert_eq!(row[0], Some("A".to_string()));
    assert_eq!(row[1], Some("B,C".to_string()));
}

#[test]
fn test_artist_pair_with_absent_artist_list() {
    let projection = projection("artists.name");
    let row = projection.project_track(&json!({ "id": "t1" }));

    // A record without an artists field behaves like an empty list
    assert_eq!(row, vec![None, None]);
}

#[test]
fn test_scalar_traversal_of_nested_field() {
    let projection = projection("album.release_date");
    let row = projection.project_track(&json!({ "album": { "release_date": "2020-01-01" } }));

    assert_eq!(row[0], Some("2020-01-01".to_string()));
}

#[test]
fn test_scalar_traversal_never_raises() {
    let projection = projection("album.release_date");

    // Null intermediate
    let row = projection.project_track(&json!({ "album": null }));
    assert_eq!(row[0], None);

    // Absent intermediate
    let row = projection.project_track(&json!({ "id": "t1" }));
    assert_eq!(row[0], None);

    // Non-mapping intermediate
    let row = projection.project_track(&json!({ "album": "not-a-mapping" }));
    assert_eq!(row[0], None);

    // Null terminal value
    let row = projection.project_track(&json!({ "album": { "release_date": null } }));
    assert_eq!(row[0], None);
}

#[test]
fn test_scalar_non_string_values_are_stringified() {
    let projection = projection("duration_ms,explicit");
    let row = projection.project_track(&json!({ "duration_ms": 215000, "explicit": true }));

    assert_eq!(row[0], Some("215000".to_string()));
    assert_eq!(row[1], Some("true".to_string()));
}

#[tokio::test]
async fn test_missing_track_policy_skip() {
    let projection = projection("id");
    let mut source = PagedSource::new(vec![page(
        vec![
            item(track_with_artists("t1", &["A"])),
            TrackItem { track: None },
            TrackItem {
                track: Some(Value::Null),
            },
            item(track_with_artists("t2", &["B"])),
        ],
        None,
    )]);

    let projected = projection
        .project(&mut source, &TrackSelector::LikedSongs, MissingTrackPolicy::Skip)
        .await
        .unwrap();

    // Skipped entries leave no row behind but are counted
    assert_eq!(projected.table.row_count(), 2);
    assert_eq!(projected.missing_tracks, 2);
    assert_eq!(projected.table.rows[0][0], Some("t1".to_string()));
    assert_eq!(projected.table.rows[1][0], Some("t2".to_string()));
}

#[tokio::test]
async fn test_missing_track_policy_blank_row() {
    let projection = projection("id,name");
    let mut source = PagedSource::new(vec![page(
        vec![item(track_with_artists("t1", &["A"])), TrackItem { track: None }],
        None,
    )]);

    let projected = projection
        .project(
            &mut source,
            &TrackSelector::LikedSongs,
            MissingTrackPolicy::BlankRow,
        )
        .await
        .unwrap();

    assert_eq!(projected.table.row_count(), 2);
    assert_eq!(projected.missing_tracks, 1);

    // The placeholder row is all no-value markers
    assert_eq!(projected.table.rows[1], vec![None, None]);
}

#[tokio::test]
async fn test_pagination_order_and_row_count() {
    // Two pages of 50 and 13 items
    let first_items: Vec<TrackItem> = (0..50)
        .map(|i| item(track_with_artists(&format!("p1-{:03}", i), &["A"])))
        .collect();
    let second_items: Vec<TrackItem> = (0..13)
        .map(|i| item(track_with_artists(&format!("p2-{:03}", i), &["A"])))
        .collect();

    let mut source = PagedSource::new(vec![
        page(first_items, Some("page-2")),
        page(second_items, None),
    ]);

    let projection = projection("id");
    let projected = projection
        .project(&mut source, &TrackSelector::LikedSongs, MissingTrackPolicy::Skip)
        .await
        .unwrap();

    // Exactly 63 rows, in page-then-item order
    assert_eq!(projected.table.row_count(), 63);
    assert_eq!(projected.table.rows[0][0], Some("p1-000".to_string()));
    assert_eq!(projected.table.rows[49][0], Some("p1-049".to_string()));
    assert_eq!(projected.table.rows[50][0], Some("p2-000".to_string()));
    assert_eq!(projected.table.rows[62][0], Some("p2-012".to_string()));

    // One page in flight at a time: the next page is requested only after
    // the previous one, and each request carries the page just consumed
    assert_eq!(
        source.calls,
        vec![
            "first".to_string(),
            "next-after:page-2".to_string(),
            "next-after:end".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_source_failure_aborts_the_run() {
    struct FailingSource;

    impl TrackSource for FailingSource {
        async fn first_page(&mut self, _selector: &TrackSelector) -> Result<TrackPage, String> {
            Err("boom".to_string())
        }

        async fn next_page(&mut self, _page: &TrackPage) -> Result<Option<TrackPage>, String> {
            Ok(None)
        }
    }

    let projection = projection("id");
    let result = projection
        .project(
            &mut FailingSource,
            &TrackSelector::LikedSongs,
            MissingTrackPolicy::Skip,
        )
        .await;

    assert!(matches!(result, Err(ExportError::SourceUnavailable(_))));
}
