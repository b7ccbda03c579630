use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// What to export: the user's saved-tracks library or one playlist.
///
/// The empty-string playlist reference resolves to `LikedSongs`; everything
/// else resolves to a concrete playlist id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSelector {
    LikedSongs,
    Playlist(String),
}

impl std::fmt::Display for TrackSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackSelector::LikedSongs => write!(f, "liked songs"),
            TrackSelector::Playlist(id) => write!(f, "playlist {}", id),
        }
    }
}

/// One page of playlist or library entries as returned by the Web API.
///
/// `next` carries the absolute URL of the following page; `None` means the
/// listing is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<TrackItem>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// A single playlist/library entry. The track metadata may be absent or null
/// (removed from the catalog, local file without metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackItem {
    pub track: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<Playlist>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct SheetTableRow {
    pub sheet: String,
    pub rows: usize,
    pub file: String,
}
