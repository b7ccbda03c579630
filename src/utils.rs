use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::Playlist;

/// Fixed prefix of shareable playlist links. The playlist id is the 22
/// characters immediately following it, regardless of any trailing query
/// string.
pub const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";
pub const PLAYLIST_ID_LEN: usize = 22;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts the playlist id from a shareable playlist URL.
///
/// Returns `None` when the input does not start with the fixed prefix or the
/// id portion is shorter than 22 characters.
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let rest = url.strip_prefix(PLAYLIST_URL_PREFIX)?;
    rest.get(..PLAYLIST_ID_LEN).map(str::to_string)
}

/// How playlist names are compared when resolving a free-form reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatching {
    #[default]
    Exact,
    IgnoreCase,
}

/// Finds the first playlist whose name matches `name` under the given
/// matching mode.
pub fn match_playlist_by_name<'a>(
    playlists: &'a [Playlist],
    name: &str,
    matching: NameMatching,
) -> Option<&'a Playlist> {
    match matching {
        NameMatching::Exact => playlists.iter().find(|p| p.name == name),
        NameMatching::IgnoreCase => {
            let wanted = name.to_lowercase();
            playlists.iter().find(|p| p.name.to_lowercase() == wanted)
        }
    }
}

/// An ordered, duplicate-free list of dotted attribute paths.
///
/// `Default` is the fixed attribute list offered by the export command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePaths(pub Vec<String>);

pub const DEFAULT_ATTRIBUTES: &str = "id,name,artists.name,album.name,album.release_date";

impl Default for AttributePaths {
    fn default() -> Self {
        parse_attribute_paths(DEFAULT_ATTRIBUTES).expect("default attribute list must parse")
    }
}

impl AttributePaths {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AttributePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Parses a comma-separated attribute list into an [`AttributePaths`].
///
/// Usable as a clap value parser. Each path is trimmed and must be non-empty;
/// every `.`-separated segment of a path must be non-empty as well. Duplicate
/// paths collapse to their first occurrence so the projected header never
/// contains duplicate column names.
pub fn parse_attribute_paths(s: &str) -> Result<AttributePaths, String> {
    if s.trim().is_empty() {
        return Err("attribute list cannot be empty".to_string());
    }

    let mut paths: Vec<String> = Vec::new();
    for raw in s.split(',') {
        let path = raw.trim();
        if path.is_empty() {
            return Err(format!("attribute list contains an empty segment: '{}'", s));
        }
        if path.split('.').any(|seg| seg.is_empty()) {
            return Err(format!("invalid attribute path '{}'", path));
        }
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }

    Ok(AttributePaths(paths))
}
