use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    export::ExportError,
    management::TokenManager,
    types::{GetUserPlaylistsResponse, Playlist, TrackSelector},
    utils::{self, NameMatching},
};

/// Retrieves all of the current user's playlists from the Spotify Web API.
///
/// Walks `/me/playlists` page by page, strictly sequentially, following the
/// absolute `next` URL until the listing is exhausted. 502 Bad Gateway
/// responses are retried after a 10-second delay; other errors propagate.
/// A spinner reports the running count while pages are fetched.
pub async fn get_user_playlists(
    token_mgr: &mut TokenManager,
) -> Result<Vec<Playlist>, reqwest::Error> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let mut playlists: Vec<Playlist> = Vec::new();
    let mut next_url: Option<String> = Some(format!(
        "{uri}/me/playlists?limit=50",
        uri = &config::spotify_apiurl()
    ));

    while let Some(api_url) = next_url.clone() {
        let token = token_mgr.get_valid_token().await;
        let client = Client::new();
        let response = client.get(&api_url).bearer_auth(token).send().await;

        let response = match response {
            Ok(resp) => match resp.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if let Some(status) = err.status() {
                        if status == StatusCode::BAD_GATEWAY {
                            sleep(Duration::from_secs(10)).await;
                            continue; // retry the same page
                        }
                    }

                    pb.finish_and_clear();
                    return Err(err); // propagate other errors
                }
            },
            Err(err) => {
                pb.finish_and_clear();
                return Err(err);
            } // network or reqwest error
        };

        let res = match response.json::<GetUserPlaylistsResponse>().await {
            Ok(res) => res,
            Err(err) => {
                pb.finish_and_clear();
                return Err(err);
            }
        };

        playlists.extend(res.items);
        pb.set_message(format!("Fetched {} playlists...", playlists.len()));
        next_url = res.next;
    }

    pb.finish_and_clear();
    Ok(playlists)
}

/// Resolves a free-form playlist reference into a track selector.
///
/// - empty/absent input selects the Liked Songs library
/// - a share URL yields the 22-character id right after the fixed prefix
/// - anything else is matched by name against the user's own playlists,
///   with case sensitivity per `matching`
///
/// An unresolvable reference yields [`ExportError::PlaylistNotFound`]; a
/// failed playlist listing yields [`ExportError::SourceUnavailable`].
pub async fn resolve_reference(
    reference: Option<&str>,
    token_mgr: &mut TokenManager,
    matching: NameMatching,
) -> Result<TrackSelector, ExportError> {
    let reference = reference.unwrap_or("").trim();

    if reference.is_empty() {
        return Ok(TrackSelector::LikedSongs);
    }

    if reference.starts_with(utils::PLAYLIST_URL_PREFIX) {
        return match utils::extract_playlist_id(reference) {
            Some(id) => Ok(TrackSelector::Playlist(id)),
            None => Err(ExportError::PlaylistNotFound(reference.to_string())),
        };
    }

    let playlists = get_user_playlists(token_mgr)
        .await
        .map_err(|e| ExportError::SourceUnavailable(e.to_string()))?;

    match utils::match_playlist_by_name(&playlists, reference, matching) {
        Some(playlist) => Ok(TrackSelector::Playlist(playlist.id.clone())),
        None => Err(ExportError::PlaylistNotFound(reference.to_string())),
    }
}
