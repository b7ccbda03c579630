use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::{
    config,
    export::TrackSource,
    management::TokenManager,
    types::{TrackPage, TrackSelector},
    warning,
};

const LIKED_SONGS_PAGE_LIMIT: u32 = 50;
const PLAYLIST_PAGE_LIMIT: u32 = 100;

/// Production [`TrackSource`] over the Spotify Web API.
///
/// Fetches `/me/tracks` for the Liked Songs library or
/// `/playlists/{id}/tracks` for a playlist, one page per call, following the
/// absolute `next` URL carried by each page. Holds the token manager by
/// mutable reference so tokens refresh transparently between pages; no
/// ambient client state.
///
/// Rate limiting follows the provider's guidance: a 429 response is retried
/// after the `Retry-After` delay when it is at most 120 seconds, and 502
/// responses are retried after 10 seconds. Other failures propagate.
pub struct SpotifyTrackSource<'a> {
    token_mgr: &'a mut TokenManager,
    progress: Option<ProgressBar>,
    fetched: u64,
}

impl<'a> SpotifyTrackSource<'a> {
    pub fn new(token_mgr: &'a mut TokenManager) -> Self {
        Self {
            token_mgr,
            progress: None,
            fetched: 0,
        }
    }

    /// Attaches a spinner that reports the running fetched-track count.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn start_url(selector: &TrackSelector) -> String {
        match selector {
            TrackSelector::LikedSongs => format!(
                "{uri}/me/tracks?limit={limit}",
                uri = &config::spotify_apiurl(),
                limit = LIKED_SONGS_PAGE_LIMIT
            ),
            TrackSelector::Playlist(id) => format!(
                "{uri}/playlists/{id}/tracks?limit={limit}",
                uri = &config::spotify_apiurl(),
                id = id,
                limit = PLAYLIST_PAGE_LIMIT
            ),
        }
    }

    async fn get_page(&mut self, api_url: &str) -> Result<TrackPage, reqwest::Error> {
        loop {
            let token = self.token_mgr.get_valid_token().await;
            let client = Client::new();
            let response = client.get(api_url).bearer_auth(token).send().await;

            let response = match response {
                Ok(resp) => {
                    // check for retry-after header
                    if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                        if let Some(retry_after) = resp.headers().get("retry-after") {
                            let retry_after = retry_after
                                .to_str()
                                .unwrap_or("0")
                                .parse::<u64>()
                                .unwrap_or(0);
                            if retry_after <= 120 {
                                sleep(Duration::from_secs(retry_after)).await;
                                continue; // retry
                            }
                            warning!(
                                "Retry-After of {} seconds is abnormally high. Try again later.",
                                retry_after
                            );
                        }
                    }

                    match resp.error_for_status() {
                        Ok(valid_response) => valid_response,
                        Err(err) => {
                            if let Some(status) = err.status() {
                                if status == StatusCode::BAD_GATEWAY {
                                    sleep(Duration::from_secs(10)).await;
                                    continue; // retry
                                }
                            }
                            return Err(err); // propagate other errors
                        }
                    }
                }
                Err(err) => {
                    return Err(err);
                } // network or reqwest error
            };

            let page = response.json::<TrackPage>().await?;
            return Ok(page);
        }
    }

    fn report(&mut self, page: &TrackPage) {
        self.fetched += page.items.len() as u64;
        if let Some(pb) = &self.progress {
            match page.total {
                Some(total) => pb.set_message(format!("Fetched {}/{} tracks...", self.fetched, total)),
                None => pb.set_message(format!("Fetched {} tracks...", self.fetched)),
            }
        }
    }
}

impl TrackSource for SpotifyTrackSource<'_> {
    async fn first_page(&mut self, selector: &TrackSelector) -> Result<TrackPage, String> {
        let url = Self::start_url(selector);
        let page = self.get_page(&url).await.map_err(|e| e.to_string())?;
        self.report(&page);
        Ok(page)
    }

    async fn next_page(&mut self, page: &TrackPage) -> Result<Option<TrackPage>, String> {
        let Some(url) = page.next.clone() else {
            return Ok(None);
        };

        let next = self.get_page(&url).await.map_err(|e| e.to_string())?;
        self.report(&next);
        Ok(Some(next))
    }
}
