//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! exporter: authentication, playlist discovery, and the paginated retrieval
//! of track records. It is the integration layer between the export engine
//! and Spotify's services, handling HTTP communication, the OAuth flow, error
//! handling, and rate limiting.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Playlist Discovery (listing, reference resolution)
//!     └── Track Retrieval (library + playlist pages)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow: verifier/challenge generation, local
//!   callback server, browser launch, token exchange, and token persistence.
//!   No client secret is stored or transmitted.
//! - [`playlists`] - Retrieval of the user's playlists with sequential
//!   pagination, and resolution of free-form playlist references (empty
//!   string, share URL, or name) into a concrete track selector.
//! - [`tracks`] - [`tracks::SpotifyTrackSource`], the production
//!   [`crate::export::TrackSource`]: fetches `/me/tracks` or
//!   `/playlists/{id}/tracks` one page at a time, following the `next` URL.
//!
//! ## Error Handling
//!
//! - **Rate limiting**: 429 responses are retried after the `Retry-After`
//!   delay when it is at most 120 seconds; longer delays produce a warning
//!   and the error propagates.
//! - **Transient failures**: 502 Bad Gateway responses are retried after a
//!   10-second delay.
//! - **Everything else**: network and API errors propagate to the caller;
//!   nothing in this module terminates the process.
//!
//! ## Pagination Contract
//!
//! All listing endpoints are consumed strictly one page at a time because the
//! provider's continuation cursors are stateful. No page is requested before
//! the previous one has been fully handed over to the caller, and no
//! prefetching takes place.

pub mod auth;
pub mod playlists;
pub mod tracks;
