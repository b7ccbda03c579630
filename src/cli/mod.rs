//! # CLI Module
//!
//! This module provides the command-line interface layer for the exporter.
//! It implements all user-facing commands and coordinates between the Spotify
//! integration layer, the export engine, and workbook persistence.
//!
//! ## Commands
//!
//! - [`auth`] - Initiates the Spotify OAuth authentication flow with PKCE
//!   security
//! - [`export`] - Projects a playlist or the Liked Songs library into
//!   spreadsheet sheets, optionally reconciling against a previous export
//! - [`list_playlists`] - Displays the user's playlists with optional search
//!   filtering
//! - [`info`] - Shows the known attribute paths and authentication status
//!
//! ## Architecture Design
//!
//! The CLI module follows a layered approach:
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Export Engine (Projection / Reconciliation)
//!     ↓
//! API Layer (Spotify Integration)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! Command handlers own user interaction, progress feedback, and error
//! presentation; the layers below only return `Result`s. This is the one
//! place (besides `main`) where the terminating `error!` macro is used, so
//! the decision to end the process always sits at the top level.
//!
//! ## Error Handling Philosophy
//!
//! - **Graceful Degradation**: a previous export without an `id` column
//!   degrades to a plain export with a warning rather than aborting
//! - **Helpful Messages**: unresolvable playlist references and missing
//!   tokens come with the command to run next
//! - **No partial output**: a failed projection run discards the partial
//!   table; sheets are only written after the whole run succeeded

mod auth;
mod export;
mod info;
mod playlists;

pub use auth::auth;
pub use export::export;
pub use info::info;
pub use playlists::list_playlists;
