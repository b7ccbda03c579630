//! # API Module
//!
//! HTTP endpoints for the temporary local web server the exporter runs
//! during authentication.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth callback from Spotify's authorization
//!   server and completes the PKCE flow by exchanging the authorization code
//!   for an access token.
//! - [`health`] - Health check returning application status and version.
//!
//! The module is built on the [Axum](https://docs.rs/axum) web framework;
//! each endpoint is an async handler wired into the router in
//! [`crate::server`].
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spexcli::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
