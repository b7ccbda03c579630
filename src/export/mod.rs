//! # Export Engine Module
//!
//! The core of the exporter: turning paginated, nested track records from the
//! Spotify Web API into flat tables, and reconciling a fresh export against a
//! previously written one.
//!
//! ## Overview
//!
//! Two components compose sequentially:
//!
//! - [`projector`] - The Attribute Projector. Given an ordered list of dotted
//!   attribute paths and a page-at-a-time track source, it expands the paths
//!   into output columns (with the special primary/featured artist split) and
//!   emits one row per track.
//! - [`reconciler`] - The Export Reconciler. Given the freshly projected
//!   table and optionally a previous export, it computes the merged all-songs
//!   table plus the missing and newly-added subsets, keyed on the `id`
//!   column.
//!
//! Data flows one way: raw pages → projector → [`table::Table`] →
//! reconciler → named sheets → workbook persistence
//! ([`crate::management::WorkbookManager`]).
//!
//! ## Error Handling
//!
//! Everything in this module returns [`ExportError`]; nothing here prints or
//! terminates the process. The CLI layer decides which errors are fatal and
//! which degrade (a previous export without an `id` column falls back to a
//! plain export, a missing playlist is reported and the run ends cleanly).

pub mod projector;
pub mod reconciler;
pub mod table;

pub use projector::{MissingTrackPolicy, ProjectedTracks, Projection, TrackSource};
pub use reconciler::{MergeResult, reconcile};
pub use table::{Cell, Table};

/// Errors produced by the projection and reconciliation engine.
#[derive(Debug)]
pub enum ExportError {
    /// No attribute paths were selected; there is nothing to project.
    NoAttributes,
    /// A free-form playlist reference did not resolve to any playlist.
    PlaylistNotFound(String),
    /// A table that should take part in reconciliation has no `id` column.
    MissingIdColumn(String),
    /// The track source failed; carries the transport error text.
    SourceUnavailable(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NoAttributes => write!(f, "no attributes selected for export"),
            ExportError::PlaylistNotFound(reference) => {
                write!(f, "playlist '{}' not found", reference)
            }
            ExportError::MissingIdColumn(table) => {
                write!(f, "{} has no 'id' column", table)
            }
            ExportError::SourceUnavailable(msg) => {
                write!(f, "track source unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExportError {}
