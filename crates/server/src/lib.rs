//! EvoLibrary web application server.
//!
//! Hosts per-browser search sessions backed by
//! [`evolibrary_core::SearchController`] and exposes the search, download,
//! progress, notification, and activity surfaces over HTTP.

pub mod api;
pub mod metrics;
pub mod state;
