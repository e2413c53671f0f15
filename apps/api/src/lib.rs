//! jobfit: compares a resume against a job posting by keyword overlap and
//! suggests resume edits that close the gap.
//!
//! The engine in [`analysis`] is pure and synchronous apart from the optional
//! [`llm_client::SuggestionService`] delegation. [`routes`] wraps it in an
//! Axum JSON API.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod state;
