//! Core logic for Tally's collaborative budget editor.
//!
//! This crate holds the editing rules and has no HTTP client or server code.
//! Adapters for the REST backend and the WebSocket relay plug in through the
//! traits in [`ports`] and [`collab::RealtimeChannel`].
//!
//! # Modules
//!
//! - `budget` - Line items, applied taxes, totals and saving
//! - `collab` - Rooms, debounced broadcasts and editing sessions
//! - `reports` - HTML and PDF export
//! - `ports` - Backend and notification interfaces

pub mod budget;
pub mod collab;
pub mod ports;
pub mod reports;

#[cfg(test)]
pub(crate) mod testing;
