//! deckview
//!
//! A virtualized wheel/deck scrolling viewport. Only the items near the
//! scroll offset are materialized; each is painted through a scale and
//! translation chosen by the active projection (Flat, Top or Bottom).
//!
//! The core lives in [`viewport`]. [`view`] is a terminal demo built on it.

pub mod config;
pub mod logging;
pub mod view;
pub mod viewport;
