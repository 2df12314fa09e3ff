//! goto-page: a page selector with optimistic local edits.
//!
//! The core lives in [`selector`]; [`tui`] renders it with ratatui and
//! [`script`] replays interactions without a terminal.

pub mod cli;
pub mod config;
pub mod errors;
pub mod script;
pub mod selector;
pub mod tui;
pub mod version;

pub use errors::{GotoPageError, GotoPageResult};
