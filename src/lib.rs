//! bhhub library crate
//!
//! Creative asset library client: a CLI binary and a TUI dashboard over a
//! PostgREST-style backend, plus the library API they are built on.

pub mod auth;
pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod folders;
pub mod gateway;
pub mod history;
pub mod normalize;
pub mod output;
pub mod record;
pub mod session;
pub mod snapshot;
pub mod spinner;
pub mod theme;
pub mod tui;
