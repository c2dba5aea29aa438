//! Reusable TUI widgets

pub mod logo;
pub mod shortcuts;
pub mod status_bar;
