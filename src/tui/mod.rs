// ABOUTME: TUI module — ratatui full-screen interface for advisor.
// ABOUTME: Auth and chat screens, input handling, and the status bar.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
