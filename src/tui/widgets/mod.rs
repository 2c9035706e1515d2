// ABOUTME: TUI widget sub-modules for the auth form, chat transcript, and status bar.
// ABOUTME: Each widget is a pure rendering function over state.

pub mod auth_form;
pub mod chat;
pub mod status;
