// ABOUTME: Library root for advisor — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod auth;
pub mod chat;
pub mod config;
pub mod llm;
pub mod router;
pub mod session;
pub mod tui;
