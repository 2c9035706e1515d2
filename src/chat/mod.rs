// ABOUTME: Chat module — turns, the seeded request context, and the conversation engine.
// ABOUTME: The worker runs completions in the background for the terminal UI.

pub mod engine;
pub mod seed;
pub mod turn;
pub mod worker;

pub use engine::{Conversation, FALLBACK_REPLY};
pub use seed::SeedContext;
pub use turn::{Role, Turn};
pub use worker::{ChatEvent, ChatRequest, CompletionWorkerParams, run_completion_worker};
