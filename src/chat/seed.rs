// ABOUTME: Seed context — the fixed persona instruction and canned greeting sent with every turn.
// ABOUTME: Compiles defaults from src/chat/prompts/*.md, supports file-based overrides.

use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::{CompletionRequest, ContextTurn, GenerationConfig};

/// Compiled-in defaults.
const DEFAULT_PERSONA: &str = include_str!("prompts/persona.md");
const DEFAULT_GREETING: &str = include_str!("prompts/greeting.md");

/// Prefix marking the persona turn as an instruction rather than a question.
const SYSTEM_PREFIX: &str = "System prompt: ";

/// Reads a non-empty file if it exists, returning None otherwise.
pub fn read_if_exists(path: PathBuf) -> Option<String> {
    if path.exists() {
        fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    } else {
        None
    }
}

/// The persona instruction and the model's canned acknowledgment.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedContext {
    pub persona: String,
    pub greeting: String,
}

impl Default for SeedContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedContext {
    /// Creates a seed loaded with the compiled-in defaults.
    pub fn new() -> Self {
        Self {
            persona: DEFAULT_PERSONA.trim().to_string(),
            greeting: DEFAULT_GREETING.trim().to_string(),
        }
    }

    /// Replaces either part with `persona.md` / `greeting.md` from `dir` when present.
    pub fn load_overrides(&mut self, dir: &Path) -> &mut Self {
        if let Some(content) = read_if_exists(dir.join("persona.md")) {
            self.persona = content;
        }
        if let Some(content) = read_if_exists(dir.join("greeting.md")) {
            self.greeting = content;
        }
        self
    }

    /// Three turns: persona instruction, greeting, then the user's text.
    /// Earlier conversation turns are never included.
    pub fn history(&self, user_text: &str) -> Vec<ContextTurn> {
        vec![
            ContextTurn::user(format!("{}{}", SYSTEM_PREFIX, self.persona)),
            ContextTurn::model(self.greeting.clone()),
            ContextTurn::user(user_text),
        ]
    }

    /// The full request for one user message.
    pub fn request(&self, user_text: &str, generation: &GenerationConfig) -> CompletionRequest {
        CompletionRequest {
            history: self.history(user_text),
            message: user_text.to_string(),
            generation: generation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn defaults_describe_placement_advisor() {
        let seed = SeedContext::new();
        assert!(seed.persona.contains("placement advisor"));
        assert!(seed.greeting.starts_with("Namaste!"));
        assert!(!seed.persona.ends_with('\n'));
    }

    #[test]
    fn history_is_always_three_turns() {
        let seed = SeedContext::new();
        let history = seed.history("How do I write a resume?");
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::User);
        assert!(history[0].text.starts_with("System prompt: You are"));
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(history[1].text, seed.greeting);
        assert_eq!(history[2].role, Role::User);
        assert_eq!(history[2].text, "How do I write a resume?");
    }

    #[test]
    fn request_repeats_message_after_history() {
        let seed = SeedContext::new();
        let request = seed.request("Hi", &GenerationConfig::default());
        assert_eq!(request.message, "Hi");
        assert_eq!(request.history.last().unwrap().text, "Hi");
    }

    #[test]
    fn overrides_replace_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("persona.md"), "You coach hackathon teams.\n").unwrap();
        std::fs::write(tmp.path().join("greeting.md"), "   ").unwrap();

        let mut seed = SeedContext::new();
        seed.load_overrides(tmp.path());
        assert_eq!(seed.persona, "You coach hackathon teams.");
        // Blank override is ignored.
        assert!(seed.greeting.starts_with("Namaste!"));
    }
}
