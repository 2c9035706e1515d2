// ABOUTME: Conversation engine — the ordered turn list and the single-flight send lifecycle.
// ABOUTME: Every accepted user turn is answered by exactly one model turn, reply or fallback.

use crate::chat::seed::SeedContext;
use crate::chat::turn::Turn;
use crate::llm::{CompletionError, CompletionService, GenerationConfig};

/// Shown in place of a reply when the completion service fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Append-only conversation owned by the chat view.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    loading: bool,
    revision: u64,
    epoch: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Bumped on every change to the turn list; views scroll to the newest turn when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Incremented by every reset; replies tagged with an older epoch are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Accept a user message. Returns the trimmed text to send, or `None` when
    /// the text is blank or a reply is still pending.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.loading {
            return None;
        }
        self.push(Turn::user(text));
        self.loading = true;
        Some(text.to_string())
    }

    /// Record the outcome of the pending request and re-enable input.
    pub fn finish(&mut self, result: Result<String, CompletionError>) {
        if !self.loading {
            tracing::debug!("dropping reply with no pending request");
            return;
        }
        match result {
            Ok(reply) => self.push(Turn::model(reply)),
            Err(e) => {
                tracing::error!("Error generating response: {}", e);
                self.push(Turn::model(FALLBACK_REPLY));
            }
        }
        self.loading = false;
    }

    /// Send one message and wait for its reply. Returns whether a request was made.
    pub async fn send(
        &mut self,
        service: &dyn CompletionService,
        seed: &SeedContext,
        generation: &GenerationConfig,
        text: &str,
    ) -> bool {
        let Some(text) = self.begin_send(text) else {
            return false;
        };
        let request = seed.request(&text, generation);
        let result = service.complete(&request).await;
        self.finish(result);
        true
    }

    /// Empty the conversation, as when the chat view is mounted afresh.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.loading = false;
        self.revision += 1;
        self.epoch += 1;
    }

    fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn blank_text_is_ignored() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.begin_send(""), None);
        assert_eq!(conversation.begin_send("   \n\t"), None);
        assert!(conversation.turns().is_empty());
        assert!(!conversation.is_loading());
        assert_eq!(conversation.revision(), 0);
    }

    #[test]
    fn begin_send_appends_trimmed_user_turn() {
        let mut conversation = Conversation::new();
        let text = conversation.begin_send("  hello  ");
        assert_eq!(text.as_deref(), Some("hello"));
        assert_eq!(conversation.turns(), &[Turn::user("hello")]);
        assert!(conversation.is_loading());
    }

    #[test]
    fn second_send_rejected_while_loading() {
        let mut conversation = Conversation::new();
        assert!(conversation.begin_send("first").is_some());
        assert_eq!(conversation.begin_send("second"), None);
        assert_eq!(conversation.turns().len(), 1);

        conversation.finish(Ok("reply".to_string()));
        assert!(conversation.begin_send("second").is_some());
    }

    #[test]
    fn success_appends_model_turn() {
        let mut conversation = Conversation::new();
        conversation.begin_send("hi");
        conversation.finish(Ok("hello there".to_string()));
        assert_eq!(conversation.turns()[1], Turn::model("hello there"));
        assert!(!conversation.is_loading());
    }

    #[test]
    fn failure_appends_fallback() {
        let mut conversation = Conversation::new();
        conversation.begin_send("hi");
        conversation.finish(Err(CompletionError::Network("down".to_string())));
        let last = conversation.turns().last().unwrap();
        assert_eq!(last.role(), Role::Model);
        assert_eq!(last.content(), FALLBACK_REPLY);
        assert!(!conversation.is_loading());
    }

    #[test]
    fn roles_alternate() {
        let mut conversation = Conversation::new();
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            conversation.begin_send(text);
            if i % 2 == 0 {
                conversation.finish(Ok(format!("re: {}", text)));
            } else {
                conversation.finish(Err(CompletionError::EmptyResponse));
            }
        }
        let roles: Vec<Role> = conversation.turns().iter().map(Turn::role).collect();
        for pair in roles.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn revision_tracks_mutations() {
        let mut conversation = Conversation::new();
        conversation.begin_send("hi");
        assert_eq!(conversation.revision(), 1);
        conversation.finish(Ok("yo".to_string()));
        assert_eq!(conversation.revision(), 2);
        conversation.reset();
        assert!(conversation.turns().is_empty());
        assert_eq!(conversation.revision(), 3);
    }

    #[test]
    fn reply_without_pending_request_is_dropped() {
        let mut conversation = Conversation::new();
        conversation.begin_send("hi");
        conversation.reset();
        assert_eq!(conversation.epoch(), 1);
        conversation.finish(Ok("late".to_string()));
        assert!(conversation.turns().is_empty());
    }
}
