// ABOUTME: TUI state — session, navigation, auth form, and chat view in one place.
// ABOUTME: Applies worker results and keeps the chat scrolled to the newest turn.

use crate::auth::AuthFlow;
use crate::auth::worker::AuthEvent;
use crate::chat::{ChatEvent, ChatRequest, Conversation};
use crate::router::{self, History, Navigator, Route};
use crate::session::SessionStore;

/// The chat screen: conversation, input buffer, and scroll position.
#[derive(Debug, Default)]
pub struct ChatView {
    pub conversation: Conversation,
    pub input: String,
    pub cursor_pos: usize,
    /// Lines scrolled up from the bottom (0 = newest turn visible).
    pub scroll_offset: u16,
    seen_revision: u64,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount the view afresh: empty conversation and input.
    pub fn remount(&mut self) {
        self.conversation.reset();
        self.input.clear();
        self.cursor_pos = 0;
        self.sync_scroll();
    }

    /// Jump to the newest turn if the conversation changed since the last call.
    pub fn sync_scroll(&mut self) {
        let revision = self.conversation.revision();
        if revision != self.seen_revision {
            self.scroll_offset = 0;
            self.seen_revision = revision;
        }
    }

    /// Hand the input to the conversation. Clears the buffer only if accepted.
    pub fn submit_input(&mut self) -> Option<ChatRequest> {
        let text = self.conversation.begin_send(&self.input)?;
        self.input.clear();
        self.cursor_pos = 0;
        self.sync_scroll();
        Some(ChatRequest {
            epoch: self.conversation.epoch(),
            text,
        })
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }

    /// The input split on newlines (always at least one line).
    pub fn input_lines(&self) -> Vec<&str> {
        self.input.split('\n').collect()
    }

    pub fn input_line_count(&self) -> usize {
        self.input_lines().len()
    }

    /// Zero-based line of the cursor within the input.
    pub fn cursor_line(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .filter(|c| *c == '\n')
            .count()
    }

    /// Zero-based character column of the cursor within its line.
    pub fn cursor_column(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .collect::<Vec<_>>()
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .count()
    }

    /// Move the cursor one input line up. Returns false on the first line.
    pub fn move_cursor_up_in_input(&mut self) -> bool {
        self.move_cursor_vertically(-1)
    }

    /// Move the cursor one input line down. Returns false on the last line.
    pub fn move_cursor_down_in_input(&mut self) -> bool {
        self.move_cursor_vertically(1)
    }

    fn move_cursor_vertically(&mut self, delta: isize) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        let column = self.cursor_column();
        let lines = self.input_lines();
        let target = line as isize + delta;
        if target < 0 || target as usize >= lines.len() {
            return false;
        }
        let target = target as usize;
        let preceding: usize = lines[..target].iter().map(|l| l.chars().count() + 1).sum();
        self.cursor_pos = preceding + column.min(lines[target].chars().count());
        true
    }
}

/// Full TUI application state.
pub struct TuiState {
    pub session: SessionStore,
    pub history: History,
    pub auth: AuthFlow,
    pub chat: ChatView,
    pub model: String,
    pub should_quit: bool,
}

impl TuiState {
    /// Start at `initial` and apply the route guard to it.
    pub fn new(session: SessionStore, initial: Route, model: String) -> Self {
        let mut state = Self {
            session,
            history: History::new(initial),
            auth: AuthFlow::new(),
            chat: ChatView::new(),
            model,
            should_quit: false,
        };
        router::resolve(&state.session, &mut state.history);
        state
    }

    /// The screen currently shown.
    pub fn route(&self) -> Route {
        self.history.current()
    }

    /// Apply the outcome of a login/register request.
    pub fn apply_auth_event(&mut self, event: AuthEvent) {
        let AuthEvent::Completed(result) = event;
        if self
            .auth
            .finish(result, &mut self.session, &mut self.history)
        {
            // The form is not kept once it has done its job.
            self.auth = AuthFlow::new();
            self.chat.remount();
        }
    }

    /// Apply the outcome of a completion request.
    pub fn apply_chat_event(&mut self, event: ChatEvent) {
        let ChatEvent::Completed { epoch, result } = event;
        if epoch != self.chat.conversation.epoch() {
            tracing::debug!("ignoring reply for a previous conversation");
            return;
        }
        self.chat.conversation.finish(result);
        self.chat.sync_scroll();
    }

    /// End the session and return to the auth screen.
    pub fn logout(&mut self) {
        self.session.logout();
        self.auth = AuthFlow::new();
        self.chat.remount();
        self.history.navigate(Route::Auth);
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
