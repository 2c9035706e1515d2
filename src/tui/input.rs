// ABOUTME: Keyboard input handling for the TUI — translates key events into actions.
// ABOUTME: Routes keys to the auth form or the chat screen depending on the current route.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::Credentials;
use crate::chat::ChatRequest;
use crate::router::Route;
use crate::tui::state::{ChatView, TuiState};

const PAGE_SCROLL_STEP: u16 = 10;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// Login/register form submitted with valid fields.
    SubmitAuth(Credentials),
    /// User sent a chat message.
    Send(ChatRequest),
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    match state.route() {
        Route::Chat => handle_chat_key(state, key),
        Route::Auth | Route::Root => handle_auth_key(state, key),
    }
}

/// Keys on the login/register screen.
fn handle_auth_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let auth = &mut state.auth;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
        auth.toggle_mode();
        return InputResult::None;
    }

    match key.code {
        KeyCode::Enter => match auth.begin_submit() {
            Some(credentials) => InputResult::SubmitAuth(credentials),
            None => InputResult::None,
        },
        KeyCode::F(2) => {
            auth.toggle_mode();
            InputResult::None
        }
        KeyCode::Tab | KeyCode::Down => {
            auth.focus_next();
            InputResult::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            auth.focus_prev();
            InputResult::None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            auth.push_char(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            auth.pop_char();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

/// Keys on the chat screen.
fn handle_chat_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
        state.logout();
        return InputResult::None;
    }

    let chat = &mut state.chat;

    // PageUp/PageDown always scroll.
    if handle_scroll_key(chat, key.code) {
        return InputResult::None;
    }

    // Context-aware Up/Down: move cursor within multiline input first, then
    // fall back to chat scrolling.
    match key.code {
        KeyCode::Up => {
            if !chat.move_cursor_up_in_input() {
                chat.scroll_offset = chat.scroll_offset.saturating_add(1);
            }
            return InputResult::None;
        }
        KeyCode::Down => {
            if !chat.move_cursor_down_in_input() {
                chat.scroll_offset = chat.scroll_offset.saturating_sub(1);
            }
            return InputResult::None;
        }
        _ => {}
    }

    match key.code {
        // Shift+Enter (or Alt+Enter where the terminal can't report Shift) inserts a newline.
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            chat.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Enter => match chat.submit_input() {
            Some(request) => InputResult::Send(request),
            None => InputResult::None,
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            chat.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            chat.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            chat.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            chat.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            chat.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            chat.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            chat.move_cursor_end();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

fn handle_scroll_key(chat: &mut ChatView, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            chat.scroll_offset = chat.scroll_offset.saturating_add(PAGE_SCROLL_STEP);
            true
        }
        KeyCode::PageDown => {
            chat.scroll_offset = chat.scroll_offset.saturating_sub(PAGE_SCROLL_STEP);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::worker::AuthEvent;
    use crate::auth::{AuthMode, AuthResponse, Field};
    use crate::session::{MemoryTokenStorage, SessionStore};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn type_text(state: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    fn auth_state() -> TuiState {
        TuiState::new(
            SessionStore::init(Box::new(MemoryTokenStorage::new())),
            Route::Root,
            "m".to_string(),
        )
    }

    fn chat_state() -> TuiState {
        TuiState::new(
            SessionStore::init(Box::new(MemoryTokenStorage::with_token("abc"))),
            Route::Chat,
            "m".to_string(),
        )
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let ctrl_c = key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut auth_state(), ctrl_c), InputResult::Quit);
        assert_eq!(handle_key(&mut chat_state(), ctrl_c), InputResult::Quit);
    }

    #[test]
    fn auth_form_typing_and_submit() {
        let mut state = auth_state();
        type_text(&mut state, "a@b.com");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "x");

        let result = handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(
            result,
            InputResult::SubmitAuth(Credentials::Login {
                email: "a@b.com".to_string(),
                password: "x".to_string(),
            })
        );
        // A second Enter while in flight does nothing.
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
    }

    #[test]
    fn ctrl_t_switches_to_register() {
        let mut state = auth_state();
        handle_key(&mut state, key_with(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(state.auth.mode(), AuthMode::Register);
        assert_eq!(state.auth.focused(), Field::Name);
        assert_eq!(state.auth.form().name, "", "ctrl+t must not type a 't'");
    }

    #[test]
    fn invalid_auth_form_shows_error() {
        let mut state = auth_state();
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert_eq!(state.auth.error(), Some("Email is required"));
    }

    #[test]
    fn enter_sends_chat_message() {
        let mut state = chat_state();
        type_text(&mut state, "What skills do I need?");
        match handle_key(&mut state, key(KeyCode::Enter)) {
            InputResult::Send(request) => assert_eq!(request.text, "What skills do I need?"),
            other => panic!("expected Send, got {:?}", other),
        }
        assert!(state.chat.input.is_empty());
        assert!(state.chat.conversation.is_loading());
    }

    #[test]
    fn enter_while_waiting_keeps_draft() {
        let mut state = chat_state();
        type_text(&mut state, "first");
        handle_key(&mut state, key(KeyCode::Enter));
        type_text(&mut state, "second");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert_eq!(state.chat.input, "second");
        assert_eq!(state.chat.conversation.turns().len(), 1);
    }

    #[test]
    fn blank_enter_sends_nothing() {
        let mut state = chat_state();
        type_text(&mut state, "   ");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert!(state.chat.conversation.turns().is_empty());
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut state = chat_state();
        type_text(&mut state, "a");
        handle_key(&mut state, key_with(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut state, "b");
        handle_key(&mut state, key_with(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(state.chat.input, "a\nb\n");
        assert!(state.chat.conversation.turns().is_empty());
    }

    #[test]
    fn ctrl_l_logs_out() {
        let mut state = chat_state();
        handle_key(&mut state, key_with(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert_eq!(state.route(), Route::Auth);
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn logout_leaves_an_empty_form() {
        let mut state = auth_state();
        type_text(&mut state, "a@b.com");
        handle_key(&mut state, key(KeyCode::Tab));
        type_text(&mut state, "secret");
        assert!(matches!(
            handle_key(&mut state, key(KeyCode::Enter)),
            InputResult::SubmitAuth(_)
        ));
        state.apply_auth_event(AuthEvent::Completed(Ok(AuthResponse {
            token: "abc".to_string(),
        })));
        assert_eq!(state.route(), Route::Chat);

        handle_key(&mut state, key_with(KeyCode::Char('l'), KeyModifiers::CONTROL));

        assert_eq!(state.route(), Route::Auth);
        assert_eq!(state.auth.form().email, "");
        assert_eq!(state.auth.form().password, "");
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), InputResult::None);
        assert!(state.auth.error().is_some(), "empty form fails validation");
    }

    #[test]
    fn page_keys_scroll_chat() {
        let mut state = chat_state();
        handle_key(&mut state, key(KeyCode::PageUp));
        assert_eq!(state.chat.scroll_offset, 10);
        handle_key(&mut state, key(KeyCode::Up));
        assert_eq!(state.chat.scroll_offset, 11);
        handle_key(&mut state, key(KeyCode::PageDown));
        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.chat.scroll_offset, 0);
    }
}
