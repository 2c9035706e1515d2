// ABOUTME: Main TUI rendering function — assembles header, the routed screen, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::router::Route;
use crate::tui::state::TuiState;
use crate::tui::widgets::auth_form::auth_form_lines;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};

/// Maximum height the chat input area can grow to (in terminal rows).
const MAX_INPUT_HEIGHT: u16 = 8;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Routed screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Header
    let mut header = vec![Span::styled(
        " Placement Advisor",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if state.route() == Route::Chat {
        header.push(Span::styled(
            "   Ctrl+L logout",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    match state.route() {
        Route::Chat => render_chat(frame, state, chunks[1]),
        Route::Auth | Route::Root => render_auth(frame, state, chunks[1]),
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        route: state.route(),
        app_state: state.auth.app_state(&state.session),
        model: &state.model,
        waiting: state.chat.conversation.is_loading(),
    });
    frame.render_widget(Paragraph::new(status), chunks[2]);
}

fn render_auth(frame: &mut Frame, state: &TuiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Welcome ");
    let form = Paragraph::new(auth_form_lines(&state.auth))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(form, area);
}

fn render_chat(frame: &mut Frame, state: &mut TuiState, area: Rect) {
    state.chat.sync_scroll();

    // +2 accounts for top and bottom borders
    let input_height = (state.chat.input_line_count() as u16 + 2).clamp(3, MAX_INPUT_HEIGHT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),               // Chat area
            Constraint::Length(input_height), // Input area
        ])
        .split(area);

    let conversation = &state.chat.conversation;
    let chat_lines = render_chat_lines(conversation.turns(), conversation.is_loading());

    let chat_chunk = chunks[0];
    let visible_height = chat_chunk.height;

    // Use ratatui's own line_count() so the scroll math matches its wrapping.
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(visible_height);

    // Cap scroll_offset so it can't go past the top of the content.
    if state.chat.scroll_offset > max_scroll {
        state.chat.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.chat.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input area
    let input_chunk = chunks[1];
    let mut input_block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if state.chat.input.is_empty() && !conversation.is_loading() {
        input_block = input_block.title(Span::styled(
            " Type a message... ",
            Style::default().fg(Color::DarkGray),
        ));
    } else if conversation.is_loading() {
        input_block = input_block.title(Span::styled(
            " waiting... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Keep the cursor line inside the box's inner rows (between the borders).
    state.chat.clamp_cursor();
    let inner_rows = input_chunk.height.saturating_sub(2).max(1);
    let cursor_line = state.chat.cursor_line() as u16;
    let input_scroll = cursor_line.saturating_sub(inner_rows - 1);

    let input = Paragraph::new(state.chat.input.clone())
        .block(input_block)
        .scroll((input_scroll, 0));
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 2 {
        let cursor_line = state.chat.cursor_line();
        let cursor_col = state.chat.cursor_column();

        // Visual (display) width of the text before the cursor on its line.
        let lines = state.chat.input_lines();
        let line_text = lines.get(cursor_line).copied().unwrap_or("");
        let prefix: String = line_text.chars().take(cursor_col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());

        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let clamped_visual_col = visual_col.min(max_visual_col);

        let cursor_x = input_chunk.x.saturating_add(clamped_visual_col as u16);
        let visible_line = (cursor_line as u16).saturating_sub(input_scroll);
        let cursor_y = input_chunk
            .y
            .saturating_add(1 + visible_line.min(inner_rows - 1));
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}
