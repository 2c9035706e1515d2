// ABOUTME: Chat widget — renders conversation turns into styled ratatui Lines.
// ABOUTME: User and model turns get distinct prefixes; a typing indicator shows while waiting.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::chat::{Role, Turn};

pub const TYPING_INDICATOR: &str = "AI is typing...";

/// Render turns (oldest first) into styled Lines for display.
pub fn render_chat_lines(turns: &[Turn], loading: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, turn) in turns.iter().enumerate() {
        // Blank separator between turns.
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix_style, body_style) = match turn.role() {
            Role::User => (
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            ),
            Role::Model => (
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            ),
        };

        // First line gets the speaker prefix, continuation lines are indented to match.
        let prefix = format!("{:>3} │ ", turn.role().label());
        let indent = format!("{:>3} │ ", "");
        for (i, text) in turn.content().split('\n').enumerate() {
            let lead = if i == 0 { prefix.clone() } else { indent.clone() };
            lines.push(Line::from(vec![
                Span::styled(lead, prefix_style),
                Span::styled(text.to_string(), body_style),
            ]));
        }
    }

    if loading {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            TYPING_INDICATOR,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}
