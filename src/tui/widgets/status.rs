// ABOUTME: Status bar widget — renders route, session state, model name, and a waiting indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::auth::AppState;
use crate::router::Route;

/// Inputs for the status bar.
pub struct StatusBarParams<'a> {
    pub route: Route,
    pub app_state: AppState,
    pub model: &'a str,
    pub waiting: bool,
}

fn state_label(state: AppState) -> (&'static str, Color) {
    match state {
        AppState::Unauthenticated => ("signed out", Color::DarkGray),
        AppState::Authenticating => ("signing in...", Color::Yellow),
        AppState::Authenticated => ("signed in", Color::Green),
    }
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let (label, color) = state_label(params.app_state);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", params.route.path()),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(format!("{} ", label), Style::default().fg(color)),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", params.model),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if params.waiting {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            "waiting for reply... ",
            Style::default().fg(Color::Yellow),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn status_line_shows_waiting() {
        let line = status_line(&StatusBarParams {
            route: Route::Chat,
            app_state: AppState::Authenticated,
            model: "gemini-pro",
            waiting: true,
        });
        let text = text_of(&line);
        assert!(text.contains("/chat"));
        assert!(text.contains("signed in"));
        assert!(text.contains("gemini-pro"));
        assert!(text.contains("waiting for reply..."));
    }

    #[test]
    fn status_line_while_authenticating() {
        let line = status_line(&StatusBarParams {
            route: Route::Auth,
            app_state: AppState::Authenticating,
            model: "gemini-pro",
            waiting: false,
        });
        let text = text_of(&line);
        assert!(text.contains("/auth"));
        assert!(text.contains("signing in..."));
        assert!(!text.contains("waiting"));
    }
}
