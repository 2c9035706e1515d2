// ABOUTME: Auth form widget — login/register tabs, fields, inline error, and submit label.
// ABOUTME: Passwords are masked; the focused field is highlighted.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::auth::{AuthFlow, AuthMode, Field};

fn tab_span(mode: AuthMode, active: AuthMode) -> Span<'static> {
    let style = if mode == active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {} ", mode.title()), style)
}

/// Displayed value of a field; passwords are masked.
pub fn display_value(field: Field, value: &str) -> String {
    match field {
        Field::Password => "•".repeat(value.chars().count()),
        _ => value.to_string(),
    }
}

fn description(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "Enter your email and password to login to your account.",
        AuthMode::Register => "Create a new account to get started.",
    }
}

/// Render the whole form into Lines.
pub fn auth_form_lines(flow: &AuthFlow) -> Vec<Line<'static>> {
    let mode = flow.mode();
    let mut lines = vec![
        Line::from(vec![
            tab_span(AuthMode::Login, mode),
            Span::raw(" "),
            tab_span(AuthMode::Register, mode),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            description(mode),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if let Some(error) = flow.error() {
        lines.push(Line::from(Span::styled(
            format!(" ✗ {} ", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    for field in mode.fields() {
        let focused = flow.focused() == *field;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<9}", field.label()), label_style),
            Span::raw(display_value(*field, flow.form().value(*field))),
        ]));
    }

    lines.push(Line::from(""));
    let button_style = if flow.is_loading() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(
        format!(" {} ", mode.submit_label(flow.is_loading())),
        button_style,
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter submit · Tab next field · Ctrl+T switch tab · Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn password_is_masked() {
        assert_eq!(display_value(Field::Password, "héllo"), "•••••");
        assert_eq!(display_value(Field::Email, "a@b.com"), "a@b.com");
    }

    #[test]
    fn login_form_has_two_fields() {
        let mut flow = AuthFlow::new();
        flow.set_field(Field::Password, "secret");
        let text = text_of(&auth_form_lines(&flow));
        assert!(text.contains("Email"));
        assert!(text.contains("Password"));
        assert!(!text.contains("Name"));
        assert!(!text.contains("secret"));
        assert!(text.contains(" Login "));
    }

    #[test]
    fn register_form_shows_name() {
        let mut flow = AuthFlow::new();
        flow.switch_mode(AuthMode::Register);
        let text = text_of(&auth_form_lines(&flow));
        assert!(text.contains("Name"));
        assert!(text.contains("Create account"));
    }

    #[test]
    fn error_is_rendered_in_red() {
        let mut flow = AuthFlow::new();
        flow.begin_submit();
        let lines = auth_form_lines(&flow);
        let error_line = lines
            .iter()
            .find(|l| l.spans.iter().any(|s| s.content.contains("Email is required")))
            .expect("error line");
        assert_eq!(error_line.spans[0].style.fg, Some(Color::Red));
    }

    #[test]
    fn loading_changes_button_text() {
        let mut flow = AuthFlow::new();
        flow.set_field(Field::Email, "a@b.com");
        flow.set_field(Field::Password, "x");
        flow.begin_submit();
        let text = text_of(&auth_form_lines(&flow));
        assert!(text.contains("Logging in..."));
    }
}
