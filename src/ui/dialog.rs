use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{Component, EventResult, Result};

pub enum DialogEvent {
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Alert,
    Error,
}

/// Modal message box that captures input until dismissed.
pub struct Dialog {
    title: String,
    message: String,
    severity: Severity,
    resolver: Arc<KeyResolver>,
}

impl Dialog {
    /// User-facing notice, such as a denied permission.
    pub fn alert(
        title: impl Into<String>,
        message: impl Into<String>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Alert,
            resolver,
        }
    }

    pub fn error(message: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            severity: Severity::Error,
            resolver,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Component for Dialog {
    type Output = DialogEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return Ok(DialogEvent::Dismissed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Length(8));

        let color = match self.severity {
            Severity::Alert => theme.warning,
            Severity::Error => theme.error,
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(&self.message, Style::default().fg(theme.text))),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to dismiss",
                Style::default().fg(theme.muted),
            )),
        ];

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.base));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, popup_area);
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    #[test]
    fn test_dialog_swallows_keys_until_dismissed() {
        let mut dialog = Dialog::alert("Oooops...", "Location needed", Arc::new(KeyResolver::default()));

        let other = dialog
            .handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(other, EventResult::Consumed));

        let esc = dialog
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(esc, EventResult::Event(DialogEvent::Dismissed)));
    }
}
