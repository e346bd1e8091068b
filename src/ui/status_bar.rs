use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;

/// A key hint shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: &'static str,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: &'static str) -> Self {
        Self {
            key: key.into(),
            description,
        }
    }
}

/// Bottom bar with breadcrumbs, key hints and running commands.
#[derive(Default)]
pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        breadcrumbs: &[String],
        keybindings: &[Keybinding],
        running: &[String],
    ) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(40),
                Constraint::Min(20),
                Constraint::Length(28),
            ])
            .split(inner);

        let crumbs = std::iter::once("ecoleta".to_string())
            .chain(breadcrumbs.iter().cloned())
            .collect::<Vec<_>>()
            .join(" › ");
        frame.render_widget(
            Paragraph::new(Span::styled(
                crumbs,
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            chunks[0],
        );

        let mut hints = Vec::new();
        for binding in keybindings {
            hints.push(Span::styled(
                format!("<{}>", binding.key),
                Style::default().fg(theme.highlight),
            ));
            hints.push(Span::styled(
                format!(" {}  ", binding.description),
                Style::default().fg(theme.subtext),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(hints)), chunks[1]);

        let activity = match running {
            [] => String::new(),
            [only] => format!("⟳ {only}"),
            [first, rest @ ..] => format!("⟳ {first} (+{})", rest.len()),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(activity, Style::default().fg(theme.muted)))
                .alignment(ratatui::layout::Alignment::Right),
            chunks[2],
        );
    }
}
