//! Detail screen for a single collection point.

use std::sync::Arc;

use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::Theme;
use crate::app::AppMessage;
use crate::catalog::{CatalogService, PointDetail};
use crate::commands::{Command, CopyToClipboardCmd};
use crate::config::{DetailAction, GlobalAction, KeyResolver};
use crate::service::{Service, ServiceMsg};
use crate::ui::{EventResult, Keybinding, Spinner};

#[derive(Debug, Clone)]
pub enum DetailMsg {
    Load,
    CopyEmail,
    CopyWhatsapp,
    NavigateBack,
    Loaded(Box<PointDetail>),
    Failed(String),
}

#[derive(Debug)]
pub enum DetailState {
    Loading,
    Loaded(Box<PointDetail>),
    Failed(String),
}

struct FetchPointDetailCmd {
    catalog: Arc<dyn CatalogService>,
    point_id: u32,
    tx: UnboundedSender<DetailMsg>,
}

#[async_trait]
impl Command for FetchPointDetailCmd {
    fn name(&self) -> String {
        format!("Loading point {}", self.point_id)
    }

    async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        let msg = match self.catalog.point(self.point_id).await {
            Ok(detail) => DetailMsg::Loaded(Box::new(detail)),
            Err(e) => {
                warn!("Failed to load point {}: {e}", self.point_id);
                DetailMsg::Failed(e.to_string())
            }
        };
        let _ = self.tx.send(msg);
        Ok(())
    }
}

pub struct DetailScreen {
    point_id: u32,
    catalog: Arc<dyn CatalogService>,
    resolver: Arc<KeyResolver>,
    state: DetailState,
    spinner: Spinner,
    msg_tx: UnboundedSender<DetailMsg>,
    msg_rx: UnboundedReceiver<DetailMsg>,
}

impl DetailScreen {
    pub fn new(point_id: u32, catalog: Arc<dyn CatalogService>, resolver: Arc<KeyResolver>) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            point_id,
            catalog,
            resolver,
            state: DetailState::Loading,
            spinner: Spinner::new("Loading point..."),
            msg_tx,
            msg_rx,
        }
    }

    fn queue(&self, msg: DetailMsg) {
        let _ = self.msg_tx.send(msg);
    }

    fn detail(&self) -> Option<&PointDetail> {
        match &self.state {
            DetailState::Loaded(detail) => Some(&**detail),
            _ => None,
        }
    }

    /// Copy a contact field, skipping fields the point left blank.
    fn copy(&self, label: &str, field: impl Fn(&PointDetail) -> &str) -> ServiceMsg {
        let Some(text) = self.detail().map(field).filter(|t| !t.trim().is_empty()) else {
            debug!("Nothing to copy for {label}");
            return ServiceMsg::Idle;
        };
        CopyToClipboardCmd::new(text, label).into()
    }

    fn process_message(&mut self, msg: DetailMsg) -> ServiceMsg {
        match msg {
            DetailMsg::Load => {
                self.state = DetailState::Loading;
                FetchPointDetailCmd {
                    catalog: Arc::clone(&self.catalog),
                    point_id: self.point_id,
                    tx: self.msg_tx.clone(),
                }
                .into()
            }
            DetailMsg::Loaded(detail) => {
                self.state = DetailState::Loaded(detail);
                ServiceMsg::Idle
            }
            DetailMsg::Failed(error) => {
                self.state = DetailState::Failed(error);
                ServiceMsg::Idle
            }
            DetailMsg::CopyEmail => self.copy("e-mail", |d| d.point.email.as_str()),
            DetailMsg::CopyWhatsapp => self.copy("WhatsApp", |d| d.point.whatsapp.as_str()),
            DetailMsg::NavigateBack => ServiceMsg::Close,
        }
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, theme: &Theme, detail: &PointDetail) {
        let point = &detail.point;
        let items = detail
            .items
            .iter()
            .map(|item| item.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.muted));
        let value = |text: String| Span::styled(text, Style::default().fg(theme.text));
        let or_dash = |text: &str| {
            if text.is_empty() {
                "-".to_string()
            } else {
                text.to_string()
            }
        };

        let lines = vec![
            Line::from(Span::styled(
                point.name.clone(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(items, Style::default().fg(theme.subtext))),
            Line::default(),
            Line::from(vec![label("Address   "), value(point.address())]),
            Line::from(vec![label("Location  "), value(point.coordinates().to_string())]),
            Line::from(vec![label("Image     "), value(or_dash(&point.image_url))]),
            Line::default(),
            Line::from(vec![label("E-mail    "), value(or_dash(&point.email))]),
            Line::from(vec![label("WhatsApp  "), value(or_dash(&point.whatsapp))]),
        ];

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }
}

impl Service for DetailScreen {
    fn init(&mut self) {
        self.queue(DetailMsg::Load);
    }

    fn handle_tick(&mut self) {
        if matches!(self.state, DetailState::Loading) {
            self.spinner.on_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        let r = &self.resolver;
        let msg = if r.matches_detail(&key, DetailAction::CopyEmail) {
            DetailMsg::CopyEmail
        } else if r.matches_detail(&key, DetailAction::CopyWhatsapp) {
            DetailMsg::CopyWhatsapp
        } else if r.matches_detail(&key, DetailAction::Reload) {
            DetailMsg::Load
        } else if r.matches_global(&key, GlobalAction::Back) {
            DetailMsg::NavigateBack
        } else {
            return EventResult::Ignored;
        };
        self.queue(msg);
        EventResult::Consumed
    }

    fn update(&mut self) -> color_eyre::Result<ServiceMsg> {
        let mut commands: Vec<Box<dyn Command>> = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            match self.process_message(msg) {
                ServiceMsg::Idle => {}
                ServiceMsg::Run(cmds) => commands.extend(cmds),
                other => return Ok(other),
            }
        }
        if commands.is_empty() {
            Ok(ServiceMsg::Idle)
        } else {
            Ok(ServiceMsg::Run(commands))
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Collection point ")
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0)])
            .margin(1)
            .split(inner)[0];

        match &self.state {
            DetailState::Loading => self.spinner.render(frame, inner, theme),
            DetailState::Failed(error) => {
                let lines = vec![
                    Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
                    Line::from(Span::styled(
                        format!(
                            "Press {} to retry",
                            self.resolver.display_detail(DetailAction::Reload)
                        ),
                        Style::default().fg(theme.muted),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
            }
            DetailState::Loaded(detail) => self.render_detail(frame, inner, theme, detail),
        }
    }

    fn breadcrumbs(&self) -> Vec<String> {
        let name = self
            .detail()
            .map_or_else(|| format!("#{}", self.point_id), |d| d.point.name.clone());
        vec!["Points".to_string(), name]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::new(r.display_detail(DetailAction::CopyEmail), "copy e-mail"),
            Keybinding::new(r.display_detail(DetailAction::CopyWhatsapp), "copy WhatsApp"),
            Keybinding::new(r.display_detail(DetailAction::Reload), "reload"),
            Keybinding::new(r.display_global(GlobalAction::Back), "back"),
        ]
    }
}
