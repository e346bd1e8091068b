//! Collection point discovery screen.
//!
//! Composes three independent async operations: reading the device position,
//! loading the category strip once, and querying points for the current
//! filter every time the category selection changes. Point responses are
//! applied by trigger order; a response for a superseded filter is dropped
//! even if it arrives last.

mod commands;
mod map;
mod message;
mod request;
mod selection;

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::Theme;
use crate::app::Route;
use crate::catalog::{CatalogService, CollectionPoint, Coordinates, Filter, RouteParams};
use crate::commands::Command;
use crate::config::{GlobalAction, KeyResolver, NavAction, PointsAction};
use crate::location::LocationProvider;
use crate::service::{Service, ServiceMsg};
use crate::ui::{EventResult, Keybinding, Spinner};

use commands::{FetchCategoriesCmd, FetchPointsCmd, RequestLocationCmd};
use message::PointsMsg;
use request::LatestRequest;
use selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Categories have not loaded yet
    Initializing,
    Ready,
}

/// The point discovery screen.
pub struct PointsScreen {
    params: RouteParams,
    catalog: Arc<dyn CatalogService>,
    location: Arc<dyn LocationProvider>,
    resolver: Arc<KeyResolver>,
    phase: Phase,
    position: Coordinates,
    /// Why permission was granted but no fix could be read
    location_error: Option<String>,
    categories: Selection,
    categories_error: Option<String>,
    filter: Filter,
    requests: LatestRequest,
    points: Vec<CollectionPoint>,
    points_error: Option<String>,
    point_cursor: ListState,
    /// Navigation held back until the commands collected with it are handed out
    deferred: Option<ServiceMsg>,
    spinner: Spinner,
    msg_tx: UnboundedSender<PointsMsg>,
    msg_rx: UnboundedReceiver<PointsMsg>,
}

impl PointsScreen {
    pub fn new(
        params: RouteParams,
        catalog: Arc<dyn CatalogService>,
        location: Arc<dyn LocationProvider>,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let filter = Filter::new(&params, []);
        Self {
            params,
            catalog,
            location,
            resolver,
            phase: Phase::Initializing,
            position: Coordinates::default(),
            location_error: None,
            categories: Selection::default(),
            categories_error: None,
            filter,
            requests: LatestRequest::new(),
            points: Vec::new(),
            points_error: None,
            point_cursor: ListState::default(),
            deferred: None,
            spinner: Spinner::new("Loading points..."),
            msg_tx,
            msg_rx,
        }
    }

    /// Queue a message to be processed by update().
    fn queue(&self, msg: PointsMsg) {
        let _ = self.msg_tx.send(msg);
    }

    fn selected_point(&self) -> Option<&CollectionPoint> {
        self.point_cursor.selected().and_then(|i| self.points.get(i))
    }

    fn request_location(&self) -> Box<dyn Command> {
        Box::new(RequestLocationCmd {
            location: Arc::clone(&self.location),
            tx: self.msg_tx.clone(),
        })
    }

    fn load_categories(&self) -> Box<dyn Command> {
        Box::new(FetchCategoriesCmd {
            catalog: Arc::clone(&self.catalog),
            tx: self.msg_tx.clone(),
        })
    }

    /// Issue a point query for the current filter, superseding any in flight.
    fn load_points(&mut self) -> Box<dyn Command> {
        let token = self.requests.issue();
        debug!("Issuing point request {token:?} for {:?}", self.filter);
        Box::new(FetchPointsCmd {
            catalog: Arc::clone(&self.catalog),
            filter: self.filter.clone(),
            token,
            tx: self.msg_tx.clone(),
        })
    }

    fn toggle_category(&mut self, id: u32) -> ServiceMsg {
        if !self.categories.toggle(id) {
            debug!("Ignoring toggle of unknown category {id}");
            return ServiceMsg::Idle;
        }
        self.filter = Filter::new(&self.params, self.categories.selected_ids());
        ServiceMsg::Run(vec![self.load_points()])
    }

    /// Move the point cursor within the loaded list.
    fn move_point_cursor(&mut self, down: bool) {
        let Some(last) = self.points.len().checked_sub(1) else {
            self.point_cursor.select(None);
            return;
        };
        let index = match (self.point_cursor.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1).min(last),
        };
        self.point_cursor.select(Some(index));
    }

    fn set_points(&mut self, points: Vec<CollectionPoint>) {
        self.points = points;
        self.points_error = None;
        if self.points.is_empty() {
            self.point_cursor.select(None);
        } else {
            let index = self
                .point_cursor
                .selected()
                .map_or(0, |i| i.min(self.points.len() - 1));
            self.point_cursor.select(Some(index));
        }
    }

    /// Process a single message and return the result.
    fn process_message(&mut self, msg: PointsMsg) -> ServiceMsg {
        match msg {
            PointsMsg::Initialize => {
                info!(
                    "Opening points for {}/{}",
                    self.filter.city(),
                    self.filter.uf()
                );
                ServiceMsg::Run(vec![
                    self.request_location(),
                    self.load_categories(),
                    self.load_points(),
                ])
            }

            PointsMsg::ToggleCategory(id) => self.toggle_category(id),

            PointsMsg::ReloadPoints => ServiceMsg::Run(vec![self.load_points()]),

            PointsMsg::OpenDetail(point_id) => ServiceMsg::Navigate(Route::Detail { point_id }),

            PointsMsg::NavigateBack => ServiceMsg::Close,

            PointsMsg::LocationDenied => {
                info!("Location permission denied, map has no initial fix");
                ServiceMsg::Idle
            }

            PointsMsg::LocationResolved(position) => {
                debug!("Initial map center {position}");
                self.position = position;
                ServiceMsg::Idle
            }

            PointsMsg::LocationUnavailable(error) => {
                self.location_error = Some(error);
                ServiceMsg::Idle
            }

            PointsMsg::CategoriesLoaded(categories) => {
                debug!("Loaded {} categories", categories.len());
                self.categories = Selection::new(categories);
                self.categories_error = None;
                self.phase = Phase::Ready;
                ServiceMsg::Idle
            }

            PointsMsg::CategoriesFailed(error) => {
                self.categories_error = Some(error);
                ServiceMsg::Idle
            }

            PointsMsg::PointsLoaded {
                token,
                filter,
                points,
            } => {
                if self.requests.complete(token) {
                    debug!("Applying {} points for {filter:?}", points.len());
                    self.set_points(points);
                } else {
                    debug!("Discarding stale point response {token:?} for {filter:?}");
                }
                ServiceMsg::Idle
            }

            PointsMsg::PointsFailed {
                token,
                filter,
                error,
            } => {
                if self.requests.complete(token) {
                    warn!("Point query for {filter:?} failed: {error}");
                    self.points_error = Some(error);
                } else {
                    debug!("Discarding stale point failure {token:?}");
                }
                ServiceMsg::Idle
            }
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines = vec![
            Line::from(Span::styled(
                "Welcome.",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    "Find a collection point on the map in ",
                    Style::default().fg(theme.subtext),
                ),
                Span::styled(
                    format!("{}, {}", self.filter.city(), self.filter.uf()),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(
                    match (&self.location_error, self.position.is_unset()) {
                        (_, false) => format!("  (you are at {})", self.position),
                        (Some(error), true) => format!("  (no location fix: {error})"),
                        (None, true) => "  (no location fix)".to_string(),
                    },
                    Style::default().fg(theme.muted),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_points(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(format!(" Points ({}) ", self.points.len()))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));

        if self.points.is_empty() && self.requests.in_flight() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            self.spinner.render(frame, inner, theme);
            return;
        }

        if let Some(error) = &self.points_error {
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
                Line::from(Span::styled(
                    format!(
                        "Press {} to retry",
                        self.resolver.display_points(PointsAction::Reload)
                    ),
                    Style::default().fg(theme.muted),
                )),
            ])
            .block(block)
            .wrap(ratatui::widgets::Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        if self.points.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                "No collection points for this filter",
                Style::default().fg(theme.muted),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .points
            .iter()
            .map(|point| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        point.name.clone(),
                        Style::default().fg(theme.text),
                    )),
                    Line::from(Span::styled(
                        point.address(),
                        Style::default().fg(theme.muted),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme.surface)
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut self.point_cursor);
    }

    fn render_categories(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .title(" Categories ")
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border));

        let line = if let Some(error) = &self.categories_error {
            Line::from(Span::styled(error.clone(), Style::default().fg(theme.error)))
        } else if self.phase == Phase::Initializing {
            Line::from(Span::styled(
                "Loading categories...",
                Style::default().fg(theme.muted),
            ))
        } else {
            let mut spans = Vec::new();
            for (i, item) in self.categories.items().iter().enumerate() {
                let mut style = if item.selected {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.subtext)
                };
                if i == self.categories.cursor() {
                    style = style.bg(theme.surface).add_modifier(Modifier::UNDERLINED);
                }
                let mark = if item.selected { "■" } else { "□" };
                spans.push(Span::styled(format!(" {mark} {} ", item.category), style));
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

impl Service for PointsScreen {
    fn init(&mut self) {
        self.queue(PointsMsg::Initialize);
    }

    fn handle_tick(&mut self) {
        if self.requests.in_flight() {
            self.spinner.on_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        let r = &self.resolver;

        if r.matches_nav(&key, NavAction::Left) {
            self.categories.previous();
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Right) {
            self.categories.next();
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Home) {
            self.categories.first();
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::End) {
            self.categories.last();
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Down) {
            self.move_point_cursor(true);
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Up) {
            self.move_point_cursor(false);
            return EventResult::Consumed;
        }
        if r.matches_points(&key, PointsAction::ToggleCategory) {
            if let Some(id) = self.categories.current().map(|c| c.category.id) {
                self.queue(PointsMsg::ToggleCategory(id));
            }
            return EventResult::Consumed;
        }
        if r.matches_points(&key, PointsAction::Reload) {
            self.queue(PointsMsg::ReloadPoints);
            return EventResult::Consumed;
        }
        if r.matches_nav(&key, NavAction::Select) {
            if let Some(id) = self.selected_point().map(|p| p.id) {
                self.queue(PointsMsg::OpenDetail(id));
            }
            return EventResult::Consumed;
        }
        if r.matches_global(&key, GlobalAction::Back) {
            self.queue(PointsMsg::NavigateBack);
            return EventResult::Consumed;
        }

        EventResult::Ignored
    }

    fn update(&mut self) -> color_eyre::Result<ServiceMsg> {
        if let Some(transition) = self.deferred.take() {
            return Ok(transition);
        }

        let mut commands: Vec<Box<dyn Command>> = Vec::new();

        while let Ok(msg) = self.msg_rx.try_recv() {
            match self.process_message(msg) {
                ServiceMsg::Idle => {}
                ServiceMsg::Run(cmds) => commands.extend(cmds),
                transition @ (ServiceMsg::Navigate(_) | ServiceMsg::Close) => {
                    if commands.is_empty() {
                        return Ok(transition);
                    }
                    // Issued point requests must reach the App or their
                    // tokens never complete.
                    self.deferred = Some(transition);
                    break;
                }
            }
        }

        if commands.is_empty() {
            Ok(ServiceMsg::Idle)
        } else {
            Ok(ServiceMsg::Run(commands))
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_header(frame, rows[0], theme);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        map::render(
            frame,
            columns[0],
            theme,
            self.position,
            &self.points,
            self.point_cursor.selected(),
        );
        self.render_points(frame, columns[1], theme);
        self.render_categories(frame, rows[2], theme);
    }

    fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Points".to_string(),
            format!("{}/{}", self.filter.city(), self.filter.uf()),
        ]
    }

    fn keybindings(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::new(
                r.display_points(PointsAction::ToggleCategory),
                "toggle category",
            ),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_nav(NavAction::Left),
                    r.display_nav(NavAction::Right)
                ),
                "categories",
            ),
            Keybinding::new(r.display_nav(NavAction::Select), "details"),
            Keybinding::new(r.display_points(PointsAction::Reload), "reload"),
            Keybinding::new(r.display_global(GlobalAction::Back), "back"),
        ]
    }
}
