//! Application shell.
//!
//! The [`App`] owns the event loop and the navigation stack. Screens never
//! block: they hand commands to the App, which spawns them on the runtime and
//! calls back into the screen once they complete.

mod navigation;

use std::collections::BTreeMap;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

pub use navigation::{Navigator, Route};

use crate::Theme;
use crate::catalog::{CatalogService, RouteParams};
use crate::commands::{Command, CommandId};
use crate::config::{GlobalAction, KeyResolver};
use crate::detail::DetailScreen;
use crate::location::LocationProvider;
use crate::points::PointsScreen;
use crate::service::{Service, ServiceMsg};
use crate::tui::{Event, Tui};
use crate::ui::{
    Component, Dialog, DialogEvent, EventResult, StatusBar, Toast, ToastManager, ToastType,
};

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

/// Application-level messages sent by commands.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Quit the application
    Quit,
    /// Show a short notification
    ShowToast {
        message: String,
        toast_type: ToastType,
    },
    /// Show a modal notice that must be dismissed
    ShowAlert { title: String, message: String },
    /// Display an error to the user
    DisplayError(String),
    /// A command completed, the visible screen should process its messages
    CommandCompleted { id: CommandId, success: bool },
}

pub struct App {
    navigator: Navigator<Box<dyn Service>>,
    catalog: Arc<dyn CatalogService>,
    location: Arc<dyn LocationProvider>,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    toasts: ToastManager,
    dialog: Option<Dialog>,
    running: BTreeMap<CommandId, String>,
    next_command_id: u64,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    /// Build the app with the points screen of `params` opened.
    ///
    /// Must be called within a tokio runtime: opening the first screen spawns
    /// its startup commands.
    pub fn new(
        params: RouteParams,
        catalog: Arc<dyn CatalogService>,
        location: Arc<dyn LocationProvider>,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            navigator: Navigator::default(),
            catalog,
            location,
            resolver,
            theme,
            toasts: ToastManager::new(),
            dialog: None,
            running: BTreeMap::new(),
            next_command_id: 0,
            message_tx,
            message_rx,
            should_quit: false,
            should_suspend: false,
        };
        app.open(Route::Points(params));
        app
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            if let Some(event) = tui.next_event().await {
                self.handle_event(&mut tui, event)?;
            }
            self.process_messages();

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        info!("Leaving with {} command(s) still running", self.running.len());
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> color_eyre::Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Suspend => self.should_suspend = true,
            Event::Tick => self.handle_tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key),
            Event::Error(error) => warn!("Terminal event error: {error}"),
            Event::Init => debug!("Event loop started"),
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.toasts.handle_tick();
        if let Some(service) = self.navigator.current_mut() {
            service.handle_tick();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(dialog) = &mut self.dialog {
            match dialog.handle_key(key) {
                Ok(EventResult::Event(DialogEvent::Dismissed)) => self.dialog = None,
                Ok(_) => {}
                Err(e) => warn!("Dialog failed to handle key: {e}"),
            }
            return;
        }

        let consumed = self
            .navigator
            .current_mut()
            .is_some_and(|service| service.handle_key(key).is_consumed());
        if consumed {
            self.update_current();
            return;
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        }
    }

    /// Let the visible screen process its queued messages.
    fn update_current(&mut self) {
        let Some(service) = self.navigator.current_mut() else {
            return;
        };
        match service.update() {
            Ok(msg) => self.apply(msg),
            Err(e) => self.show_error(format!("Screen failed to update: {e}")),
        }
    }

    fn apply(&mut self, msg: ServiceMsg) {
        match msg {
            ServiceMsg::Idle => {}
            ServiceMsg::Run(commands) => {
                for command in commands {
                    self.spawn(command);
                }
                // A screen may hold back a transition until its commands are
                // running.
                self.update_current();
            }
            ServiceMsg::Navigate(route) => self.open(route),
            ServiceMsg::Close => self.close(),
        }
    }

    fn build(&self, route: &Route) -> Box<dyn Service> {
        match route {
            Route::Points(params) => Box::new(PointsScreen::new(
                params.clone(),
                Arc::clone(&self.catalog),
                Arc::clone(&self.location),
                Arc::clone(&self.resolver),
            )),
            Route::Detail { point_id } => Box::new(DetailScreen::new(
                *point_id,
                Arc::clone(&self.catalog),
                Arc::clone(&self.resolver),
            )),
        }
    }

    fn open(&mut self, route: Route) {
        info!("Opening {} screen", route.name());
        let mut service = self.build(&route);
        service.init();
        self.navigator.push(route, service);
        self.update_current();
    }

    /// Close the visible screen. The screen below catches up on anything its
    /// commands delivered while it was covered.
    fn close(&mut self) {
        if let Some((route, mut service)) = self.navigator.pop() {
            debug!("Closing {} screen", route.name());
            service.destroy();
        }
        match self.navigator.current() {
            Some(route) => {
                debug!("Returning to {} screen", route.name());
                self.update_current();
            }
            None => self.should_quit = true,
        }
    }

    fn spawn(&mut self, command: Box<dyn Command>) {
        self.next_command_id += 1;
        let id = CommandId(self.next_command_id);
        let name = command.name();
        debug!("Spawning command {id:?}: {name}");
        self.running.insert(id, name);

        let tx = self.message_tx.clone();
        tokio::spawn(async move {
            let success = match command.execute(tx.clone()).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Command {id:?} failed: {e}");
                    let _ = tx.send(AppMessage::DisplayError(e.to_string()));
                    false
                }
            };
            let _ = tx.send(AppMessage::CommandCompleted { id, success });
        });
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.message_rx.try_recv() {
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::ShowToast {
                message,
                toast_type,
            } => self.toasts.show(Toast::new(message, toast_type)),
            AppMessage::ShowAlert { title, message } => {
                self.dialog = Some(Dialog::alert(title, message, Arc::clone(&self.resolver)));
            }
            AppMessage::DisplayError(error) => self.show_error(error),
            AppMessage::CommandCompleted { id, success } => {
                if let Some(name) = self.running.remove(&id) {
                    debug!("Command {id:?} ({name}) completed, success: {success}");
                }
                self.update_current();
            }
        }
    }

    fn show_error(&mut self, error: String) {
        warn!("{error}");
        self.dialog = Some(Dialog::error(error, Arc::clone(&self.resolver)));
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| {
            let area = frame.area();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(2)])
                .split(area);

            let (breadcrumbs, keybindings) = match self.navigator.current_mut() {
                Some(service) => {
                    service.render(frame, chunks[0], &self.theme);
                    (service.breadcrumbs(), service.keybindings())
                }
                None => (Vec::new(), Vec::new()),
            };

            let running: Vec<String> = self.running.values().cloned().collect();
            StatusBar::render(
                frame,
                chunks[1],
                &self.theme,
                &breadcrumbs,
                &keybindings,
                &running,
            );

            self.toasts.render(frame, chunks[0], &self.theme);
            if let Some(dialog) = &mut self.dialog {
                dialog.render(frame, area, &self.theme);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use color_eyre::Result;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::Frame;

    use super::*;
    use crate::catalog::{CatalogResult, Category, CollectionPoint, Filter, PointDetail};
    use crate::location::StaticLocation;

    struct EmptyCatalog;

    #[async_trait]
    impl CatalogService for EmptyCatalog {
        async fn categories(&self) -> CatalogResult<Vec<Category>> {
            Ok(Vec::new())
        }

        async fn points(&self, _filter: &Filter) -> CatalogResult<Vec<CollectionPoint>> {
            Ok(Vec::new())
        }

        async fn point(&self, id: u32) -> CatalogResult<PointDetail> {
            Ok(PointDetail {
                point: CollectionPoint {
                    id,
                    name: "Ponto".to_string(),
                    image: String::new(),
                    image_url: String::new(),
                    latitude: 0.0,
                    longitude: 0.0,
                    city: "Recife".to_string(),
                    uf: "PE".to_string(),
                    whatsapp: String::new(),
                    email: String::new(),
                },
                items: Vec::new(),
            })
        }
    }

    fn app() -> App {
        App::new(
            RouteParams::new("pe", "Recife"),
            Arc::new(EmptyCatalog),
            Arc::new(StaticLocation::denied()),
            Arc::new(KeyResolver::default()),
            Theme::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_starts_on_points_with_startup_commands() {
        let app = app();
        assert!(matches!(app.navigator.current(), Some(Route::Points(p)) if p.city == "Recife"));
        assert_eq!(app.running.len(), 3);
    }

    #[tokio::test]
    async fn test_detail_then_back_returns_to_points() {
        let mut app = app();
        app.apply(ServiceMsg::Navigate(Route::Detail { point_id: 9 }));
        assert_eq!(app.navigator.current(), Some(&Route::Detail { point_id: 9 }));

        app.handle_key(key(KeyCode::Esc));
        assert!(matches!(app.navigator.current(), Some(Route::Points(_))));
        assert!(!app.should_quit);
    }

    struct IdleCmd;

    #[async_trait]
    impl Command for IdleCmd {
        fn name(&self) -> String {
            "Idle".to_string()
        }

        async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> Result<()> {
            Ok(())
        }
    }

    /// Hands out one command, then asks to be closed.
    struct RunThenClose {
        updates: Vec<ServiceMsg>,
    }

    impl Service for RunThenClose {
        fn handle_key(&mut self, _key: KeyEvent) -> EventResult<()> {
            EventResult::Ignored
        }

        fn update(&mut self) -> Result<ServiceMsg> {
            Ok(self.updates.pop().unwrap_or(ServiceMsg::Idle))
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn breadcrumbs(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_transition_after_commands_is_applied() {
        let mut app = app();
        let running = app.running.len();
        app.navigator.push(
            Route::Detail { point_id: 1 },
            Box::new(RunThenClose {
                updates: vec![ServiceMsg::Close, ServiceMsg::from(IdleCmd)],
            }),
        );

        app.update_current();

        assert_eq!(app.running.len(), running + 1);
        assert!(matches!(app.navigator.current(), Some(Route::Points(_))));
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_back_from_last_screen_quits() {
        let mut app = app();
        app.handle_key(key(KeyCode::Esc));
        assert!(app.navigator.current().is_none());
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_alert_captures_keys_until_dismissed() {
        let mut app = app();
        app.handle_message(AppMessage::ShowAlert {
            title: "Oooops...".to_string(),
            message: "We need your permission to get your location".to_string(),
        });
        assert_eq!(app.dialog.as_ref().map(Dialog::title), Some("Oooops..."));

        // Other keys are swallowed while the alert is open.
        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.dialog.is_some());

        app.handle_key(key(KeyCode::Enter));
        assert!(app.dialog.is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_completed_command_leaves_status() {
        let mut app = app();
        app.handle_message(AppMessage::CommandCompleted {
            id: CommandId(1),
            success: true,
        });
        assert_eq!(app.running.len(), 2);
        assert!(!app.running.contains_key(&CommandId(1)));
    }

    #[tokio::test]
    async fn test_error_opens_error_dialog() {
        let mut app = app();
        app.handle_message(AppMessage::DisplayError("boom".to_string()));
        assert_eq!(app.dialog.as_ref().map(Dialog::title), Some("Error"));
    }

    #[tokio::test]
    async fn test_toast_message_is_shown() {
        let mut app = app();
        app.handle_message(AppMessage::ShowToast {
            message: "Copied e-mail".to_string(),
            toast_type: ToastType::Success,
        });
        assert_eq!(app.toasts.len(), 1);
    }
}
