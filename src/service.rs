use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::app::Route;
use crate::commands::Command;
use crate::ui::{EventResult, Keybinding};

/// Outcome of [`Service::update`].
pub enum ServiceMsg {
    /// No action needed
    Idle,
    /// Run one or more commands
    Run(Vec<Box<dyn Command>>),
    /// Open another screen on top of this one
    Navigate(Route),
    /// Close this screen and return to the one below
    Close,
}

impl<T: Command> From<T> for ServiceMsg {
    fn from(value: T) -> Self {
        Self::Run(vec![Box::new(value)])
    }
}

/// A full-page screen of the application.
///
/// Services own their state and a private message queue. The App calls
/// methods in this order:
///
/// 1. `init()` - once when the screen is opened
/// 2. `update()` - immediately after init to process startup messages
/// 3. For each event:
///    - `handle_tick()` if tick event
///    - `handle_key()` if key event, then `update()` if consumed
/// 4. When a command completes: `update()`
/// 5. `destroy()` - when the screen is closed
pub trait Service {
    /// Queue startup message(s).
    fn init(&mut self) {}

    /// Clean up when the screen is closing.
    fn destroy(&mut self) {}

    /// Handle a tick event for animations.
    fn handle_tick(&mut self) {}

    /// Handle a key event.
    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()>;

    /// Process all queued messages and return the result.
    ///
    /// This is the only place where a service may start commands, navigate
    /// or close itself.
    ///
    /// # Errors
    /// Returns an error if message processing fails. The App displays it and
    /// keeps the service open.
    fn update(&mut self) -> Result<ServiceMsg>;

    /// Render the service to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segments for the status bar.
    fn breadcrumbs(&self) -> Vec<String>;

    /// Keybindings shown in the status bar for the current state.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
