//! Async command pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Services return commands, and the App spawns them, tracks them in the
//! status bar and notifies the service once they complete.

mod clipboard;

use async_trait::async_trait;
pub use clipboard::CopyToClipboardCmd;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;

/// Identifier the App assigns to a spawned command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u64);

/// Async command that performs side effects.
///
/// Commands typically send their results back to the service through the
/// service's own channel; `app_tx` is for app-wide feedback such as toasts
/// and alerts.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for status display.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()>;
}
