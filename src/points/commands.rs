//! Commands for the points screen.
//!
//! Each command performs one async operation and sends its outcome back
//! through the screen's message channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::app::AppMessage;
use crate::catalog::{CatalogService, Filter};
use crate::commands::Command;
use crate::location::{LocationProvider, Permission};
use crate::points::message::PointsMsg;
use crate::points::request::RequestToken;

pub const LOCATION_ALERT_TITLE: &str = "Oooops...";
pub const LOCATION_ALERT_MESSAGE: &str = "We need your permission to get your location";

/// Ask for location permission, then read the position once.
pub struct RequestLocationCmd {
    pub(super) location: Arc<dyn LocationProvider>,
    pub(super) tx: UnboundedSender<PointsMsg>,
}

#[async_trait]
impl Command for RequestLocationCmd {
    fn name(&self) -> String {
        "Locating device".to_string()
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        if self.location.request_permission().await == Permission::Denied {
            let _ = self.tx.send(PointsMsg::LocationDenied);
            app_tx.send(AppMessage::ShowAlert {
                title: LOCATION_ALERT_TITLE.to_string(),
                message: LOCATION_ALERT_MESSAGE.to_string(),
            })?;
            return Ok(());
        }

        match self.location.current_position().await {
            Ok(position) => {
                let _ = self.tx.send(PointsMsg::LocationResolved(position));
            }
            Err(e) => {
                warn!("Location permission granted but no fix: {e}");
                let _ = self.tx.send(PointsMsg::LocationUnavailable(e.to_string()));
            }
        }
        Ok(())
    }
}

/// Fetch every category once.
pub struct FetchCategoriesCmd {
    pub(super) catalog: Arc<dyn CatalogService>,
    pub(super) tx: UnboundedSender<PointsMsg>,
}

#[async_trait]
impl Command for FetchCategoriesCmd {
    fn name(&self) -> String {
        "Loading categories".to_string()
    }

    async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        match self.catalog.categories().await {
            Ok(categories) => {
                let _ = self.tx.send(PointsMsg::CategoriesLoaded(categories));
            }
            Err(e) => {
                warn!("Failed to load categories: {e}");
                let _ = self.tx.send(PointsMsg::CategoriesFailed(e.to_string()));
            }
        }
        Ok(())
    }
}

/// Fetch the points matching `filter`, tagged with the token it was issued under.
pub struct FetchPointsCmd {
    pub(super) catalog: Arc<dyn CatalogService>,
    pub(super) filter: Filter,
    pub(super) token: RequestToken,
    pub(super) tx: UnboundedSender<PointsMsg>,
}

#[async_trait]
impl Command for FetchPointsCmd {
    fn name(&self) -> String {
        match self.filter.category_ids().len() {
            0 => "Loading points".to_string(),
            1 => "Loading points for 1 category".to_string(),
            n => format!("Loading points for {n} categories"),
        }
    }

    async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        let Self {
            catalog,
            filter,
            token,
            tx,
        } = *self;

        let msg = match catalog.points(&filter).await {
            Ok(points) => PointsMsg::PointsLoaded {
                token,
                filter,
                points,
            },
            Err(e) => {
                warn!("Failed to load points for {filter:?}: {e}");
                PointsMsg::PointsFailed {
                    token,
                    filter,
                    error: e.to_string(),
                }
            }
        };
        let _ = tx.send(msg);
        Ok(())
    }
}
