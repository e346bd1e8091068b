use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::catalog::model::{Category, CollectionPoint, PointDetail};
use crate::catalog::query::Filter;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not reach the catalog service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog service answered {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("Unexpected catalog payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Remote source of categories and collection points.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// `GET /items`
    async fn categories(&self) -> CatalogResult<Vec<Category>>;

    /// `GET /points` restricted by `filter`.
    async fn points(&self, filter: &Filter) -> CatalogResult<Vec<CollectionPoint>>;

    /// `GET /points/{id}`
    async fn point(&self, id: u32) -> CatalogResult<PointDetail>;
}

/// [`CatalogService`] backed by the REST API.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Client for the backend at `base_url`. Without a `timeout` requests
    /// wait as long as the server takes.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> CatalogResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn points_request(&self, filter: &Filter) -> CatalogResult<Request> {
        Ok(self
            .client
            .get(self.url("points"))
            .query(&filter.query_pairs()[..])
            .build()?)
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> CatalogResult<T> {
        let url = request.url().to_string();
        debug!("GET {url}");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status, url });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn categories(&self) -> CatalogResult<Vec<Category>> {
        let request = self.client.get(self.url("items")).build()?;
        self.send(request).await
    }

    async fn points(&self, filter: &Filter) -> CatalogResult<Vec<CollectionPoint>> {
        let request = self.points_request(filter)?;
        self.send(request).await
    }

    async fn point(&self, id: u32) -> CatalogResult<PointDetail> {
        let request = self.client.get(self.url(&format!("points/{id}"))).build()?;
        self.send(request).await
    }
}
