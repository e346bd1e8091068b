//! Remote catalog of recyclable categories and collection points.

mod client;
mod model;
mod query;

pub use client::{CatalogService, HttpCatalog};
pub use model::{Category, CollectionPoint, Coordinates, PointDetail};
pub use query::{Filter, RouteParams};

#[cfg(test)]
pub use client::{CatalogError, CatalogResult};
#[cfg(test)]
pub use model::AcceptedItem;
