use crate::catalog::{Category, CollectionPoint, Coordinates, Filter};
use crate::points::request::RequestToken;

/// Messages for the points screen: lifecycle, user actions and async results.
#[derive(Debug, Clone)]
pub enum PointsMsg {
    // === Lifecycle ===
    /// Start location, category and point loading
    Initialize,

    // === User actions ===
    /// Flip the selection of a category
    ToggleCategory(u32),
    /// Re-run the point query for the current filter
    ReloadPoints,
    /// Open the detail screen of a point
    OpenDetail(u32),
    /// Leave the screen
    NavigateBack,

    // === Async results ===
    /// The user refused location access
    LocationDenied,
    /// A position fix was obtained
    LocationResolved(Coordinates),
    /// Permission was granted but no fix could be read
    LocationUnavailable(String),
    CategoriesLoaded(Vec<Category>),
    CategoriesFailed(String),
    PointsLoaded {
        token: RequestToken,
        filter: Filter,
        points: Vec<CollectionPoint>,
    },
    PointsFailed {
        token: RequestToken,
        filter: Filter,
        error: String,
    },
}
