use std::collections::BTreeSet;

/// Navigation parameters the points screen is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
    pub uf: String,
    pub city: String,
}

impl RouteParams {
    pub fn new(uf: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            uf: uf.into(),
            city: city.into(),
        }
    }
}

/// City, state and category selection used to query collection points.
///
/// Built from the route parameters and the current selection; a new filter
/// is computed for every change instead of mutating an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    city: String,
    uf: String,
    category_ids: BTreeSet<u32>,
}

impl Filter {
    pub fn new(params: &RouteParams, category_ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            city: params.city.clone(),
            uf: params.uf.to_uppercase(),
            category_ids: category_ids.into_iter().collect(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn uf(&self) -> &str {
        &self.uf
    }

    pub const fn category_ids(&self) -> &BTreeSet<u32> {
        &self.category_ids
    }

    /// Query string pairs for `GET /points`.
    ///
    /// `items` is always present. An empty value means every category.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        let items = self
            .category_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");

        [
            ("city", self.city.clone()),
            ("uf", self.uf.clone()),
            ("items", items),
        ]
    }
}
