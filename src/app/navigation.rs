use crate::catalog::RouteParams;

/// A screen the user can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Collection points of a city
    Points(RouteParams),
    /// A single collection point
    Detail { point_id: u32 },
}

impl Route {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Points(_) => "points",
            Self::Detail { .. } => "detail",
        }
    }
}

/// Stack of open screens, the last entry being the visible one.
///
/// Each route is stored with the screen built for it so going back restores
/// the previous screen with its state intact.
pub struct Navigator<S> {
    stack: Vec<(Route, S)>,
}

impl<S> Default for Navigator<S> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<S> Navigator<S> {
    pub fn push(&mut self, route: Route, screen: S) {
        self.stack.push((route, screen));
    }

    /// Close the visible screen, returning it so the caller can tear it down.
    pub fn pop(&mut self) -> Option<(Route, S)> {
        self.stack.pop()
    }

    pub fn current(&self) -> Option<&Route> {
        self.stack.last().map(|(route, _)| route)
    }

    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.stack.last_mut().map(|(_, screen)| screen)
    }

}
