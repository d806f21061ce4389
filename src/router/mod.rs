//! Routing: locations, the route registry, and view chain rendering.
//!
//! [`Router`] resolves a [`Location`] against a shared [`RouteRegistry`] and
//! hands the matched route to its [`ViewRenderer`], which resolves and
//! displays the view chain in a [`Ui`].

pub mod location;
pub mod parameters;
pub mod registry;
pub mod renderer;
pub mod route;

use std::sync::Arc;

use tracing::debug;

use crate::ui::Ui;
use crate::view::InstantiationError;

pub use location::Location;
pub use parameters::{ParameterKind, ParameterSegment, RouteParameters};
pub use registry::{
    ListenerId, RouteConfiguration, RouteEntry, RouteMatch, RouteRegistry, RouteUpdate,
    RoutesChangedEvent,
};
pub use renderer::{NavigationEvent, NavigationHandler, NavigationOutcome, ViewRenderer};
pub use route::{Route, RouteDescriptor};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration errors, reported when a renderer or route entry is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("{view} is used in multiple locations of the same view chain")]
    DuplicateViewType { view: &'static str },
    #[error("invalid parameters for route '{path}': {message}")]
    InvalidParameters { path: String, message: String },
}

/// A navigation that could not be displayed.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no route for location '{0}'")]
    NotFound(String),
    #[error("cannot instantiate view {view}")]
    Instantiation {
        view: &'static str,
        #[source]
        source: InstantiationError,
    },
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatches navigations to the routes of a registry.
///
/// Every navigation reads the registry's current snapshot, so routes changed
/// by a hot reload take effect on the next navigation.
#[derive(Clone)]
pub struct Router {
    registry: Arc<RouteRegistry>,
}

impl Router {
    /// Create a router over `registry`.
    pub fn new(registry: Arc<RouteRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this router reads.
    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// Navigate `ui` to `location`.
    pub fn navigate(
        &self,
        ui: &mut Ui,
        location: impl Into<Location>,
    ) -> Result<NavigationOutcome, NavigationError> {
        let location = location.into();
        let Some(matched) = self.registry.resolve(&location) else {
            debug!(location = %location, "no route");
            return Err(NavigationError::NotFound(location.to_string()));
        };
        let event = NavigationEvent::new(&location, &matched.parameters);
        matched.entry.renderer().handle(ui, &event)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::view::{LocationChangeEvent, View, ViewType};

    #[derive(Default)]
    struct Article {
        slug: Option<String>,
    }

    impl View for Article {
        fn on_location_change(&mut self, event: &LocationChangeEvent<'_>) {
            self.slug = event.parameters.get("slug").map(str::to_owned);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn router() -> Router {
        let registry = Arc::new(RouteRegistry::new());
        registry
            .set_route(
                "articles",
                ViewType::of::<Article>(),
                vec![ParameterSegment::optional("slug")],
            )
            .unwrap();
        Router::new(registry)
    }

    #[test]
    fn navigate_binds_parameters() {
        let router = router();
        let mut ui = Ui::new();

        let outcome = router.navigate(&mut ui, "articles/hello-world").unwrap();

        let article = ui.downcast::<Article>(outcome.view).unwrap();
        assert_eq!(article.slug.as_deref(), Some("hello-world"));
    }

    #[test]
    fn navigate_reuses_view_between_parameter_changes() {
        let router = router();
        let mut ui = Ui::new();

        let first = router.navigate(&mut ui, "articles/one").unwrap();
        let second = router.navigate(&mut ui, "articles").unwrap();

        assert_eq!(first.view, second.view);
        assert_eq!(ui.downcast::<Article>(second.view).unwrap().slug, None);
    }

    #[test]
    fn unknown_location_is_not_found() {
        let router = router();
        let mut ui = Ui::new();

        let err = router.navigate(&mut ui, "missing?x=1").unwrap_err();

        assert!(matches!(err, NavigationError::NotFound(ref path) if path == "missing?x=1"));
        assert!(ui.active_chain().is_empty());
    }

    #[test]
    fn errors_render_messages() {
        let err = RouterError::DuplicateViewType { view: "Shell" };
        assert_eq!(
            err.to_string(),
            "Shell is used in multiple locations of the same view chain"
        );
        let err = NavigationError::NotFound("x".into());
        assert_eq!(err.to_string(), "no route for location 'x'");
    }
}
