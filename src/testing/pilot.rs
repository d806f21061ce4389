//! Pilot: programmatic navigation and hot reload against a headless application.
//!
//! The `Pilot` owns an [`Application`], one session [`Ui`] and a connected
//! live reload client, and provides methods to navigate, simulate recompiles,
//! and render routing state to text for snapshot testing.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};

use super::snapshot::{chain_to_string, routes_to_string};
use crate::app::{AppConfig, Application};
use crate::reload::{ReloadSignal, ReloadSummary, StaticRouteMetadata};
use crate::router::{
    Location, NavigationError, NavigationOutcome, RouteDescriptor, Router, RouterError,
};
use crate::ui::Ui;
use crate::view::ViewType;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless application driver for testing.
///
/// Route declarations go through a [`StaticRouteMetadata`], so a test can
/// change what a type declares and then hot reload it, the way a recompile
/// would.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::Pilot;
///
/// let mut pilot = Pilot::new();
/// pilot.scan([ViewType::routed::<Home>()]).unwrap();
/// pilot.navigate("").unwrap();
/// assert_eq!(pilot.chain(), "Home");
/// ```
pub struct Pilot {
    app: Application,
    metadata: Arc<StaticRouteMetadata>,
    router: Router,
    ui: Ui,
    client: Option<broadcast::Receiver<ReloadSignal>>,
}

impl Pilot {
    /// Create a pilot over a development-mode application.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a pilot from an [`AppConfig`].
    pub fn with_config(config: AppConfig) -> Self {
        let metadata = Arc::new(StaticRouteMetadata::new());
        let app = Application::with_metadata(config, metadata.clone());
        let client = app.subscribe_live_reload();
        Self {
            router: app.router(),
            ui: app.create_ui(),
            app,
            metadata,
            client,
        }
    }

    // ── Routes ───────────────────────────────────────────────────────

    /// Register the declared routes of `types`.
    pub fn scan(&self, types: impl IntoIterator<Item = ViewType>) -> Result<usize, RouterError> {
        self.app.scan(types)
    }

    /// Change what `view_type` declares, as a recompile would.
    pub fn declare(&self, view_type: &ViewType, descriptor: RouteDescriptor) {
        self.metadata.declare(view_type, descriptor);
    }

    /// Reconcile a simulated hot swap. `None` in production mode.
    pub fn hot_reload(
        &self,
        added: impl IntoIterator<Item = ViewType>,
        removed: impl IntoIterator<Item = ViewType>,
    ) -> Option<ReloadSummary> {
        let added: HashSet<_> = added.into_iter().collect();
        let removed: HashSet<_> = removed.into_iter().collect();
        Some(self.app.reconciler()?.reload(&added, &removed))
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Navigate the pilot's session to `location`.
    pub fn navigate(
        &mut self,
        location: impl Into<Location>,
    ) -> Result<NavigationOutcome, NavigationError> {
        self.router.navigate(&mut self.ui, location)
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// Drain the live reload client, returning how many signals arrived.
    ///
    /// Signals dropped because the client lagged are counted too.
    pub fn reload_signals(&mut self) -> usize {
        let Some(client) = self.client.as_mut() else {
            return 0;
        };
        let mut count = 0;
        loop {
            match client.try_recv() {
                Ok(_) => count += 1,
                Err(TryRecvError::Lagged(skipped)) => count += skipped as usize,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return count,
            }
        }
    }

    // ── Render helpers ───────────────────────────────────────────────

    /// The active chain as text, outermost first.
    pub fn chain(&self) -> String {
        chain_to_string(&self.ui)
    }

    /// The route table as text.
    pub fn routes(&self) -> String {
        routes_to_string(&self.app.registry().configuration())
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::any::Any;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::router::Route;
    use crate::ui::ViewId;
    use crate::view::{HasChildView, ParentViewType, View};

    #[derive(Default)]
    struct Layout {
        child: Option<ViewId>,
    }

    impl View for Layout {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl HasChildView for Layout {
        fn set_child_view(&mut self, child: ViewId) {
            self.child = Some(child);
        }
    }

    #[derive(Default)]
    struct Dashboard;

    impl View for Dashboard {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl Route for Dashboard {
        fn route() -> RouteDescriptor {
            RouteDescriptor::new("dashboard").with_parent(ParentViewType::of::<Layout>())
        }
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_pilot_is_empty() {
        let mut pilot = Pilot::new();
        assert_eq!(pilot.chain(), "");
        assert_eq!(pilot.routes(), "");
        assert_eq!(pilot.reload_signals(), 0);
        assert!(pilot.app().is_live_reload_enabled());
    }

    // ── Navigation ───────────────────────────────────────────────────

    #[test]
    fn navigate_renders_chain() {
        let mut pilot = Pilot::new();
        pilot.scan([ViewType::routed::<Dashboard>()]).unwrap();

        let outcome = pilot.navigate("dashboard").unwrap();

        assert_eq!(pilot.chain(), "Layout > Dashboard");
        let layout = pilot.ui().downcast::<Layout>(outcome.parents[0]).unwrap();
        assert_eq!(layout.child, Some(outcome.view));
    }

    #[test]
    fn navigate_unknown_location_fails() {
        let mut pilot = Pilot::new();
        assert!(matches!(
            pilot.navigate("nowhere"),
            Err(NavigationError::NotFound(_))
        ));
    }

    // ── Hot reload ───────────────────────────────────────────────────

    #[test]
    fn hot_reload_renames_and_signals() {
        let mut pilot = Pilot::new();
        let dashboard = ViewType::routed::<Dashboard>();
        pilot.scan([dashboard.clone()]).unwrap();

        pilot.declare(&dashboard, RouteDescriptor::new("home"));
        let summary = pilot.hot_reload([dashboard], Vec::<ViewType>::new()).unwrap();

        assert_eq!(summary.added, vec!["home".to_owned()]);
        assert_eq!(summary.removed, vec!["dashboard".to_owned()]);
        assert_eq!(pilot.reload_signals(), 1);
        assert!(pilot.navigate("home").is_ok());
        assert_eq!(pilot.chain(), "Dashboard");
    }

    #[test]
    fn production_pilot_has_no_hot_reload() {
        let mut pilot = Pilot::with_config(AppConfig::new().with_production_mode(true));
        assert!(pilot.hot_reload(Vec::<ViewType>::new(), Vec::<ViewType>::new()).is_none());
        assert_eq!(pilot.reload_signals(), 0);
    }
}
