//! Application: configuration, the shared route registry, and reload wiring.
//!
//! [`Application`] owns everything one deployed application shares between
//! sessions: the [`RouteRegistry`], the route metadata provider and (outside
//! production mode) the live reload channel. Each browser session gets its
//! own [`Ui`] from [`Application::create_ui`].

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::reload::{
    DeclaredRoutes, LiveReload, LiveReloadChannel, Reconciler, ReloadSignal, RouteMetadata,
};
use crate::router::{RouteEntry, RouteRegistry, Router, RouterError};
use crate::ui::Ui;
use crate::view::ViewType;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Name used in log output.
    pub application_name: String,
    /// Production mode disables live reload and hot reload reconciliation.
    pub production_mode: bool,
    /// Signals buffered per slow live reload client.
    pub live_reload_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: "trellis".to_owned(),
            production_mode: false,
            live_reload_capacity: 16,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name (builder).
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// Enable or disable production mode (builder).
    pub fn with_production_mode(mut self, production_mode: bool) -> Self {
        self.production_mode = production_mode;
        self
    }

    /// Set the live reload buffer size (builder).
    pub fn with_live_reload_capacity(mut self, capacity: usize) -> Self {
        self.live_reload_capacity = capacity;
        self
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Shared state of one application.
pub struct Application {
    config: AppConfig,
    registry: Arc<RouteRegistry>,
    metadata: Arc<dyn RouteMetadata>,
    live_reload: Option<Arc<LiveReloadChannel>>,
}

impl Application {
    /// Create an application reading routes declared through [`crate::Route`].
    pub fn new(config: AppConfig) -> Self {
        Self::with_metadata(config, Arc::new(DeclaredRoutes))
    }

    /// Create an application with a custom metadata provider.
    pub fn with_metadata(config: AppConfig, metadata: Arc<dyn RouteMetadata>) -> Self {
        let live_reload = (!config.production_mode)
            .then(|| Arc::new(LiveReloadChannel::new(config.live_reload_capacity)));
        debug!(
            application = %config.application_name,
            production = config.production_mode,
            "application created"
        );
        Self {
            config,
            registry: Arc::new(RouteRegistry::new()),
            metadata,
            live_reload,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The registry shared by every session.
    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    /// A router over the shared registry.
    pub fn router(&self) -> Router {
        Router::new(self.registry.clone())
    }

    /// A fresh navigation context for one session.
    pub fn create_ui(&self) -> Ui {
        Ui::new()
    }

    /// Whether live reload is active (not in production mode).
    pub fn is_live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }

    /// Connect a live reload client. `None` in production mode.
    pub fn subscribe_live_reload(&self) -> Option<broadcast::Receiver<ReloadSignal>> {
        self.live_reload.as_ref().map(|channel| channel.subscribe())
    }

    /// A reconciler for hot-swapped view types. `None` in production mode.
    pub fn reconciler(&self) -> Option<Reconciler> {
        let live_reload = self.live_reload.clone()?;
        Some(Reconciler::new(
            self.registry.clone(),
            self.metadata.clone(),
            live_reload as Arc<dyn LiveReload>,
        ))
    }

    /// Register the declared routes of `types` in one update.
    ///
    /// Types without a declaration are ignored. Every declaration is validated
    /// before anything is registered, so on error the registry is unchanged.
    /// Returns the number of routes registered.
    pub fn scan(&self, types: impl IntoIterator<Item = ViewType>) -> Result<usize, RouterError> {
        let entries = types
            .into_iter()
            .filter_map(|view_type| {
                let descriptor = self.metadata.route_for(&view_type)?;
                Some(RouteEntry::from_descriptor(view_type, descriptor))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = entries.len();
        self.registry.update(|routes| {
            for entry in entries {
                routes.set_entry(entry);
            }
        });
        info!(
            application = %self.config.application_name,
            routes = count,
            "registered declared routes"
        );
        Ok(count)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
