//! Development-mode hot reload: route reconciliation and client signalling.

pub mod live_reload;
pub mod metadata;
pub mod reconciler;

pub use live_reload::{DisabledLiveReload, LiveReload, LiveReloadChannel, ReloadSignal};
pub use metadata::{DeclaredRoutes, RouteMetadata, StaticRouteMetadata};
pub use reconciler::{Reconciler, ReloadSummary};
