//! # trellis
//!
//! Server-side view tree routing with hot reload.
//!
//! Application code declares which view type answers which URL path and which
//! parent layouts wrap it. trellis keeps those routes in a shared registry,
//! resolves navigations into chains of live view instances (reusing parents
//! that are already displayed), and applies recompiled view types to the
//! route table while the application keeps serving.
//!
//! ## Core Systems
//!
//! - **[`view`]**: the View trait, child hosting, explicit type tags
//! - **[`ui`]**: slotmap-backed view arena holding one session's active chain
//! - **[`router`]**: locations, parameters, the route registry, chain rendering
//! - **[`reload`]**: hot reload reconciliation and live reload signalling
//! - **[`style`]**: inline styles and CSS size helpers
//! - **[`app`]**: configuration and the per-application shared state
//! - **[`testing`]**: headless Pilot and text snapshot helpers

// Foundation
pub mod style;
pub mod view;

// Core systems
pub mod reload;
pub mod router;
pub mod ui;

// Application
pub mod app;
pub mod testing;

pub use app::{AppConfig, Application};
pub use router::{Location, Route, RouteDescriptor, RouteRegistry, Router};
pub use ui::{Ui, ViewId};
pub use view::{HasChildView, ParentViewType, View, ViewType};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use trellis_macros::Route;
