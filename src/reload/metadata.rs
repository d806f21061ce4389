//! Route metadata providers: where a view type declares its route.

use std::any::TypeId;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::router::RouteDescriptor;
use crate::view::ViewType;

/// Supplies the declared route of a view type.
///
/// Returning `None` means the type is not navigable.
pub trait RouteMetadata: Send + Sync {
    /// The route `view_type` currently declares.
    fn route_for(&self, view_type: &ViewType) -> Option<RouteDescriptor>;
}

/// Reads declarations carried by [`ViewType::routed`] tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredRoutes;

impl RouteMetadata for DeclaredRoutes {
    fn route_for(&self, view_type: &ViewType) -> Option<RouteDescriptor> {
        view_type.declared_route()
    }
}

/// Explicit declarations, overriding whatever a tag carries.
///
/// Declarations can be changed at any time, which is how a class watcher
/// feeds recompiled route paths into the reconciler.
#[derive(Debug, Default)]
pub struct StaticRouteMetadata {
    routes: RwLock<HashMap<TypeId, RouteDescriptor>>,
}

impl StaticRouteMetadata {
    /// Create a provider with no explicit declarations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or re-declare) the route of `view_type`.
    pub fn declare(&self, view_type: &ViewType, descriptor: RouteDescriptor) {
        self.routes.write().insert(view_type.id(), descriptor);
    }

    /// Drop the explicit declaration of `view_type`.
    pub fn forget(&self, view_type: &ViewType) -> Option<RouteDescriptor> {
        self.routes.write().remove(&view_type.id())
    }
}

impl RouteMetadata for StaticRouteMetadata {
    fn route_for(&self, view_type: &ViewType) -> Option<RouteDescriptor> {
        self.routes
            .read()
            .get(&view_type.id())
            .cloned()
            .or_else(|| view_type.declared_route())
    }
}
