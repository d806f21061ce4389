//! Hot reload reconciliation: apply recompiled view types to the route table.
//!
//! An external class watcher reports which view types were added (or
//! changed) and which were deleted. [`Reconciler::reload`] updates the
//! registry in one atomic publish and only then signals connected clients,
//! so a client reloading immediately sees the new routes.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::live_reload::LiveReload;
use super::metadata::RouteMetadata;
use crate::router::{RouteEntry, RouteRegistry};
use crate::view::ViewType;

/// What one reconciliation changed. Lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Paths registered or re-targeted.
    pub added: Vec<String>,
    /// Paths that no longer resolve.
    pub removed: Vec<String>,
    /// Types that were reported but could not be applied.
    pub skipped: Vec<&'static str>,
}

/// An added type's declaration, read before the registry is locked.
enum Declaration {
    Entry(RouteEntry),
    Undeclared,
    Invalid,
}

/// Applies hot-swapped view types to a route registry.
pub struct Reconciler {
    registry: Arc<RouteRegistry>,
    metadata: Arc<dyn RouteMetadata>,
    live_reload: Arc<dyn LiveReload>,
}

impl Reconciler {
    /// Create a reconciler.
    pub fn new(
        registry: Arc<RouteRegistry>,
        metadata: Arc<dyn RouteMetadata>,
        live_reload: Arc<dyn LiveReload>,
    ) -> Self {
        Self {
            registry,
            metadata,
            live_reload,
        }
    }

    /// Reconcile the registry with `added` and `removed` view types, then
    /// signal a reload exactly once.
    ///
    /// - Routes of removed types are deleted.
    /// - Added types are registered at their currently declared path; any
    ///   other path the type owned is removed in the same update.
    /// - Added types that no longer declare a route lose their routes.
    /// - A type in both sets is treated as removed.
    /// - Added types are applied in type name order, so when two of them
    ///   declare the same path the one whose name sorts last wins.
    pub fn reload(&self, added: &HashSet<ViewType>, removed: &HashSet<ViewType>) -> ReloadSummary {
        let mut skipped = Vec::new();
        let mut declarations = Vec::with_capacity(added.len());
        for view_type in added {
            if removed.contains(view_type) {
                warn!(view = view_type.name(), "view reported as both added and removed; removing");
                skipped.push(view_type.name());
                continue;
            }
            let declaration = match self.metadata.route_for(view_type) {
                None => Declaration::Undeclared,
                Some(descriptor) => {
                    match RouteEntry::from_descriptor(view_type.clone(), descriptor) {
                        Ok(entry) => Declaration::Entry(entry),
                        Err(err) => {
                            error!(view = view_type.name(), error = %err, "invalid route declaration");
                            skipped.push(view_type.name());
                            Declaration::Invalid
                        }
                    }
                }
            };
            declarations.push((view_type, declaration));
        }
        declarations.sort_by_key(|(view_type, _)| view_type.name());

        let changes = self.registry.update(|routes| {
            for view_type in removed {
                routes.remove_routes_for(view_type);
            }

            for (view_type, declaration) in declarations {
                match declaration {
                    Declaration::Entry(entry) => {
                        for stale in routes.routes_for(view_type) {
                            if stale != entry.path() {
                                routes.remove_route(&stale);
                            }
                        }
                        routes.set_entry(entry);
                    }
                    Declaration::Undeclared => {
                        let paths = routes.remove_routes_for(view_type);
                        if !paths.is_empty() {
                            debug!(view = view_type.name(), ?paths, "view no longer declares a route");
                        }
                    }
                    Declaration::Invalid => {}
                }
            }

            routes.changes()
        });

        skipped.sort_unstable();
        let summary = ReloadSummary {
            added: changes.added,
            removed: changes.removed,
            skipped,
        };

        info!(
            added = summary.added.len(),
            removed = summary.removed.len(),
            skipped = summary.skipped.len(),
            "hot reload reconciled routes"
        );
        self.live_reload.reload();
        summary
    }
}

// ===========================================================================
// Tests
// ===========================================================================
