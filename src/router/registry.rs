//! Route registry: path → view mapping shared between navigation and hot reload.
//!
//! [`RouteRegistry`] publishes immutable [`RouteConfiguration`] snapshots.
//! Readers load the current snapshot without locking; writers serialize on a
//! mutex, apply any number of changes to a private copy through
//! [`RouteUpdate`], and publish the result in one atomic swap. A reader thus
//! sees a rename either not at all or completely.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, warn};

use super::location::{normalize_path, Location};
use super::parameters::{self, ParameterSegment, RouteParameters};
use super::renderer::ViewRenderer;
use super::route::RouteDescriptor;
use super::RouterError;
use crate::view::{ParentViewType, ViewType};

// ---------------------------------------------------------------------------
// RouteEntry
// ---------------------------------------------------------------------------

/// One registered route: path, target chain, parameter layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    path: String,
    renderer: ViewRenderer,
    parameters: Vec<ParameterSegment>,
}

impl RouteEntry {
    /// Build an entry, validating the view chain and parameter layout.
    pub fn new(
        path: impl AsRef<str>,
        target: ViewType,
        parents: Vec<ParentViewType>,
        parameters: Vec<ParameterSegment>,
    ) -> Result<Self, RouterError> {
        let path = normalize_path(path.as_ref());
        parameters::validate_layout(&path, &parameters)?;
        Ok(Self {
            renderer: ViewRenderer::new(target, parents)?,
            path,
            parameters,
        })
    }

    /// Build an entry for `target` from its declared route.
    pub fn from_descriptor(target: ViewType, descriptor: RouteDescriptor) -> Result<Self, RouterError> {
        let (path, parents, parameters) = descriptor.into_parts();
        Self::new(path, target, parents, parameters)
    }

    /// The normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The view displayed for this route.
    pub fn target(&self) -> &ViewType {
        self.renderer.view_type()
    }

    /// Parent view types, immediate parent first.
    pub fn parents(&self) -> &[ParentViewType] {
        self.renderer.parent_types()
    }

    /// The parameter layout.
    pub fn parameters(&self) -> &[ParameterSegment] {
        &self.parameters
    }

    /// The renderer that displays this route.
    pub fn renderer(&self) -> &ViewRenderer {
        &self.renderer
    }
}

/// A resolved location: the matching entry and its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The matching route.
    pub entry: RouteEntry,
    /// Values bound from the location's trailing segments.
    pub parameters: RouteParameters,
}

// ---------------------------------------------------------------------------
// RouteConfiguration
// ---------------------------------------------------------------------------

/// An immutable view of the registered routes.
#[derive(Debug, Clone, Default)]
pub struct RouteConfiguration {
    routes: BTreeMap<String, RouteEntry>,
    targets: HashMap<TypeId, BTreeSet<String>>,
}

impl RouteConfiguration {
    /// Whether a route is registered at `path`.
    pub fn has_route(&self, path: &str) -> bool {
        self.routes.contains_key(&normalize_path(path))
    }

    /// The entry registered at `path`.
    pub fn get_route(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.get(&normalize_path(path))
    }

    /// Paths currently targeting `view_type`, sorted.
    pub fn routes_for(&self, view_type: &ViewType) -> Vec<String> {
        self.targets
            .get(&view_type.id())
            .map(|paths| paths.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All entries, sorted by path.
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the route for `location`.
    ///
    /// Tries the longest literal prefix of the location first; a prefix
    /// matches when its parameter layout accepts the remaining segments.
    pub fn resolve(&self, location: &Location) -> Option<RouteMatch> {
        let segments = location.segments();
        (0..=segments.len()).rev().find_map(|split| {
            let entry = self.routes.get(&segments[..split].join("/"))?;
            let parameters = parameters::bind(&entry.parameters, &segments[split..])?;
            Some(RouteMatch {
                entry: entry.clone(),
                parameters,
            })
        })
    }

    fn insert(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        let path = entry.path.clone();
        let target = entry.target().id();
        let previous = self.routes.insert(path.clone(), entry);
        if let Some(old) = &previous {
            if old.target().id() != target {
                self.unindex(old.target().id(), &path);
            }
        }
        self.targets.entry(target).or_default().insert(path);
        previous
    }

    fn remove(&mut self, path: &str) -> Option<RouteEntry> {
        let removed = self.routes.remove(path)?;
        self.unindex(removed.target().id(), path);
        Some(removed)
    }

    fn unindex(&mut self, target: TypeId, path: &str) {
        if let Some(paths) = self.targets.get_mut(&target) {
            paths.remove(path);
            if paths.is_empty() {
                self.targets.remove(&target);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// RoutesChangedEvent
// ---------------------------------------------------------------------------

/// Net effect of one published update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutesChangedEvent {
    /// Paths that were registered or re-targeted.
    pub added: Vec<String>,
    /// Paths that no longer resolve.
    pub removed: Vec<String>,
}

impl RoutesChangedEvent {
    /// Whether the update changed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// The net difference from `before` to `after`.
    pub fn between(before: &RouteConfiguration, after: &RouteConfiguration) -> Self {
        let added = after
            .routes
            .iter()
            .filter(|&(path, entry)| before.routes.get(path) != Some(entry))
            .map(|(path, _)| path.clone())
            .collect();
        let removed = before
            .routes
            .keys()
            .filter(|&path| !after.routes.contains_key(path))
            .cloned()
            .collect();
        Self { added, removed }
    }
}

// ---------------------------------------------------------------------------
// RouteUpdate
// ---------------------------------------------------------------------------

/// Mutable access to a private copy of the configuration inside
/// [`RouteRegistry::update`]. Dereferences to [`RouteConfiguration`] for reads.
pub struct RouteUpdate<'a> {
    before: &'a RouteConfiguration,
    config: &'a mut RouteConfiguration,
}

impl RouteUpdate<'_> {
    /// Net changes made so far in this update.
    pub fn changes(&self) -> RoutesChangedEvent {
        RoutesChangedEvent::between(self.before, self.config)
    }

    /// Register `target` at `path`, replacing any entry there.
    pub fn set_route(
        &mut self,
        path: impl AsRef<str>,
        target: ViewType,
        parameters: Vec<ParameterSegment>,
    ) -> Result<Option<RouteEntry>, RouterError> {
        let entry = RouteEntry::new(path, target, Vec::new(), parameters)?;
        Ok(self.set_entry(entry))
    }

    /// Register a prebuilt entry, replacing any entry at its path.
    pub fn set_entry(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        let path = entry.path.clone();
        let view = entry.target().name();
        let previous = self.config.insert(entry);
        match &previous {
            Some(old) if old.target().name() != view => warn!(
                path = %path,
                previous = old.target().name(),
                view,
                "route path re-registered for a different view; last registration wins"
            ),
            _ => debug!(path = %path, view, "route registered"),
        }
        previous
    }

    /// Remove the entry at `path`.
    pub fn remove_route(&mut self, path: &str) -> Option<RouteEntry> {
        let path = normalize_path(path);
        let removed = self.config.remove(&path)?;
        debug!(path = %path, view = removed.target().name(), "route removed");
        Some(removed)
    }

    /// Remove every entry targeting `view_type`. Returns the removed paths.
    pub fn remove_routes_for(&mut self, view_type: &ViewType) -> Vec<String> {
        let paths = self.config.routes_for(view_type);
        for path in &paths {
            self.remove_route(path);
        }
        paths
    }
}

impl Deref for RouteUpdate<'_> {
    type Target = RouteConfiguration;

    fn deref(&self) -> &Self::Target {
        self.config
    }
}

// ---------------------------------------------------------------------------
// RouteRegistry
// ---------------------------------------------------------------------------

type Listener = Arc<dyn Fn(&RoutesChangedEvent) + Send + Sync>;

/// Handle returned by [`RouteRegistry::add_routes_changed_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Shared, thread-safe route table for one application.
///
/// Listeners are called in publish order. Delivery holds a reentrant lock, so
/// a listener may update the registry from the same thread; the nested
/// event is delivered before the outer delivery resumes.
pub struct RouteRegistry {
    current: ArcSwap<RouteConfiguration>,
    writer: Mutex<()>,
    delivery: ReentrantMutex<()>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RouteConfiguration::default()),
            writer: Mutex::new(()),
            delivery: ReentrantMutex::new(()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// The current snapshot. Later updates do not affect it.
    pub fn configuration(&self) -> Arc<RouteConfiguration> {
        self.current.load_full()
    }

    /// Apply several changes as one atomic publish.
    ///
    /// Writers are serialized; readers keep seeing the previous snapshot until
    /// `f` returns. Listeners are notified afterwards if anything changed.
    pub fn update<R>(&self, f: impl FnOnce(&mut RouteUpdate<'_>) -> R) -> R {
        let (result, event, _delivery) = {
            let _guard = self.writer.lock();
            let before = self.current.load_full();
            let mut config = RouteConfiguration::clone(&before);
            let result = f(&mut RouteUpdate {
                before: &before,
                config: &mut config,
            });
            let event = RoutesChangedEvent::between(&before, &config);
            if !event.is_empty() {
                self.current.store(Arc::new(config));
            }
            // Taken before the writer lock is released: the next publish
            // cannot deliver ahead of this one.
            (result, event, self.delivery.lock())
        };

        if !event.is_empty() {
            let listeners: Vec<Listener> = self
                .listeners
                .lock()
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(&event);
            }
        }
        result
    }

    /// Register `target` at `path`, replacing any entry there.
    pub fn set_route(
        &self,
        path: impl AsRef<str>,
        target: ViewType,
        parameters: Vec<ParameterSegment>,
    ) -> Result<(), RouterError> {
        let entry = RouteEntry::new(path, target, Vec::new(), parameters)?;
        self.set_entry(entry);
        Ok(())
    }

    /// Register a prebuilt entry, replacing any entry at its path.
    pub fn set_entry(&self, entry: RouteEntry) {
        self.update(|routes| {
            routes.set_entry(entry);
        });
    }

    /// Remove the entry at `path`. Returns whether one existed.
    pub fn remove_route(&self, path: &str) -> bool {
        self.update(|routes| routes.remove_route(path).is_some())
    }

    /// Remove every entry targeting `view_type`. Returns the removed paths.
    pub fn remove_routes_for(&self, view_type: &ViewType) -> Vec<String> {
        self.update(|routes| routes.remove_routes_for(view_type))
    }

    /// Whether a route is registered at `path`.
    pub fn has_route(&self, path: &str) -> bool {
        self.current.load().has_route(path)
    }

    /// The entry registered at `path`.
    pub fn get_route(&self, path: &str) -> Option<RouteEntry> {
        self.current.load().get_route(path).cloned()
    }

    /// Paths currently targeting `view_type`.
    pub fn routes_for(&self, view_type: &ViewType) -> Vec<String> {
        self.current.load().routes_for(view_type)
    }

    /// Find the route for `location` in the current snapshot.
    pub fn resolve(&self, location: &Location) -> Option<RouteMatch> {
        self.current.load().resolve(location)
    }

    /// Call `listener` after every update that changed the table.
    pub fn add_routes_changed_listener(
        &self,
        listener: impl Fn(&RoutesChangedEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Stop notifying a listener. Returns whether it was registered.
    pub fn remove_routes_changed_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl Default for RouteRegistry {
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
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ui::ViewId;
    use crate::view::{HasChildView, View};

    macro_rules! test_view {
        ($name:ident) => {
            #[derive(Default)]
            struct $name;

            impl View for $name {
                fn as_any(&self) -> &dyn Any {
                    self
                }
                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }
            }

            impl HasChildView for $name {
                fn set_child_view(&mut self, _child: ViewId) {}
            }
        };
    }

    test_view!(Home);
    test_view!(Users);
    test_view!(Layout);

    #[test]
    fn set_route_is_visible_immediately() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        assert!(registry.has_route("a"));
        assert!(registry.has_route("/a/"));
        assert_eq!(registry.get_route("a").unwrap().target(), &ViewType::of::<Home>());
        assert_eq!(registry.routes_for(&ViewType::of::<Home>()), vec!["a".to_owned()]);
    }

    #[test]
    fn missing_route_is_absent() {
        let registry = RouteRegistry::new();
        assert!(!registry.has_route("nope"));
        assert!(registry.get_route("nope").is_none());
        assert!(!registry.remove_route("nope"));
    }

    #[test]
    fn remove_route_deletes_entry() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        assert!(registry.remove_route("a"));
        assert!(!registry.has_route("a"));
        assert!(registry.routes_for(&ViewType::of::<Home>()).is_empty());
    }

    #[test]
    fn same_path_last_write_wins() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        registry
            .set_route("a", ViewType::of::<Users>(), Vec::new())
            .unwrap();

        assert_eq!(registry.get_route("a").unwrap().target(), &ViewType::of::<Users>());
        assert!(registry.routes_for(&ViewType::of::<Home>()).is_empty());
        assert_eq!(registry.configuration().len(), 1);
    }

    #[test]
    fn remove_routes_for_removes_all_paths_of_target() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        registry
            .set_route("home", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        registry
            .set_route("users", ViewType::of::<Users>(), Vec::new())
            .unwrap();

        let removed = registry.remove_routes_for(&ViewType::of::<Home>());

        assert_eq!(removed, vec!["a".to_owned(), "home".to_owned()]);
        assert!(!registry.has_route("a"));
        assert!(!registry.has_route("home"));
        assert!(registry.has_route("users"));
    }

    #[test]
    fn snapshot_is_not_affected_by_later_updates() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        let snapshot = registry.configuration();

        registry.remove_route("a");

        assert!(snapshot.has_route("a"));
        assert!(!registry.has_route("a"));
    }

    #[test]
    fn duplicate_parent_rejected_at_entry_build() {
        let err = RouteEntry::new(
            "x",
            ViewType::of::<Home>(),
            vec![ParentViewType::of::<Layout>(), ParentViewType::of::<Layout>()],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RouterError::DuplicateViewType { .. }));
    }

    #[test]
    fn invalid_parameters_rejected_by_set_route() {
        let registry = RouteRegistry::new();
        let result = registry.set_route(
            "x",
            ViewType::of::<Home>(),
            vec![ParameterSegment::wildcard("a"), ParameterSegment::required("b")],
        );
        assert!(matches!(result, Err(RouterError::InvalidParameters { .. })));
        assert!(!registry.has_route("x"));
    }

    #[test]
    fn resolve_prefers_longest_literal_prefix() {
        let registry = RouteRegistry::new();
        registry
            .set_route("users", ViewType::of::<Users>(), vec![ParameterSegment::required("id")])
            .unwrap();
        registry
            .set_route("users/new", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        let matched = registry.resolve(&Location::new("users/new")).unwrap();
        assert_eq!(matched.entry.path(), "users/new");

        let matched = registry.resolve(&Location::new("users/42")).unwrap();
        assert_eq!(matched.entry.path(), "users");
        assert_eq!(matched.parameters.get("id"), Some("42"));

        assert!(registry.resolve(&Location::new("users")).is_none());
        assert!(registry.resolve(&Location::new("users/1/2")).is_none());
    }

    #[test]
    fn resolve_root_route() {
        let registry = RouteRegistry::new();
        registry
            .set_route("", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        let matched = registry.resolve(&Location::new("/")).unwrap();
        assert_eq!(matched.entry.path(), "");
        assert!(registry.resolve(&Location::new("other")).is_none());
    }

    #[test]
    fn update_publishes_rename_atomically() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        registry.add_routes_changed_listener(move |event| sink.lock().push(event.clone()));

        registry.update(|routes| {
            routes.remove_route("a");
            assert!(!routes.has_route("a"));
            routes
                .set_route("aa", ViewType::of::<Home>(), Vec::new())
                .unwrap();
        });

        assert!(!registry.has_route("a"));
        assert!(registry.has_route("aa"));
        assert_eq!(
            *events.lock(),
            vec![RoutesChangedEvent {
                added: vec!["aa".to_owned()],
                removed: vec!["a".to_owned()],
            }]
        );
    }

    #[test]
    fn no_op_update_does_not_notify() {
        let registry = RouteRegistry::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        registry.add_routes_changed_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        registry.remove_route("missing");
        registry.update(|_| ());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let registry = RouteRegistry::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        let id = registry.add_routes_changed_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.remove_routes_changed_listener(id));
        assert!(!registry.remove_routes_changed_listener(id));
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn add_then_remove_in_one_update_nets_out() {
        let registry = RouteRegistry::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        registry.add_routes_changed_listener(move |event| sink.lock().push(event.clone()));

        registry.update(|routes| {
            routes
                .set_route("tmp", ViewType::of::<Home>(), Vec::new())
                .unwrap();
            routes.remove_route("tmp");
        });

        assert!(!registry.has_route("tmp"));
        assert!(events.lock().is_empty());
    }

    #[test]
    fn readers_never_observe_half_applied_rename() {
        let registry = Arc::new(RouteRegistry::new());
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        let writer = {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let (from, to) = if i % 2 == 0 { ("a", "aa") } else { ("aa", "a") };
                    registry.update(|routes| {
                        routes.remove_route(from);
                        routes
                            .set_route(to, ViewType::of::<Home>(), Vec::new())
                            .unwrap();
                    });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..2_000 {
                        let snapshot = registry.configuration();
                        let old = snapshot.has_route("a");
                        let new = snapshot.has_route("aa");
                        assert!(old ^ new, "observed a={old} aa={new}");
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[test]
    fn changes_report_net_effect_so_far() {
        let registry = RouteRegistry::new();
        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        let changes = registry.update(|routes| {
            routes.remove_route("a");
            routes
                .set_route("b", ViewType::of::<Home>(), Vec::new())
                .unwrap();
            routes
                .set_route("a", ViewType::of::<Home>(), Vec::new())
                .unwrap();
            routes.changes()
        });

        assert_eq!(changes.added, vec!["b".to_owned()]);
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn listeners_receive_events_in_publish_order() {
        let registry = Arc::new(RouteRegistry::new());
        let published = Arc::new(AtomicU64::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        registry.add_routes_changed_listener(move |event| {
            sink.lock().extend(event.added.iter().cloned());
        });

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                let published = published.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        registry.update(|routes| {
                            // Numbered under the writer lock, so in publish order.
                            let n = published.fetch_add(1, Ordering::SeqCst);
                            routes
                                .set_route(format!("r{n:04}"), ViewType::of::<Home>(), Vec::new())
                                .unwrap();
                        });
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let received = received.lock().clone();
        let mut sorted = received.clone();
        sorted.sort();
        assert_eq!(received.len(), 400);
        assert_eq!(received, sorted);
    }

    #[test]
    fn listener_may_update_registry() {
        let registry = Arc::new(RouteRegistry::new());
        let inner = Arc::downgrade(&registry);
        registry.add_routes_changed_listener(move |event| {
            if event.added.iter().any(|path| path == "a") {
                if let Some(registry) = inner.upgrade() {
                    registry
                        .set_route("mirror", ViewType::of::<Users>(), Vec::new())
                        .unwrap();
                }
            }
        });

        registry
            .set_route("a", ViewType::of::<Home>(), Vec::new())
            .unwrap();

        assert!(registry.has_route("mirror"));
    }
}
