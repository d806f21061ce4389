//! Navigation context: view instance arena and the active view chain.
//!
//! [`Ui`] owns every view instance of one browsing session in a slotmap arena.
//! The active chain lists the displayed views from the leaf outwards; it is
//! replaced as a whole by [`Ui::show_view`], which releases instances that are
//! not part of the new chain.

use std::any::TypeId;
use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::router::location::Location;
use crate::view::view_type::{attach_child, AttachFn};
use crate::view::{HasChildView, InstantiationError, View, ViewType};

new_key_type! {
    /// Unique identifier for a view instance owned by a [`Ui`].
    pub struct ViewId;
}

/// One live view instance and the tag it was created under.
struct ViewSlot {
    type_id: TypeId,
    type_name: &'static str,
    attach: Option<AttachFn>,
    view: Box<dyn View>,
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// Per-session navigation context.
///
/// All instances live in a single `SlotMap`. The active chain holds ids
/// ordered from the leaf view to the outermost parent.
pub struct Ui {
    views: SlotMap<ViewId, ViewSlot>,
    chain: Vec<ViewId>,
    location: Option<Location>,
}

impl Ui {
    /// Create a context with no views.
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            chain: Vec::new(),
            location: None,
        }
    }

    /// Adopt an existing view instance. It is not displayed until it is
    /// passed to [`show_view`](Self::show_view).
    pub fn insert<T: View>(&mut self, view: T) -> ViewId {
        self.insert_slot(ViewSlot {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            attach: None,
            view: Box::new(view),
        })
    }

    /// Adopt an existing view instance that can wrap a child.
    pub fn insert_parent<T: HasChildView>(&mut self, view: T) -> ViewId {
        let id = self.insert(view);
        self.bind_host(id, attach_child::<T>);
        id
    }

    /// Construct a new instance of `view_type` and adopt it.
    pub fn instantiate(&mut self, view_type: &ViewType) -> Result<ViewId, InstantiationError> {
        let view = view_type.instantiate()?;
        let id = self.insert_slot(ViewSlot {
            type_id: view_type.id(),
            type_name: view_type.name(),
            attach: view_type.attach(),
            view,
        });
        debug!(view = view_type.name(), ?id, "instantiated view");
        Ok(id)
    }

    fn insert_slot(&mut self, slot: ViewSlot) -> ViewId {
        self.views.insert(slot)
    }

    /// Drop an instance that is not part of the active chain.
    ///
    /// Returns `false` if the id is unknown or currently displayed.
    pub fn discard(&mut self, id: ViewId) -> bool {
        if self.chain.contains(&id) {
            return false;
        }
        self.views.remove(id).is_some()
    }

    /// The displayed chain, leaf first.
    pub fn active_chain(&self) -> &[ViewId] {
        &self.chain
    }

    /// The displayed leaf view, if any.
    pub fn active_view(&self) -> Option<ViewId> {
        self.chain.first().copied()
    }

    /// Replace the active chain with `leaf` wrapped by `parents`.
    ///
    /// `parents` starts with the view immediately wrapping `leaf`. Each parent
    /// receives the next-inner view through [`HasChildView::set_child_view`].
    /// Instances of the previous chain that are not part of the new one are
    /// detached and dropped.
    pub fn show_view(&mut self, leaf: ViewId, parents: Vec<ViewId>) {
        let mut child = leaf;
        for &parent in &parents {
            match self.views.get_mut(parent) {
                Some(slot) => match slot.attach {
                    Some(attach) => attach(&mut *slot.view, child),
                    None => warn!(view = slot.type_name, "parent view cannot host a child"),
                },
                None => warn!(?parent, "unknown parent view id"),
            }
            child = parent;
        }

        let mut next = Vec::with_capacity(parents.len() + 1);
        next.push(leaf);
        next.extend(parents);

        let kept: HashSet<ViewId> = next.iter().copied().collect();
        let previous = std::mem::replace(&mut self.chain, next);
        for id in previous {
            if kept.contains(&id) {
                continue;
            }
            if let Some(mut slot) = self.views.remove(id) {
                slot.view.on_detach();
                debug!(view = slot.type_name, ?id, "released view");
            }
        }
    }

    /// Immutable access to a view.
    pub fn view(&self, id: ViewId) -> Option<&dyn View> {
        self.views.get(id).map(|slot| &*slot.view)
    }

    /// Mutable access to a view.
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut dyn View> {
        match self.views.get_mut(id) {
            Some(slot) => Some(&mut *slot.view),
            None => None,
        }
    }

    /// Access a view as its concrete type.
    pub fn downcast<T: View>(&self, id: ViewId) -> Option<&T> {
        self.view(id)?.as_any().downcast_ref::<T>()
    }

    /// Mutable access to a view as its concrete type.
    pub fn downcast_mut<T: View>(&mut self, id: ViewId) -> Option<&mut T> {
        self.view_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// The type identity a view was registered under.
    pub fn view_type_id(&self, id: ViewId) -> Option<TypeId> {
        self.views.get(id).map(|slot| slot.type_id)
    }

    /// The type name a view was registered under.
    pub fn view_type_name(&self, id: ViewId) -> Option<&'static str> {
        self.views.get(id).map(|slot| slot.type_name)
    }

    pub(crate) fn bind_host(&mut self, id: ViewId, attach: AttachFn) {
        if let Some(slot) = self.views.get_mut(id) {
            slot.attach = Some(attach);
        }
    }

    /// The location of the last completed navigation.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Whether the context owns a view with the given id.
    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Number of view instances owned by the context.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the context owns no views.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl Default for Ui {
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
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct Page {
        detached: Option<Arc<AtomicUsize>>,
    }

    impl View for Page {
        fn on_detach(&mut self) {
            if let Some(counter) = &self.detached {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct Frame {
        child: Option<ViewId>,
    }

    impl View for Frame {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl HasChildView for Frame {
        fn set_child_view(&mut self, child: ViewId) {
            self.child = Some(child);
        }
    }

    #[test]
    fn new_ui_is_empty() {
        let ui = Ui::new();
        assert!(ui.is_empty());
        assert!(ui.active_chain().is_empty());
        assert!(ui.active_view().is_none());
        assert!(ui.location().is_none());
    }

    #[test]
    fn insert_records_type() {
        let mut ui = Ui::new();
        let id = ui.insert(Page::default());
        assert_eq!(ui.view_type_id(id), Some(TypeId::of::<Page>()));
        assert!(ui.view_type_name(id).unwrap().ends_with("Page"));
        assert!(ui.downcast::<Page>(id).is_some());
        assert!(ui.downcast::<Frame>(id).is_none());
    }

    #[test]
    fn show_view_sets_chain_and_children() {
        let mut ui = Ui::new();
        let leaf = ui.insert(Page::default());
        let inner = ui.insert_parent(Frame::default());

        ui.show_view(leaf, vec![inner]);

        assert_eq!(ui.active_chain(), &[leaf, inner]);
        assert_eq!(ui.active_view(), Some(leaf));
        assert_eq!(ui.downcast::<Frame>(inner).unwrap().child, Some(leaf));
    }

    #[test]
    fn show_view_releases_views_not_reused() {
        let detached = Arc::new(AtomicUsize::new(0));
        let mut ui = Ui::new();
        let old = ui.insert(Page {
            detached: Some(detached.clone()),
        });
        let frame = ui.insert_parent(Frame::default());
        ui.show_view(old, vec![frame]);

        let new_leaf = ui.insert(Page::default());
        ui.show_view(new_leaf, vec![frame]);

        assert!(!ui.contains(old));
        assert!(ui.contains(frame));
        assert_eq!(ui.len(), 2);
        assert_eq!(detached.load(Ordering::SeqCst), 1);
        assert_eq!(ui.downcast::<Frame>(frame).unwrap().child, Some(new_leaf));
    }

    #[test]
    fn instantiated_parent_can_host() {
        let mut ui = Ui::new();
        let parent_type = crate::view::ParentViewType::of::<Frame>();
        let frame = ui.instantiate(parent_type.view_type()).unwrap();
        let leaf = ui.insert(Page::default());

        ui.show_view(leaf, vec![frame]);

        assert_eq!(ui.downcast::<Frame>(frame).unwrap().child, Some(leaf));
    }

    #[test]
    fn discard_refuses_active_views() {
        let mut ui = Ui::new();
        let shown = ui.insert(Page::default());
        let spare = ui.insert(Page::default());
        ui.show_view(shown, Vec::new());

        assert!(!ui.discard(shown));
        assert!(ui.discard(spare));
        assert!(!ui.discard(spare));
        assert_eq!(ui.len(), 1);
    }

    #[test]
    fn downcast_mut_allows_mutation() {
        let mut ui = Ui::new();
        let frame = ui.insert_parent(Frame::default());
        let leaf = ui.insert(Page::default());
        ui.downcast_mut::<Frame>(frame).unwrap().child = Some(leaf);
        assert_eq!(ui.downcast::<Frame>(frame).unwrap().child, Some(leaf));
    }
}
