//! Explicit view type tags: identity, construction, child hosting.
//!
//! A [`ViewType`] pairs a [`TypeId`] with a constructor, so the router can
//! compare live instances against configured types and create new ones
//! without reflection. [`ParentViewType`] is only obtainable for types that
//! implement [`HasChildView`], which makes "can wrap a child" a property of the
//! tag rather than something discovered at render time.

use std::any::{self, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::traits::{HasChildView, View};
use crate::router::route::{Route, RouteDescriptor};
use crate::ui::ViewId;

/// Constructor stored in a [`ViewType`].
type Factory = dyn Fn() -> Result<Box<dyn View>, InstantiationError> + Send + Sync;

/// Hands `child` to a view known to implement [`HasChildView`].
pub(crate) type AttachFn = fn(&mut dyn View, ViewId);

// ---------------------------------------------------------------------------
// InstantiationError
// ---------------------------------------------------------------------------

/// A view constructor refused to produce an instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InstantiationError {
    message: String,
}

impl InstantiationError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The constructor's failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// ViewType
// ---------------------------------------------------------------------------

/// Type tag for a view: identity plus constructor.
///
/// Two tags are equal when they name the same concrete type, regardless of
/// how their constructors were supplied.
#[derive(Clone)]
pub struct ViewType {
    id: TypeId,
    name: &'static str,
    factory: Arc<Factory>,
    attach: Option<AttachFn>,
    declared: Option<fn() -> RouteDescriptor>,
}

impl ViewType {
    /// Tag for a view constructed with `T::default()`.
    pub fn of<T: View + Default>() -> Self {
        Self::with_factory(|| Ok(T::default()))
    }

    /// Tag for a view with a fallible constructor.
    pub fn with_factory<T, F>(factory: F) -> Self
    where
        T: View,
        F: Fn() -> Result<T, InstantiationError> + Send + Sync + 'static,
    {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            factory: Arc::new(move || factory().map(|view| Box::new(view) as Box<dyn View>)),
            attach: None,
            declared: None,
        }
    }

    /// Tag for a view that declares its own route through [`Route`].
    pub fn routed<T: Route>() -> Self {
        Self {
            declared: Some(T::route as fn() -> RouteDescriptor),
            ..Self::of::<T>()
        }
    }

    /// The concrete type's identity.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The concrete type's name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The route declared by the type, if it was tagged with [`ViewType::routed`].
    pub fn declared_route(&self) -> Option<RouteDescriptor> {
        self.declared.map(|declare| declare())
    }

    /// Whether `view` is an instance of this type.
    pub fn matches(&self, view: &dyn View) -> bool {
        view.as_any().type_id() == self.id
    }

    /// Construct a new instance.
    pub fn instantiate(&self) -> Result<Box<dyn View>, InstantiationError> {
        (self.factory)()
    }

    pub(crate) fn attach(&self) -> Option<AttachFn> {
        self.attach
    }
}

impl PartialEq for ViewType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ViewType {}

impl Hash for ViewType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewType").field(&self.name).finish()
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ---------------------------------------------------------------------------
// ParentViewType
// ---------------------------------------------------------------------------

/// Type tag for a view that can wrap a child.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ParentViewType(ViewType);

impl ParentViewType {
    /// Tag for a parent view constructed with `T::default()`.
    pub fn of<T: HasChildView + Default>() -> Self {
        Self::with_factory(|| Ok(T::default()))
    }

    /// Tag for a parent view with a fallible constructor.
    pub fn with_factory<T, F>(factory: F) -> Self
    where
        T: HasChildView,
        F: Fn() -> Result<T, InstantiationError> + Send + Sync + 'static,
    {
        let mut view_type = ViewType::with_factory(factory);
        view_type.attach = Some(attach_child::<T> as AttachFn);
        Self(view_type)
    }

    /// The underlying view type tag.
    pub fn view_type(&self) -> &ViewType {
        &self.0
    }

    /// The concrete type's identity.
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    /// The concrete type's name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.0.name
    }

    pub(crate) fn attach_fn(&self) -> AttachFn {
        // Set for every value built through the constructors above.
        self.0.attach.unwrap_or(attach_nothing)
    }
}

impl fmt::Debug for ParentViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParentViewType").field(&self.0.name).finish()
    }
}

impl From<ParentViewType> for ViewType {
    fn from(parent: ParentViewType) -> Self {
        parent.0
    }
}

pub(crate) fn attach_child<T: HasChildView>(view: &mut dyn View, child: ViewId) {
    if let Some(host) = view.as_any_mut().downcast_mut::<T>() {
        host.set_child_view(child);
    }
}

fn attach_nothing(_view: &mut dyn View, _child: ViewId) {}

// ===========================================================================
// Tests
// ===========================================================================
