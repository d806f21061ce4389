//! View traits: location notification, child hosting, detach.
//!
//! [`View`] is the core abstraction for anything the router can display. A
//! view that wraps other views (a layout, a frame with a menu) additionally
//! implements [`HasChildView`] so the navigation context can hand it the
//! inner view of the chain.

use std::any::Any;

use crate::router::location::Location;
use crate::router::parameters::RouteParameters;
use crate::ui::ViewId;

// ---------------------------------------------------------------------------
// LocationChangeEvent
// ---------------------------------------------------------------------------

/// Delivered to every view in a resolved chain before it is displayed.
#[derive(Debug, Clone, Copy)]
pub struct LocationChangeEvent<'a> {
    /// The location being navigated to.
    pub location: &'a Location,
    /// Parameter values bound from the location's trailing segments.
    pub parameters: &'a RouteParameters,
}

impl<'a> LocationChangeEvent<'a> {
    /// Create a new event.
    pub fn new(location: &'a Location, parameters: &'a RouteParameters) -> Self {
        Self {
            location,
            parameters,
        }
    }
}

// ---------------------------------------------------------------------------
// View trait
// ---------------------------------------------------------------------------

/// Core trait implemented by every routable view.
///
/// View is object-safe: the navigation context stores instances as
/// `Box<dyn View>` and only recovers the concrete type through `as_any`.
pub trait View: 'static {
    /// Called when the view becomes part of a navigation's resolved chain.
    ///
    /// Reused views are notified on every navigation they take part in. The
    /// leaf is always notified before its parents.
    fn on_location_change(&mut self, _event: &LocationChangeEvent<'_>) {}

    /// Called once when the navigation context releases this instance.
    fn on_detach(&mut self) {}

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// HasChildView
// ---------------------------------------------------------------------------

/// A view that can wrap another view of the chain.
///
/// Only types implementing this trait can be used as parent views; see
/// [`ParentViewType`](crate::view::ParentViewType).
pub trait HasChildView: View {
    /// Replace the wrapped child with `child`.
    fn set_child_view(&mut self, child: ViewId);
}

// ===========================================================================
// Tests
// ===========================================================================
