//! Route declarations: [`RouteDescriptor`] and the [`Route`] trait.
//!
//! A descriptor is the structured form of "this view is navigable at this
//! path, inside these layouts, with these parameters". Views either implement
//! [`Route`] (usually through `#[derive(Route)]`) or have their descriptor
//! supplied by a [`RouteMetadata`](crate::reload::RouteMetadata) provider.

use super::location::normalize_path;
use super::parameters::ParameterSegment;
use crate::view::{ParentViewType, View};

/// Declared route of a view type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    path: String,
    parents: Vec<ParentViewType>,
    parameters: Vec<ParameterSegment>,
}

impl RouteDescriptor {
    /// Declare a route at `path` with no layouts or parameters.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            parents: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Wrap the view in `parent` (builder). The first parent added is the
    /// one immediately around the view.
    pub fn with_parent(mut self, parent: ParentViewType) -> Self {
        self.parents.push(parent);
        self
    }

    /// Append a parameter segment (builder).
    pub fn with_parameter(mut self, parameter: ParameterSegment) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// The normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parent view types, immediate parent first.
    pub fn parents(&self) -> &[ParentViewType] {
        &self.parents
    }

    /// Parameter layout.
    pub fn parameters(&self) -> &[ParameterSegment] {
        &self.parameters
    }

    pub(crate) fn into_parts(self) -> (String, Vec<ParentViewType>, Vec<ParameterSegment>) {
        (self.path, self.parents, self.parameters)
    }
}

/// A view that declares its own route.
///
/// Tag such types with [`ViewType::routed`](crate::view::ViewType::routed) so
/// the declaration travels with the type.
pub trait Route: View + Default {
    /// The route this view is navigable at.
    fn route() -> RouteDescriptor;
}
