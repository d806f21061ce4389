//! View renderer: resolve a view chain for a navigation, reusing live instances.
//!
//! A [`ViewRenderer`] is configured with a leaf view type and the parent view
//! types wrapping it. On every navigation it looks at the context's active
//! chain, keeps instances whose exact type is still wanted, creates the rest,
//! notifies the whole chain of the new location (leaf first), and hands the
//! chain to [`Ui::show_view`].

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::location::Location;
use super::parameters::RouteParameters;
use super::{NavigationError, RouterError};
use crate::ui::{Ui, ViewId};
use crate::view::{LocationChangeEvent, ParentViewType, ViewType};

// ---------------------------------------------------------------------------
// NavigationEvent / NavigationOutcome
// ---------------------------------------------------------------------------

/// A navigation to be handled against a [`Ui`].
#[derive(Debug, Clone, Copy)]
pub struct NavigationEvent<'a> {
    /// Where the navigation goes.
    pub location: &'a Location,
    /// Parameters bound from the location.
    pub parameters: &'a RouteParameters,
}

impl<'a> NavigationEvent<'a> {
    /// Create a new event.
    pub fn new(location: &'a Location, parameters: &'a RouteParameters) -> Self {
        Self {
            location,
            parameters,
        }
    }
}

/// The chain a navigation displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// The displayed leaf view.
    pub view: ViewId,
    /// Displayed parents, immediate parent first.
    pub parents: Vec<ViewId>,
    /// Instances constructed by this navigation.
    pub created: Vec<ViewId>,
    /// Instances carried over from the previous chain.
    pub reused: Vec<ViewId>,
}

/// Something that can display a navigation in a [`Ui`].
pub trait NavigationHandler {
    /// Handle `event` by updating `ui`'s displayed chain.
    fn handle(
        &self,
        ui: &mut Ui,
        event: &NavigationEvent<'_>,
    ) -> Result<NavigationOutcome, NavigationError>;
}

// ---------------------------------------------------------------------------
// ViewRenderer
// ---------------------------------------------------------------------------

/// Renders a view of one type, optionally nested in a chain of parent views.
///
/// A type may appear at most once in the chain; this is checked by
/// [`ViewRenderer::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRenderer {
    view_type: ViewType,
    // Starts with the view's immediate parent.
    parent_types: Vec<ParentViewType>,
}

impl ViewRenderer {
    /// Create a renderer for `view_type` wrapped in `parent_types`.
    ///
    /// Fails with [`RouterError::DuplicateViewType`] if any type is used in
    /// more than one position.
    pub fn new(view_type: ViewType, parent_types: Vec<ParentViewType>) -> Result<Self, RouterError> {
        let mut seen = HashSet::new();
        seen.insert(view_type.id());
        for parent in &parent_types {
            if !seen.insert(parent.id()) {
                return Err(RouterError::DuplicateViewType {
                    view: parent.name(),
                });
            }
        }
        Ok(Self {
            view_type,
            parent_types,
        })
    }

    /// The leaf view type.
    pub fn view_type(&self) -> &ViewType {
        &self.view_type
    }

    /// The parent view types, immediate parent first.
    pub fn parent_types(&self) -> &[ParentViewType] {
        &self.parent_types
    }

    fn resolve(
        &self,
        ui: &mut Ui,
        available: &mut HashMap<TypeId, ViewId>,
        created: &mut Vec<ViewId>,
        reused: &mut Vec<ViewId>,
    ) -> Result<(ViewId, Vec<ViewId>), NavigationError> {
        let mut parents = Vec::with_capacity(self.parent_types.len());
        for parent_type in &self.parent_types {
            let id = reuse_or_create(ui, parent_type.view_type(), available, created, reused)?;
            // A reused instance may have been adopted without host capability.
            ui.bind_host(id, parent_type.attach_fn());
            parents.push(id);
        }
        let view = reuse_or_create(ui, &self.view_type, available, created, reused)?;
        Ok((view, parents))
    }
}

impl NavigationHandler for ViewRenderer {
    fn handle(
        &self,
        ui: &mut Ui,
        event: &NavigationEvent<'_>,
    ) -> Result<NavigationOutcome, NavigationError> {
        // Instances currently in use that we want to reuse if possible.
        let mut available: HashMap<TypeId, ViewId> = ui
            .active_chain()
            .iter()
            .filter_map(|&id| ui.view_type_id(id).map(|type_id| (type_id, id)))
            .collect();

        let mut created = Vec::new();
        let mut reused = Vec::new();
        let (view, parents) =
            match self.resolve(ui, &mut available, &mut created, &mut reused) {
                Ok(chain) => chain,
                Err(err) => {
                    for id in created {
                        ui.discard(id);
                    }
                    return Err(err);
                }
            };

        let change = LocationChangeEvent::new(event.location, event.parameters);
        for &id in std::iter::once(&view).chain(parents.iter()) {
            if let Some(instance) = ui.view_mut(id) {
                instance.on_location_change(&change);
            }
        }

        ui.show_view(view, parents.clone());
        ui.set_location(event.location.clone());

        debug!(
            location = %event.location,
            view = self.view_type.name(),
            created = created.len(),
            reused = reused.len(),
            "rendered view chain"
        );

        Ok(NavigationOutcome {
            view,
            parents,
            created,
            reused,
        })
    }
}

fn reuse_or_create(
    ui: &mut Ui,
    view_type: &ViewType,
    available: &mut HashMap<TypeId, ViewId>,
    created: &mut Vec<ViewId>,
    reused: &mut Vec<ViewId>,
) -> Result<ViewId, NavigationError> {
    if let Some(id) = available.remove(&view_type.id()) {
        reused.push(id);
        return Ok(id);
    }
    let id = ui
        .instantiate(view_type)
        .map_err(|source| NavigationError::Instantiation {
            view: view_type.name(),
            source,
        })?;
    created.push(id);
    Ok(id)
}

// ===========================================================================
// Tests
// ===========================================================================
