//! Views: the [`View`] trait, child hosting, and explicit type tags.

pub mod traits;
pub mod view_type;

pub use traits::{HasChildView, LocationChangeEvent, View};
pub use view_type::{InstantiationError, ParentViewType, ViewType};
