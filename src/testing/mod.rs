//! Headless testing helpers: Pilot, snapshot helpers, a recording live reload.
//!
//! Use the [`Pilot`] to drive an [`Application`](crate::app::Application)
//! through navigations and hot reloads from a test. Use [`chain_to_string`]
//! and [`routes_to_string`] to capture routing state as plain text for
//! snapshot-style assertions.

pub mod pilot;
pub mod recorder;
pub mod snapshot;

pub use pilot::Pilot;
pub use recorder::RecordingLiveReload;
pub use snapshot::{chain_to_string, routes_to_string};
