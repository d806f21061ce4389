//! Inline sizing helpers: `Style` map, CSS units, and the `HasSize` trait.

pub mod inline;
pub mod size;
pub mod unit;

pub use inline::Style;
pub use size::HasSize;
pub use unit::{CssSize, SizeError, Unit};
