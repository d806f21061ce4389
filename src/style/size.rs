//! `HasSize`: width/height convenience setters over an inline [`Style`].

use super::inline::Style;
use super::unit::{CssSize, SizeError, Unit};

pub const WIDTH: &str = "width";
pub const MIN_WIDTH: &str = "min-width";
pub const MAX_WIDTH: &str = "max-width";
pub const HEIGHT: &str = "height";
pub const MIN_HEIGHT: &str = "min-height";
pub const MAX_HEIGHT: &str = "max-height";

const FULL: &str = "100%";

/// Format a numeric size, or `None` for negative values (which clear the
/// property).
fn css_size(value: f32, unit: Unit) -> Option<String> {
    (value >= 0.0).then(|| CssSize::new(value, unit).to_string())
}

/// Sizing for anything that owns an inline [`Style`].
///
/// Only `style` and `style_mut` need implementing.
pub trait HasSize {
    /// The inline style holding the size properties.
    fn style(&self) -> &Style;

    /// Mutable access to the inline style.
    fn style_mut(&mut self) -> &mut Style;

    /// Set the width as a raw CSS value, e.g. `"10em"` or `"calc(100% - 4px)"`.
    fn set_width(&mut self, width: &str) {
        self.style_mut().set(WIDTH, Some(width));
    }

    /// Set the width in `unit`. A negative value removes the width.
    fn set_width_in(&mut self, width: f32, unit: Unit) {
        self.style_mut().set(WIDTH, css_size(width, unit).as_deref());
    }

    fn set_min_width(&mut self, min_width: &str) {
        self.style_mut().set(MIN_WIDTH, Some(min_width));
    }

    fn set_min_width_in(&mut self, min_width: f32, unit: Unit) {
        self.style_mut()
            .set(MIN_WIDTH, css_size(min_width, unit).as_deref());
    }

    fn set_max_width(&mut self, max_width: &str) {
        self.style_mut().set(MAX_WIDTH, Some(max_width));
    }

    fn set_max_width_in(&mut self, max_width: f32, unit: Unit) {
        self.style_mut()
            .set(MAX_WIDTH, css_size(max_width, unit).as_deref());
    }

    /// Set the height as a raw CSS value.
    fn set_height(&mut self, height: &str) {
        self.style_mut().set(HEIGHT, Some(height));
    }

    /// Set the height in `unit`. A negative value removes the height.
    fn set_height_in(&mut self, height: f32, unit: Unit) {
        self.style_mut().set(HEIGHT, css_size(height, unit).as_deref());
    }

    fn set_min_height(&mut self, min_height: &str) {
        self.style_mut().set(MIN_HEIGHT, Some(min_height));
    }

    fn set_min_height_in(&mut self, min_height: f32, unit: Unit) {
        self.style_mut()
            .set(MIN_HEIGHT, css_size(min_height, unit).as_deref());
    }

    fn set_max_height(&mut self, max_height: &str) {
        self.style_mut().set(MAX_HEIGHT, Some(max_height));
    }

    fn set_max_height_in(&mut self, max_height: f32, unit: Unit) {
        self.style_mut()
            .set(MAX_HEIGHT, css_size(max_height, unit).as_deref());
    }

    fn width(&self) -> Option<&str> {
        self.style().get(WIDTH)
    }

    fn min_width(&self) -> Option<&str> {
        self.style().get(MIN_WIDTH)
    }

    fn max_width(&self) -> Option<&str> {
        self.style().get(MAX_WIDTH)
    }

    fn height(&self) -> Option<&str> {
        self.style().get(HEIGHT)
    }

    fn min_height(&self) -> Option<&str> {
        self.style().get(MIN_HEIGHT)
    }

    fn max_height(&self) -> Option<&str> {
        self.style().get(MAX_HEIGHT)
    }

    /// The width parsed as a numeric size. `Ok(None)` when unset.
    fn width_size(&self) -> Result<Option<CssSize>, SizeError> {
        self.width().map(CssSize::parse).transpose()
    }

    /// The height parsed as a numeric size. `Ok(None)` when unset.
    fn height_size(&self) -> Result<Option<CssSize>, SizeError> {
        self.height().map(CssSize::parse).transpose()
    }

    /// Fill the parent in both directions.
    fn set_size_full(&mut self) {
        self.set_width_full();
        self.set_height_full();
    }

    fn set_width_full(&mut self) {
        self.set_width(FULL);
    }

    fn set_height_full(&mut self) {
        self.set_height(FULL);
    }

    /// Remove width and height, letting content decide.
    fn set_size_undefined(&mut self) {
        self.style_mut().set(WIDTH, None);
        self.style_mut().set(HEIGHT, None);
    }
}
