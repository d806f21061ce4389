//! CSS length units and sizes: `Unit`, `CssSize`.

use std::fmt;
use std::str::FromStr;

/// Errors from size parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizeError {
    #[error("size is empty")]
    Empty,
    #[error("size '{0}' does not end with a known unit")]
    MissingUnit(String),
    #[error("invalid number in size '{input}'")]
    InvalidNumber {
        input: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// A CSS length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Pixels (`px`).
    Pixels,
    /// Points (`pt`).
    Points,
    /// Picas (`pc`).
    Picas,
    /// Root font size (`rem`).
    Rem,
    /// Font size (`em`).
    Em,
    /// x-height (`ex`).
    Ex,
    /// Millimetres (`mm`).
    Mm,
    /// Centimetres (`cm`).
    Cm,
    /// Inches (`in`).
    Inch,
    /// Percentage of the containing block (`%`).
    Percentage,
}

impl Unit {
    /// All units, in suffix-matching order (`rem` before `em`).
    pub const ALL: [Unit; 10] = [
        Unit::Pixels,
        Unit::Points,
        Unit::Picas,
        Unit::Rem,
        Unit::Em,
        Unit::Ex,
        Unit::Mm,
        Unit::Cm,
        Unit::Inch,
        Unit::Percentage,
    ];

    /// The CSS suffix for this unit.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Pixels => "px",
            Unit::Points => "pt",
            Unit::Picas => "pc",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Ex => "ex",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Inch => "in",
            Unit::Percentage => "%",
        }
    }

    /// Look a unit up by its symbol. Unknown or missing symbols mean pixels.
    pub fn from_symbol(symbol: Option<&str>) -> Self {
        symbol
            .and_then(|symbol| Self::ALL.into_iter().find(|unit| unit.symbol() == symbol))
            .unwrap_or(Unit::Pixels)
    }

    /// The unit a CSS size string ends with.
    pub fn of(css_size: &str) -> Result<Self, SizeError> {
        let css_size = css_size.trim();
        if css_size.is_empty() {
            return Err(SizeError::Empty);
        }
        Self::ALL
            .into_iter()
            .find(|unit| css_size.ends_with(unit.symbol()))
            .ok_or_else(|| SizeError::MissingUnit(css_size.to_owned()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric CSS size with a unit, e.g. `12.5px` or `100%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssSize {
    pub value: f32,
    pub unit: Unit,
}

impl CssSize {
    /// Create a size.
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Parse `"<number><unit>"`. A bare unit parses as zero.
    pub fn parse(css_size: &str) -> Result<Self, SizeError> {
        let unit = Unit::of(css_size)?;
        let css_size = css_size.trim();
        let number = css_size[..css_size.len() - unit.symbol().len()].trim_end();
        let value = if number.is_empty() {
            0.0
        } else {
            number
                .parse::<f32>()
                .map_err(|source| SizeError::InvalidNumber {
                    input: css_size.to_owned(),
                    source,
                })?
        };
        Ok(Self { value, unit })
    }
}

impl FromStr for CssSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CssSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.fract() == 0.0 {
            write!(f, "{}{}", self.value as i64, self.unit)
        } else {
            write!(f, "{}{}", self.value, self.unit)
        }
    }
}
