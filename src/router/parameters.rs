//! Route parameter layouts and binding of trailing location segments.
//!
//! A route registered at `"users"` with a required `id` parameter matches
//! `"users/42"` and binds `id = "42"`. Layouts are validated when a route
//! entry is built: required segments come first, then optional ones, then at
//! most one wildcard.

use super::RouterError;

/// How many location segments a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Exactly one segment.
    Required,
    /// Zero or one segment.
    Optional,
    /// All remaining segments, joined with `/`.
    Wildcard,
}

/// One named parameter of a route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSegment {
    name: String,
    kind: ParameterKind,
}

impl ParameterSegment {
    /// Create a segment.
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// A segment consuming exactly one location segment.
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Required)
    }

    /// A segment consuming zero or one location segment.
    pub fn optional(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Optional)
    }

    /// A segment consuming the rest of the location.
    pub fn wildcard(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Wildcard)
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter kind.
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
}

/// Check that a layout can be matched unambiguously.
pub(crate) fn validate_layout(path: &str, layout: &[ParameterSegment]) -> Result<(), RouterError> {
    let invalid = |message: String| RouterError::InvalidParameters {
        path: path.to_owned(),
        message,
    };

    let mut seen_optional = false;
    for (index, segment) in layout.iter().enumerate() {
        if segment.name.is_empty() {
            return Err(invalid(format!("parameter {index} has an empty name")));
        }
        if layout[..index].iter().any(|other| other.name == segment.name) {
            return Err(invalid(format!("parameter '{}' is declared twice", segment.name)));
        }
        match segment.kind {
            ParameterKind::Required if seen_optional => {
                return Err(invalid(format!(
                    "required parameter '{}' follows an optional one",
                    segment.name
                )));
            }
            ParameterKind::Required => {}
            ParameterKind::Optional => seen_optional = true,
            ParameterKind::Wildcard if index + 1 != layout.len() => {
                return Err(invalid(format!(
                    "wildcard parameter '{}' must be last",
                    segment.name
                )));
            }
            ParameterKind::Wildcard => {}
        }
    }
    Ok(())
}

/// Bind `rest` to a validated layout. Returns `None` if the segment count
/// does not fit.
pub(crate) fn bind(layout: &[ParameterSegment], rest: &[String]) -> Option<RouteParameters> {
    let mut values = Vec::with_capacity(layout.len());
    let mut remaining = rest;

    for segment in layout {
        match segment.kind {
            ParameterKind::Required => {
                let (first, tail) = remaining.split_first()?;
                values.push((segment.name.clone(), first.clone()));
                remaining = tail;
            }
            ParameterKind::Optional => {
                if let Some((first, tail)) = remaining.split_first() {
                    values.push((segment.name.clone(), first.clone()));
                    remaining = tail;
                }
            }
            ParameterKind::Wildcard => {
                if !remaining.is_empty() {
                    values.push((segment.name.clone(), remaining.join("/")));
                }
                remaining = &[];
            }
        }
    }

    if remaining.is_empty() {
        Some(RouteParameters { values })
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// RouteParameters
// ---------------------------------------------------------------------------

/// Parameter values bound for one navigation, in layout order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParameters {
    values: Vec<(String, String)>,
}

impl RouteParameters {
    /// The value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters were bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
