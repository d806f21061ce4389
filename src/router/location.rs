//! Locations: normalized relative paths plus an optional query string.

use std::fmt;

/// Strip leading/trailing slashes and collapse empty segments.
///
/// `"/users//42/"` and `"users/42"` normalize to the same path. The root
/// path is the empty string.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// A navigation target: path segments and an optional query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    segments: Vec<String>,
    query: Option<String>,
}

impl Location {
    /// Parse a location such as `"users/42?tab=posts"`.
    pub fn new(location: &str) -> Self {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (location, None),
        };
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            query,
        }
    }

    /// The normalized path, without query.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// The path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Whether this is the root location.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<&str> for Location {
    fn from(location: &str) -> Self {
        Self::new(location)
    }
}

impl From<String> for Location {
    fn from(location: String) -> Self {
        Self::new(&location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}
