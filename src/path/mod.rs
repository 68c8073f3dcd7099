mod error;
mod grammar;

use std::fmt;

pub use error::PathError;

/// Name of the queue every fully-qualified path starts with.
pub const ROOT_QUEUE: &str = "root";

/// Separator between the segments of a queue path.
pub const DOT: char = '.';

/// Replacement for a `.` inside a value that has to become a single queue name.
pub const DOT_REPLACEMENT: &str = "_dot_";

/// Longest allowed queue name.
pub const MAX_NAME_LEN: usize = 64;

/// A parsed, validated queue path such as `root.parent.child`.
///
/// Paths are not required to start at the root: `parent.child` parses fine
/// and reports [`is_qualified()`](Self::is_qualified) as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueuePath {
    segments: Vec<String>,
}

impl QueuePath {
    /// Parse a dotted queue path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if any segment is empty, too long, or contains a
    /// character outside `[a-zA-Z0-9_-]`.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        use winnow::Parser;
        let segments = grammar::queue_path
            .parse(input)
            .map_err(|e| {
                PathError::new(
                    input,
                    format!(
                        "expected names of [a-zA-Z0-9_-] joined by '.', \
                         at most {MAX_NAME_LEN} characters each (offset {})",
                        e.offset()
                    ),
                )
            })?;
        Ok(Self {
            segments: segments.into_iter().map(str::to_owned).collect(),
        })
    }

    /// The path of the root queue.
    #[must_use]
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT_QUEUE.to_owned()],
        }
    }

    /// Returns `true` if the path starts at the root queue.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.segments[0] == ROOT_QUEUE
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment: the simple name of the queue the path points at.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Number of segments, the root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The enclosing path, or `None` for a single-segment path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one segment. The name is not validated.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Self { segments }
    }
}

impl fmt::Display for QueuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for QueuePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns `true` if `value` names a queue by its fully-qualified path, i.e.
/// it is `root` or starts with `root.`.
#[must_use]
pub fn is_qualified(value: &str) -> bool {
    match value.strip_prefix(ROOT_QUEUE) {
        Some(rest) => rest.is_empty() || rest.starts_with(DOT),
        None => false,
    }
}

/// Returns `true` if `name` is usable as a single queue name.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    use winnow::Parser;
    grammar::queue_name.parse(name).is_ok()
}

/// Turn an arbitrary value into a single path segment by replacing every `.`
/// with [`DOT_REPLACEMENT`].
#[must_use]
pub fn replace_dot(value: &str) -> String {
    value.replace(DOT, DOT_REPLACEMENT)
}

/// Join a parent path and a simple name.
#[must_use]
pub fn join(parent: &str, name: &str) -> String {
    format!("{parent}{DOT}{name}")
}
