use std::fmt;

/// Errors produced when parsing a queue name or a dotted queue path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    input: String,
    message: String,
}

impl PathError {
    pub(crate) fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }

    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid queue path '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for PathError {}
