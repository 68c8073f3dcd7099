use std::fmt;

/// Successful outcome of resolving a rule: either a queue, or no decision.
///
/// Illegal placements are reported separately as
/// [`ResolveError`](super::ResolveError), so a full resolution result is
/// `Result<Placement, ResolveError>` with three distinct cases.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Placement {
    /// Fully-qualified path of an existing queue.
    Resolved(String),
    /// The rule does not apply to this application. The caller should try
    /// the next rule or fall back to a default.
    NoMatch,
}

impl Placement {
    /// The resolved queue path, if any.
    #[must_use]
    pub fn queue(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::NoMatch => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(path) => f.write_str(path),
            Self::NoMatch => f.write_str("<no match>"),
        }
    }
}
