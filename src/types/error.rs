use thiserror::Error;

use crate::path::PathError;

/// Errors raised while turning a [`RuleConfig`](super::RuleConfig) into a
/// [`PlacementRule`](super::PlacementRule).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("rule '{kind}' requires a non-empty 'value'")]
    MissingValue { kind: String },

    #[error("unknown rule 'name': '{kind}'")]
    UnknownKind { kind: String },

    #[error("rule '{kind}' has an invalid 'parent': {source}")]
    Parent {
        kind: String,
        #[source]
        source: Box<BuildError>,
    },

    #[error("rule '{kind}' with fully qualified queue '{value}' cannot have a 'parent'")]
    QualifiedWithParent { kind: String, value: String },

    #[error("rule '{kind}' has an invalid 'value' '{value}': {source}")]
    InvalidValue {
        kind: String,
        value: String,
        #[source]
        source: PathError,
    },
}

/// An illegal placement found while resolving a rule.
///
/// "No queue found" is never an error; see [`Placement::NoMatch`](super::Placement::NoMatch).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("cannot place in queue '{path}': queue '{leaf}' is a leaf queue and cannot have child queues")]
    LeafQueue { path: String, leaf: String },
}

impl ResolveError {
    /// The queue the application would have been placed in.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::LeafQueue { path, .. } => path,
        }
    }
}

/// Errors reported by a [`QueueNamespace`](crate::QueueNamespace) when a
/// queue cannot be added.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("cannot create queue '{path}': queue '{leaf}' is a leaf queue")]
    LeafAncestor { path: String, leaf: String },

    #[error("queue path '{path}' is not fully qualified")]
    NotQualified { path: String },

    #[error("duplicate queue '{path}'")]
    Duplicate { path: String },

    #[error(transparent)]
    InvalidPath(#[from] PathError),
}
