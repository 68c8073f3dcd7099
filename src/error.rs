use thiserror::Error;

use crate::{BuildError, NamespaceError, ResolveError};

/// Unified error type covering configuration loading, rule construction,
/// queue tree construction, and placement.
///
/// Returned by convenience methods like
/// [`Partition::from_yaml()`](crate::Partition::from_yaml) and
/// [`PartitionConfig::from_file()`](crate::PartitionConfig::from_file).
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
