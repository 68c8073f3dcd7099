mod build;
mod error;
mod manager;
mod namespace;
pub mod path;
mod resolve;
mod types;

pub use build::rule_kinds;
pub use error::PlacementError;
pub use manager::{Partition, PlacementManager};
pub use namespace::{QueueNamespace, QueueTree};
pub use path::{PathError, QueuePath};
pub use types::{
    Application, BuildError, NamespaceError, PartitionConfig, Placement, PlacementRule,
    QueueConfig, QueueKind, ResolveError, RuleConfig, RuleKind,
};
