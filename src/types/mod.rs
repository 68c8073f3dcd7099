mod application;
mod config;
mod error;
mod placement;
mod queue;
mod rule;

pub use application::Application;
pub use config::{PartitionConfig, QueueConfig, RuleConfig};
pub use error::{BuildError, NamespaceError, ResolveError};
pub use placement::Placement;
pub use queue::QueueKind;
pub use rule::{PlacementRule, RuleKind};
