use std::fmt;

use super::application::Application;
use super::config::RuleConfig;
use super::error::{BuildError, ResolveError};
use super::placement::Placement;
use crate::namespace::QueueNamespace;

/// The closed set of rule kinds. Each kind differs only in where it takes the
/// queue name from; resolution is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Value of the application tag `key`.
    Tag { key: String },
    /// Name of the submitting user.
    User,
    /// Queue requested by the application at submission.
    Provided,
    /// A queue fixed in the configuration.
    Fixed { queue: String },
}

impl RuleKind {
    pub const TAG: &'static str = "tag";
    pub const USER: &'static str = "user";
    pub const PROVIDED: &'static str = "provided";
    pub const FIXED: &'static str = "fixed";

    /// The configuration name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tag { .. } => Self::TAG,
            Self::User => Self::USER,
            Self::Provided => Self::PROVIDED,
            Self::Fixed { .. } => Self::FIXED,
        }
    }

    /// The raw match value for `app`. Empty values count as absent.
    pub(crate) fn extract<'a>(&'a self, app: &'a Application) -> Option<&'a str> {
        let value = match self {
            Self::Tag { key } => app.get_tag(key)?,
            Self::User => app.user_name(),
            Self::Provided => app.requested_queue(),
            Self::Fixed { queue } => queue,
        };
        (!value.is_empty()).then_some(value)
    }
}

/// A constructed placement rule, with its optional parent rule.
///
/// Rules are immutable after construction and hold no per-call state, so one
/// instance can be shared across threads and used for any number of
/// applications.
///
/// ```
/// use queue_placement::{Application, Placement, PlacementRule, QueueTree, RuleConfig};
///
/// let tree = QueueTree::new();
/// let rule = PlacementRule::from_config(&RuleConfig::new("tag").value("team").create(true))
///     .unwrap();
///
/// let app = Application::new("app-1").tag("team", "search");
/// let placement = rule.resolve(&app, &tree).unwrap();
/// assert_eq!(placement, Placement::Resolved("root.search".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRule {
    pub(crate) kind: RuleKind,
    pub(crate) create: bool,
    pub(crate) parent: Option<Box<PlacementRule>>,
}

impl PlacementRule {
    /// Build a rule, and recursively its parent rule, from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the rule or any nested parent is invalid.
    pub fn from_config(config: &RuleConfig) -> Result<Self, BuildError> {
        crate::build::build(config)
    }

    #[must_use]
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Whether this rule may add missing queues.
    #[must_use]
    pub fn can_create(&self) -> bool {
        self.create
    }

    #[must_use]
    pub fn parent(&self) -> Option<&PlacementRule> {
        self.parent.as_deref()
    }

    /// Length of the parent chain, this rule included.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.parent().map_or(0, PlacementRule::depth)
    }

    /// Resolve `app` to a queue in `namespace`.
    ///
    /// Returns [`Placement::NoMatch`] when the rule does not apply, and
    /// [`ResolveError`] only for an illegal placement under a leaf queue.
    /// Queues are created in `namespace` when this rule allows it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::LeafQueue`] if the target queue would end up
    /// below a leaf queue.
    pub fn resolve(
        &self,
        app: &Application,
        namespace: &dyn QueueNamespace,
    ) -> Result<Placement, ResolveError> {
        crate::resolve::resolve(self, app, namespace)
    }
}

impl fmt::Display for PlacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuleKind::Tag { key } => write!(f, "tag({key}")?,
            RuleKind::Fixed { queue } => write!(f, "fixed({queue}")?,
            other => write!(f, "{}(", other.name())?,
        }
        if self.create {
            if matches!(self.kind, RuleKind::Tag { .. } | RuleKind::Fixed { .. }) {
                f.write_str(", ")?;
            }
            f.write_str("create")?;
        }
        f.write_str(")")?;
        if let Some(parent) = self.parent() {
            write!(f, " in {parent}")?;
        }
        Ok(())
    }
}
