use std::fmt;

use tracing::{debug, warn};

use crate::namespace::{QueueNamespace, QueueTree};
use crate::{
    Application, BuildError, PartitionConfig, Placement, PlacementError, PlacementRule,
    ResolveError, RuleConfig,
};

/// An ordered chain of placement rules.
///
/// Rules are tried in order: the first resolved queue wins, a rule without a
/// decision passes to the next one, and an illegal placement stops the chain.
#[derive(Debug, Clone, Default)]
pub struct PlacementManager {
    rules: Vec<PlacementRule>,
}

impl PlacementManager {
    #[must_use]
    pub fn new(rules: Vec<PlacementRule>) -> Self {
        Self { rules }
    }

    /// Build every configured rule. Nothing is installed if any rule fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, BuildError> {
        let rules = rules
            .iter()
            .map(PlacementRule::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn rules(&self) -> &[PlacementRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the rule chain for `app`.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolveError`] of the first rule that finds an illegal
    /// placement; later rules are not tried.
    pub fn place(
        &self,
        app: &Application,
        namespace: &dyn QueueNamespace,
    ) -> Result<Placement, ResolveError> {
        for (index, rule) in self.rules.iter().enumerate() {
            match rule.resolve(app, namespace) {
                Ok(Placement::Resolved(queue)) => {
                    debug!(
                        app = app.id(),
                        index,
                        %rule,
                        queue = queue.as_str(),
                        "application placed"
                    );
                    return Ok(Placement::Resolved(queue));
                }
                Ok(Placement::NoMatch) => {}
                Err(err) => {
                    warn!(app = app.id(), index, %rule, error = %err, "placement rejected");
                    return Err(err);
                }
            }
        }
        debug!(app = app.id(), "no rule placed the application");
        Ok(Placement::NoMatch)
    }
}

impl fmt::Display for PlacementManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlacementManager({} rules)", self.rules.len())
    }
}

/// A queue hierarchy together with the rules that place applications in it.
///
/// ```
/// use queue_placement::{Application, Partition, Placement};
///
/// let partition = Partition::from_yaml(
///     r#"
/// queues:
///   - name: batch
/// placementrules:
///   - name: provided
///   - name: fixed
///     value: root.batch
/// "#,
/// )
/// .unwrap();
///
/// let app = Application::new("app-1");
/// assert_eq!(
///     partition.place(&app).unwrap(),
///     Placement::Resolved("root.batch".into())
/// );
/// ```
#[derive(Debug)]
pub struct Partition {
    name: String,
    queues: QueueTree,
    manager: PlacementManager,
}

impl Partition {
    /// Build the queue tree and the rule chain of a partition.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError`] if a queue or a rule is invalid.
    pub fn from_config(config: &PartitionConfig) -> Result<Self, PlacementError> {
        let queues = QueueTree::from_config(&config.queues)?;
        let manager = PlacementManager::from_config(&config.rules)?;
        Ok(Self {
            name: config.name.clone(),
            queues,
            manager,
        })
    }

    /// Parse a YAML partition definition and build it.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError`] on decoding, queue, or rule failure.
    pub fn from_yaml(input: &str) -> Result<Self, PlacementError> {
        let config = PartitionConfig::from_yaml(input)?;
        Self::from_config(&config)
    }

    /// Read and build a YAML partition definition.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError`] on I/O, decoding, queue, or rule failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, PlacementError> {
        let config = PartitionConfig::from_file(path)?;
        Self::from_config(&config)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn queues(&self) -> &QueueTree {
        &self.queues
    }

    #[must_use]
    pub fn manager(&self) -> &PlacementManager {
        &self.manager
    }

    /// Place `app` in this partition's queue tree.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] for an illegal placement.
    pub fn place(&self, app: &Application) -> Result<Placement, ResolveError> {
        self.manager.place(app, &self.queues)
    }
}
