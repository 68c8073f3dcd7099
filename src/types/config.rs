use serde::{Deserialize, Serialize};

/// Static definition of one placement rule.
///
/// `name` selects the rule kind, `value` is the kind-specific parameter (the
/// tag key for `tag`, the queue for `fixed`), `create` allows the rule to add
/// missing queues, and `parent` nests the rule that resolves the enclosing
/// queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub create: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<RuleConfig>>,
}

impl RuleConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    #[must_use]
    pub fn parent(mut self, parent: RuleConfig) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }
}

/// Static definition of a queue and its children.
///
/// A queue with children is always a parent queue; `parent: true` marks an
/// empty queue as able to receive children later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub name: String,
    #[serde(default)]
    pub parent: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queues: Vec<QueueConfig>,
}

impl QueueConfig {
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn parent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: true,
            queues: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: QueueConfig) -> Self {
        self.queues.push(child);
        self
    }

    #[must_use]
    pub fn is_parent(&self) -> bool {
        self.parent || !self.queues.is_empty()
    }
}

fn default_partition() -> String {
    "default".to_owned()
}

/// One scheduling partition: its queue hierarchy plus the ordered placement
/// rules applied to applications submitted to it.
///
/// ```
/// use queue_placement::PartitionConfig;
///
/// let config = PartitionConfig::from_yaml(
///     r#"
/// name: default
/// queues:
///   - name: testqueue
/// placementrules:
///   - name: tag
///     value: namespace
///     create: true
/// "#,
/// )
/// .unwrap();
/// assert_eq!(config.rules.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    #[serde(default = "default_partition")]
    pub name: String,
    #[serde(default)]
    pub queues: Vec<QueueConfig>,
    #[serde(default, rename = "placementrules", alias = "rules")]
    pub rules: Vec<RuleConfig>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            name: default_partition(),
            queues: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl PartitionConfig {
    /// Parse a partition definition from YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML decoding error if the document does not match the
    /// partition layout.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Read a YAML file and parse the partition definition it contains.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError`](crate::PlacementError) on I/O or decoding failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::PlacementError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&input)?)
    }
}
