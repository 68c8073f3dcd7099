use std::collections::HashMap;

/// Read-only view of a submitted application, as seen by placement rules.
///
/// Built with chained setters:
///
/// ```
/// use queue_placement::Application;
///
/// let app = Application::new("app-1")
///     .user("alice")
///     .queue("root.default")
///     .tag("namespace", "analytics");
/// assert_eq!(app.get_tag("namespace"), Some("analytics"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    id: String,
    queue: String,
    user: String,
    tags: HashMap<String, String>,
}

impl Application {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the queue requested at submission.
    #[must_use]
    pub fn queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    /// Set the submitting user.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Add or overwrite a single tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Add or overwrite several tags.
    #[must_use]
    pub fn tags<K, V>(mut self, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn requested_queue(&self) -> &str {
        &self.queue
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn tag_map(&self) -> &HashMap<String, String> {
        &self.tags
    }
}
