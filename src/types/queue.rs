use std::fmt;

/// Structural permission of a queue to host child queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Holds applications, never child queues.
    Leaf,
    /// May hold child queues, including ones added at runtime.
    Parent,
}

impl QueueKind {
    #[must_use]
    pub fn is_parent(self) -> bool {
        self == Self::Parent
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => f.write_str("leaf"),
            Self::Parent => f.write_str("parent"),
        }
    }
}
