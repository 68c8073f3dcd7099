use std::collections::{BTreeMap, HashMap, VecDeque};

use parking_lot::RwLock;
use tracing::{info, trace};

use crate::path::{self, PathError, QueuePath, ROOT_QUEUE};
use crate::{NamespaceError, QueueConfig, QueueKind};

/// Query and creation surface a placement rule needs from the queue
/// hierarchy.
///
/// Implementations must synchronize [`create_path`](Self::create_path)
/// internally: when two callers create the same missing queue concurrently,
/// one creates it and the other sees the existing queue.
pub trait QueueNamespace: Send + Sync {
    /// Returns `true` if a queue with this fully-qualified path exists.
    fn exists(&self, path: &str) -> bool;

    /// Fully-qualified path of a queue with the given simple name.
    ///
    /// When several queues share the name, the implementation picks one
    /// deterministically.
    fn find_by_name(&self, name: &str) -> Option<String>;

    /// Kind of an existing queue, `None` if it does not exist.
    fn kind(&self, path: &str) -> Option<QueueKind>;

    /// Returns `true` if the queue exists and may hold child queues.
    fn is_parent_capable(&self, path: &str) -> bool {
        self.kind(path).is_some_and(QueueKind::is_parent)
    }

    /// Create every missing queue along `path` and return the path.
    ///
    /// Intermediate queues are created as parent queues, the last one as
    /// `kind`. An existing queue is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError`] if the path is malformed, not rooted, or
    /// passes through a leaf queue.
    fn create_path(&self, path: &str, kind: QueueKind) -> Result<String, NamespaceError>;
}

#[derive(Debug)]
struct Node {
    name: String,
    path: String,
    kind: QueueKind,
    children: BTreeMap<String, usize>,
}

#[derive(Debug)]
struct Nodes {
    nodes: Vec<Node>,
    by_path: HashMap<String, usize>,
}

impl Nodes {
    fn get(&self, path: &str) -> Option<&Node> {
        self.by_path.get(path).map(|&idx| &self.nodes[idx])
    }

    fn add_child(&mut self, parent: usize, name: &str, kind: QueueKind) -> usize {
        let path = path::join(&self.nodes[parent].path, name);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_owned(),
            path: path.clone(),
            kind,
            children: BTreeMap::new(),
        });
        self.nodes[parent].children.insert(name.to_owned(), idx);
        self.by_path.insert(path, idx);
        idx
    }

    /// Breadth-first walk from the root; siblings are visited in name order.
    fn breadth_first(&self) -> impl Iterator<Item = &Node> + '_ {
        let mut pending = VecDeque::from([0_usize]);
        std::iter::from_fn(move || {
            let idx = pending.pop_front()?;
            let node = &self.nodes[idx];
            pending.extend(node.children.values().copied());
            Some(node)
        })
    }
}

/// In-memory queue hierarchy rooted at `root`.
///
/// Lookups take a shared lock; creation takes the write lock for the whole
/// path, so concurrent creations of the same queue never produce duplicates.
///
/// ```
/// use queue_placement::{QueueKind, QueueNamespace, QueueTree};
///
/// let tree = QueueTree::new();
/// tree.create_path("root.parent.child", QueueKind::Leaf).unwrap();
///
/// assert!(tree.is_parent_capable("root.parent"));
/// assert_eq!(tree.kind("root.parent.child"), Some(QueueKind::Leaf));
/// assert_eq!(tree.find_by_name("child").as_deref(), Some("root.parent.child"));
/// ```
#[derive(Debug)]
pub struct QueueTree {
    inner: RwLock<Nodes>,
}

impl Default for QueueTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueTree {
    /// A tree holding only the root queue.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            name: ROOT_QUEUE.to_owned(),
            path: ROOT_QUEUE.to_owned(),
            kind: QueueKind::Parent,
            children: BTreeMap::new(),
        };
        Self {
            inner: RwLock::new(Nodes {
                nodes: vec![root],
                by_path: HashMap::from([(ROOT_QUEUE.to_owned(), 0)]),
            }),
        }
    }

    /// Build a tree from configured queues.
    ///
    /// `queues` are the children of the root. A single entry named `root` is
    /// also accepted, in which case its children are used.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError`] for an invalid queue name or two siblings
    /// with the same name.
    pub fn from_config(queues: &[QueueConfig]) -> Result<Self, NamespaceError> {
        let queues = match queues {
            [only] if only.name == ROOT_QUEUE => only.queues.as_slice(),
            _ => queues,
        };
        let tree = Self::new();
        {
            let mut nodes = tree.inner.write();
            for queue in queues {
                add_configured(&mut nodes, 0, queue)?;
            }
        }
        Ok(tree)
    }

    /// Number of queues, the root included.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.inner.read().nodes.len()
    }

    /// Fully-qualified paths of the direct children of `path`, in name order.
    /// Empty if the queue does not exist.
    #[must_use]
    pub fn children(&self, path: &str) -> Vec<String> {
        let nodes = self.inner.read();
        nodes.get(path).map_or_else(Vec::new, |node| {
            node.children
                .values()
                .map(|&idx| nodes.nodes[idx].path.clone())
                .collect()
        })
    }

    /// Every queue with the given simple name, shallowest first.
    #[must_use]
    pub fn find_all_by_name(&self, name: &str) -> Vec<String> {
        self.inner
            .read()
            .breadth_first()
            .filter(|node| node.name == name)
            .map(|node| node.path.clone())
            .collect()
    }

    /// Every queue path in breadth-first order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.inner
            .read()
            .breadth_first()
            .map(|node| node.path.clone())
            .collect()
    }
}

fn add_configured(
    nodes: &mut Nodes,
    parent: usize,
    queue: &QueueConfig,
) -> Result<(), NamespaceError> {
    let path = path::join(&nodes.nodes[parent].path, &queue.name);
    if !path::is_valid_name(&queue.name) {
        let reason = format!("invalid queue name '{}'", queue.name);
        return Err(PathError::new(path, reason).into());
    }
    if nodes.nodes[parent].children.contains_key(&queue.name) {
        return Err(NamespaceError::Duplicate { path });
    }
    let kind = if queue.is_parent() {
        QueueKind::Parent
    } else {
        QueueKind::Leaf
    };
    let idx = nodes.add_child(parent, &queue.name, kind);
    for child in &queue.queues {
        add_configured(nodes, idx, child)?;
    }
    Ok(())
}

impl QueueNamespace for QueueTree {
    fn exists(&self, path: &str) -> bool {
        let found = self.inner.read().by_path.contains_key(path);
        trace!(path, found, "queue lookup");
        found
    }

    fn find_by_name(&self, name: &str) -> Option<String> {
        let found = self
            .inner
            .read()
            .breadth_first()
            .find(|node| node.name == name)
            .map(|node| node.path.clone());
        trace!(name, found = found.as_deref(), "queue search by name");
        found
    }

    fn kind(&self, path: &str) -> Option<QueueKind> {
        self.inner.read().get(path).map(|node| node.kind)
    }

    fn create_path(&self, path: &str, kind: QueueKind) -> Result<String, NamespaceError> {
        let parsed = QueuePath::parse(path)?;
        if !parsed.is_qualified() {
            return Err(NamespaceError::NotQualified {
                path: path.to_owned(),
            });
        }

        let mut nodes = self.inner.write();
        let last = parsed.depth() - 1;
        let mut current = 0;
        for (depth, name) in parsed.segments().iter().enumerate().skip(1) {
            if let Some(&idx) = nodes.nodes[current].children.get(name) {
                current = idx;
                continue;
            }
            if !nodes.nodes[current].kind.is_parent() {
                return Err(NamespaceError::LeafAncestor {
                    path: path.to_owned(),
                    leaf: nodes.nodes[current].path.clone(),
                });
            }
            let node_kind = if depth == last { kind } else { QueueKind::Parent };
            current = nodes.add_child(current, name, node_kind);
            info!(queue = %nodes.nodes[current].path, kind = %node_kind, "created queue");
        }
        Ok(nodes.nodes[current].path.clone())
    }
}
