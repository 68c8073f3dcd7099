use tracing::debug;

use crate::namespace::QueueNamespace;
use crate::path::{self, QueuePath, ROOT_QUEUE};
use crate::{Application, NamespaceError, Placement, PlacementRule, QueueKind, ResolveError};

/// Resolve `rule` for `app`.
///
/// The whole parent chain is located first without touching `namespace`;
/// the target is created, together with any missing ancestors, only once
/// every rule in the chain has agreed on it.
pub(crate) fn resolve(
    rule: &PlacementRule,
    app: &Application,
    namespace: &dyn QueueNamespace,
) -> Result<Placement, ResolveError> {
    let placement = match locate(rule, app, namespace)? {
        Some(target) if namespace.exists(&target) => Placement::Resolved(target),
        Some(target) => create(namespace, &target)?,
        None => Placement::NoMatch,
    };
    debug!(app = app.id(), rule = %rule, %placement, "rule resolved");
    Ok(placement)
}

/// Path `rule` places `app` in. A path that does not exist yet is only
/// returned when every rule along the chain may create its part of it.
fn locate(
    rule: &PlacementRule,
    app: &Application,
    namespace: &dyn QueueNamespace,
) -> Result<Option<String>, ResolveError> {
    let Some(value) = rule.kind.extract(app) else {
        debug!(app = app.id(), rule = rule.kind.name(), "no value to place on");
        return Ok(None);
    };

    match rule.parent() {
        Some(parent) => under_parent(rule, parent, value, app, namespace),
        None if path::is_qualified(value) => qualified(rule, value, namespace),
        None => Ok(by_name(rule, value, namespace)),
    }
}

/// `value` names the target by its full path.
fn qualified(
    rule: &PlacementRule,
    value: &str,
    namespace: &dyn QueueNamespace,
) -> Result<Option<String>, ResolveError> {
    if namespace.exists(value) {
        return Ok(Some(value.to_owned()));
    }
    if !rule.create {
        return Ok(None);
    }
    let Ok(parsed) = QueuePath::parse(value) else {
        debug!(path = value, "value is not a valid queue path");
        return Ok(None);
    };
    if let Some(leaf) = leaf_ancestor(namespace, &parsed) {
        return Err(ResolveError::LeafQueue {
            path: value.to_owned(),
            leaf,
        });
    }
    Ok(Some(value.to_owned()))
}

/// `value` is a simple name anywhere in the tree, or a new child of the root.
fn by_name(rule: &PlacementRule, value: &str, namespace: &dyn QueueNamespace) -> Option<String> {
    let name = path::replace_dot(value);
    if let Some(found) = namespace.find_by_name(&name) {
        return Some(found);
    }
    if !rule.create {
        return None;
    }
    if !path::is_valid_name(&name) {
        debug!(name = name.as_str(), "value is not a valid queue name");
        return None;
    }
    Some(path::join(ROOT_QUEUE, &name))
}

/// The parent rule supplies the enclosing queue; `value` is always a single
/// segment below it.
fn under_parent(
    rule: &PlacementRule,
    parent: &PlacementRule,
    value: &str,
    app: &Application,
    namespace: &dyn QueueNamespace,
) -> Result<Option<String>, ResolveError> {
    let Some(parent_path) = locate(parent, app, namespace)? else {
        return Ok(None);
    };

    let name = path::replace_dot(value);
    let target = path::join(&parent_path, &name);
    // A parent that does not exist yet will be created as a parent queue.
    if namespace.kind(&parent_path) == Some(QueueKind::Leaf) {
        return Err(ResolveError::LeafQueue {
            path: target,
            leaf: parent_path,
        });
    }
    if !path::is_valid_name(&name) {
        debug!(name = name.as_str(), "value is not a valid queue name");
        return Ok(None);
    }
    if namespace.exists(&target) {
        return Ok(Some(target));
    }
    if !rule.create {
        return Ok(None);
    }
    Ok(Some(target))
}

/// Deepest existing queue on `path` if it is a leaf. Only meaningful for a
/// path that does not exist itself.
fn leaf_ancestor(namespace: &dyn QueueNamespace, path: &QueuePath) -> Option<String> {
    let mut prefix = String::new();
    for segment in path.segments() {
        prefix = if prefix.is_empty() {
            segment.clone()
        } else {
            path::join(&prefix, segment)
        };
        match namespace.kind(&prefix)? {
            QueueKind::Leaf => return Some(prefix),
            QueueKind::Parent => {}
        }
    }
    None
}

/// The target is created as a leaf; missing ancestors become parent queues.
fn create(namespace: &dyn QueueNamespace, path: &str) -> Result<Placement, ResolveError> {
    match namespace.create_path(path, QueueKind::Leaf) {
        Ok(created) => Ok(Placement::Resolved(created)),
        Err(NamespaceError::LeafAncestor { path, leaf }) => {
            Err(ResolveError::LeafQueue { path, leaf })
        }
        Err(err) => {
            debug!(path, error = %err, "queue cannot be created");
            Ok(Placement::NoMatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QueueConfig, QueueTree, RuleConfig};

    fn tree() -> QueueTree {
        QueueTree::from_config(&[
            QueueConfig::leaf("testqueue"),
            QueueConfig::parent("testparent").with_child(QueueConfig::leaf("testchild")),
        ])
        .unwrap()
    }

    fn rule(config: RuleConfig) -> PlacementRule {
        PlacementRule::from_config(&config).unwrap()
    }

    #[test]
    fn missing_tag_is_no_match() {
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let ns = tree();
        let placement = r.resolve(&Application::new("app1"), &ns).unwrap();
        assert_eq!(placement, Placement::NoMatch);
        assert_eq!(ns.queue_count(), 4);
    }

    #[test]
    fn qualified_value_is_returned_unchanged() {
        let r = rule(RuleConfig::new("tag").value("label1"));
        let app = Application::new("app1").tag("label1", "root.testparent");
        assert_eq!(
            r.resolve(&app, &tree()).unwrap(),
            Placement::Resolved("root.testparent".into())
        );
    }

    #[test]
    fn qualified_value_created_when_allowed() {
        let ns = tree();
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let app = Application::new("app1").tag("label1", "root.new.deep");
        assert_eq!(
            r.resolve(&app, &ns).unwrap(),
            Placement::Resolved("root.new.deep".into())
        );
        assert_eq!(ns.kind("root.new"), Some(QueueKind::Parent));
        assert_eq!(ns.kind("root.new.deep"), Some(QueueKind::Leaf));
    }

    #[test]
    fn qualified_value_below_leaf_is_invalid() {
        let ns = tree();
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let app = Application::new("app1").tag("label1", "root.testqueue.sub");
        assert_eq!(
            r.resolve(&app, &ns).unwrap_err(),
            ResolveError::LeafQueue {
                path: "root.testqueue.sub".into(),
                leaf: "root.testqueue".into(),
            }
        );
    }

    #[test]
    fn malformed_qualified_value_is_no_match() {
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let app = Application::new("app1").tag("label1", "root..bad");
        assert_eq!(r.resolve(&app, &tree()).unwrap(), Placement::NoMatch);
    }

    #[test]
    fn simple_name_created_under_root() {
        let ns = tree();
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let app = Application::new("app1").tag("label1", "fresh");
        assert_eq!(
            r.resolve(&app, &ns).unwrap(),
            Placement::Resolved("root.fresh".into())
        );
        assert_eq!(ns.kind("root.fresh"), Some(QueueKind::Leaf));
    }

    #[test]
    fn simple_name_with_dot_is_one_segment() {
        let ns = tree();
        let r = rule(RuleConfig::new("user").create(true));
        let app = Application::new("app1").user("john.doe");
        assert_eq!(
            r.resolve(&app, &ns).unwrap(),
            Placement::Resolved("root.john_dot_doe".into())
        );
    }

    #[test]
    fn invalid_simple_name_is_no_match() {
        let ns = tree();
        let r = rule(RuleConfig::new("tag").value("label1").create(true));
        let app = Application::new("app1").tag("label1", "has space");
        assert_eq!(r.resolve(&app, &ns).unwrap(), Placement::NoMatch);
        assert_eq!(ns.queue_count(), 4);
    }

    #[test]
    fn parent_rule_creates_parent_queue() {
        let ns = tree();
        let r = rule(
            RuleConfig::new("tag")
                .value("label1")
                .create(true)
                .parent(RuleConfig::new("tag").value("label2").create(true)),
        );
        let app = Application::new("app1")
            .tag("label1", "child")
            .tag("label2", "group");
        assert_eq!(
            r.resolve(&app, &ns).unwrap(),
            Placement::Resolved("root.group.child".into())
        );
        assert_eq!(ns.kind("root.group"), Some(QueueKind::Parent));
        assert_eq!(ns.kind("root.group.child"), Some(QueueKind::Leaf));
    }

    #[test]
    fn qualified_value_under_parent_is_one_segment() {
        let ns = tree();
        let r = rule(
            RuleConfig::new("tag")
                .value("label1")
                .create(true)
                .parent(RuleConfig::new("tag").value("label2")),
        );
        let app = Application::new("app1")
            .tag("label1", "root.x")
            .tag("label2", "testparent");
        assert_eq!(
            r.resolve(&app, &ns).unwrap(),
            Placement::Resolved("root.testparent.root_dot_x".into())
        );
    }

    #[test]
    fn parent_error_propagates_unchanged() {
        let ns = tree();
        let inner = RuleConfig::new("tag")
            .value("b")
            .parent(RuleConfig::new("tag").value("a"));
        let r = rule(RuleConfig::new("tag").value("c").create(true).parent(inner));
        let app = Application::new("app1")
            .tag("a", "testqueue")
            .tag("b", "x")
            .tag("c", "y");
        assert_eq!(
            r.resolve(&app, &ns).unwrap_err(),
            ResolveError::LeafQueue {
                path: "root.testqueue.x".into(),
                leaf: "root.testqueue".into(),
            }
        );
    }

    #[test]
    fn creatable_parent_left_untouched_when_child_cannot_create() {
        let ns = tree();
        let r = rule(
            RuleConfig::new("tag")
                .value("label1")
                .parent(RuleConfig::new("tag").value("label2").create(true)),
        );
        let app = Application::new("app1")
            .tag("label1", "x")
            .tag("label2", "orphan");
        assert_eq!(r.resolve(&app, &ns).unwrap(), Placement::NoMatch);
        assert!(!ns.exists("root.orphan"));
        assert_eq!(ns.queue_count(), 4);
    }

    #[test]
    fn creatable_parent_left_untouched_for_invalid_child_name() {
        let ns = tree();
        let r = rule(
            RuleConfig::new("tag")
                .value("label1")
                .create(true)
                .parent(RuleConfig::new("tag").value("label2").create(true)),
        );
        let app = Application::new("app1")
            .tag("label1", "has space")
            .tag("label2", "orphan");
        assert_eq!(r.resolve(&app, &ns).unwrap(), Placement::NoMatch);
        assert!(!ns.exists("root.orphan"));
        assert_eq!(ns.queue_count(), 4);
    }

    #[test]
    fn middle_rule_without_create_blocks_whole_chain() {
        let ns = tree();
        let middle = RuleConfig::new("tag")
            .value("b")
            .parent(RuleConfig::new("tag").value("a").create(true));
        let r = rule(RuleConfig::new("tag").value("c").create(true).parent(middle));
        let app = Application::new("app1")
            .tag("a", "outer")
            .tag("b", "middle")
            .tag("c", "inner");
        assert_eq!(r.resolve(&app, &ns).unwrap(), Placement::NoMatch);
        assert_eq!(ns.queue_count(), 4);
    }

    #[test]
    fn qualified_parent_below_leaf_is_invalid_without_creating() {
        let ns = tree();
        let r = rule(
            RuleConfig::new("tag")
                .value("label1")
                .parent(RuleConfig::new("tag").value("label2").create(true)),
        );
        let app = Application::new("app1")
            .tag("label1", "x")
            .tag("label2", "root.testqueue.sub");
        assert_eq!(
            r.resolve(&app, &ns).unwrap_err(),
            ResolveError::LeafQueue {
                path: "root.testqueue.sub".into(),
                leaf: "root.testqueue".into(),
            }
        );
        assert_eq!(ns.queue_count(), 4);
    }
}
