use crate::path::{self, PathError, QueuePath};
use crate::{BuildError, PlacementRule, RuleConfig, RuleKind};

type Constructor = fn(&RuleConfig) -> Result<RuleKind, BuildError>;

/// Rule kinds known to the factory, keyed by their configuration name.
const REGISTRY: &[(&str, Constructor)] = &[
    (RuleKind::TAG, tag_rule),
    (RuleKind::USER, user_rule),
    (RuleKind::PROVIDED, provided_rule),
    (RuleKind::FIXED, fixed_rule),
];

/// Names accepted in [`RuleConfig::name`].
#[must_use]
pub fn rule_kinds() -> Vec<&'static str> {
    REGISTRY.iter().map(|(name, _)| *name).collect()
}

pub(crate) fn build(config: &RuleConfig) -> Result<PlacementRule, BuildError> {
    let parent = match &config.parent {
        Some(parent) => Some(Box::new(build(parent).map_err(|source| {
            BuildError::Parent {
                kind: config.name.clone(),
                source: Box::new(source),
            }
        })?)),
        None => None,
    };

    let constructor = lookup(&config.name)?;
    let kind = constructor(config)?;

    if let RuleKind::Fixed { queue } = &kind {
        if parent.is_some() && path::is_qualified(queue) {
            return Err(BuildError::QualifiedWithParent {
                kind: config.name.clone(),
                value: queue.clone(),
            });
        }
    }

    Ok(PlacementRule {
        kind,
        create: config.create,
        parent,
    })
}

fn lookup(name: &str) -> Result<Constructor, BuildError> {
    REGISTRY
        .iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case(name))
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| BuildError::UnknownKind {
            kind: name.to_owned(),
        })
}

fn required_value(config: &RuleConfig) -> Result<&str, BuildError> {
    config
        .value
        .as_deref()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| BuildError::MissingValue {
            kind: config.name.clone(),
        })
}

fn tag_rule(config: &RuleConfig) -> Result<RuleKind, BuildError> {
    let key = required_value(config)?;
    Ok(RuleKind::Tag {
        key: key.to_owned(),
    })
}

fn user_rule(_config: &RuleConfig) -> Result<RuleKind, BuildError> {
    Ok(RuleKind::User)
}

fn provided_rule(_config: &RuleConfig) -> Result<RuleKind, BuildError> {
    Ok(RuleKind::Provided)
}

fn fixed_rule(config: &RuleConfig) -> Result<RuleKind, BuildError> {
    let queue = required_value(config)?;
    let invalid = |source: PathError| BuildError::InvalidValue {
        kind: config.name.clone(),
        value: queue.to_owned(),
        source,
    };
    let parsed = QueuePath::parse(queue).map_err(invalid)?;
    // A relative queue is looked up by name, so it must be a single segment.
    if !parsed.is_qualified() && parsed.depth() > 1 {
        return Err(invalid(PathError::new(
            queue,
            "a relative queue must be a single name, use a path starting with 'root.'",
        )));
    }
    Ok(RuleKind::Fixed {
        queue: queue.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_without_value_fails() {
        let err = build(&RuleConfig::new("tag")).unwrap_err();
        assert!(matches!(err, BuildError::MissingValue { kind } if kind == "tag"));
    }

    #[test]
    fn tag_with_empty_value_fails() {
        let err = build(&RuleConfig::new("tag").value("")).unwrap_err();
        assert!(matches!(err, BuildError::MissingValue { .. }));
    }

    #[test]
    fn tag_with_value_builds() {
        let rule = build(&RuleConfig::new("tag").value("label1").create(true)).unwrap();
        assert_eq!(rule.kind(), &RuleKind::Tag { key: "label1".into() });
        assert!(rule.can_create());
        assert!(rule.parent().is_none());
    }

    #[test]
    fn tag_with_parent_builds() {
        let rule = build(
            &RuleConfig::new("tag")
                .value("label1")
                .parent(RuleConfig::new("tag").value("label2")),
        )
        .unwrap();
        assert_eq!(rule.depth(), 2);
        assert_eq!(
            rule.parent().unwrap().kind(),
            &RuleKind::Tag { key: "label2".into() }
        );
    }

    #[test]
    fn invalid_parent_fails_whole_rule() {
        let err = build(
            &RuleConfig::new("tag")
                .value("label1")
                .parent(RuleConfig::new("tag")),
        )
        .unwrap_err();
        match err {
            BuildError::Parent { kind, source } => {
                assert_eq!(kind, "tag");
                assert!(matches!(*source, BuildError::MissingValue { .. }));
            }
            other => panic!("expected parent error, got {other:?}"),
        }
    }

    #[test]
    fn parent_failure_reported_before_own_failure() {
        let err = build(&RuleConfig::new("bogus").parent(RuleConfig::new("nope"))).unwrap_err();
        assert!(matches!(err, BuildError::Parent { .. }));
    }

    #[test]
    fn unknown_kind_fails() {
        let err = build(&RuleConfig::new("bogus").value("x")).unwrap_err();
        assert!(matches!(err, BuildError::UnknownKind { kind } if kind == "bogus"));
    }

    #[test]
    fn kind_lookup_ignores_case() {
        assert!(build(&RuleConfig::new("Tag").value("k")).is_ok());
        assert!(build(&RuleConfig::new("USER")).is_ok());
    }

    #[test]
    fn user_and_provided_need_no_value() {
        assert_eq!(build(&RuleConfig::new("user")).unwrap().kind(), &RuleKind::User);
        assert_eq!(
            build(&RuleConfig::new("provided")).unwrap().kind(),
            &RuleKind::Provided
        );
    }

    #[test]
    fn fixed_requires_valid_queue() {
        assert!(matches!(
            build(&RuleConfig::new("fixed")).unwrap_err(),
            BuildError::MissingValue { .. }
        ));
        assert!(matches!(
            build(&RuleConfig::new("fixed").value("root..a")).unwrap_err(),
            BuildError::InvalidValue { .. }
        ));
        let err = build(&RuleConfig::new("fixed").value("a.b")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidValue { .. }));
        assert!(err.to_string().contains("'value'"), "{err}");
        assert_eq!(
            build(&RuleConfig::new("fixed").value("batch")).unwrap().kind(),
            &RuleKind::Fixed { queue: "batch".into() }
        );
        assert_eq!(
            build(&RuleConfig::new("fixed").value("root.batch")).unwrap().kind(),
            &RuleKind::Fixed { queue: "root.batch".into() }
        );
    }

    #[test]
    fn qualified_fixed_with_parent_fails() {
        let err = build(
            &RuleConfig::new("fixed")
                .value("root.batch")
                .parent(RuleConfig::new("user")),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::QualifiedWithParent { .. }));
        assert!(build(
            &RuleConfig::new("fixed")
                .value("batch")
                .parent(RuleConfig::new("user"))
        )
        .is_ok());
    }

    #[test]
    fn registry_lists_kinds() {
        assert_eq!(rule_kinds(), vec!["tag", "user", "provided", "fixed"]);
    }
}
