use treesync::{apply, apply_with_report, compare, parse_json, DiffNode, DiffTree, Node};

fn json(text: &str) -> Node {
    parse_json(text).unwrap()
}

#[test]
fn test_apply_onto_baseline_reproduces_actual() {
    let base = json(r#"{"a": 1, "b": 2}"#);
    let actual = json(r#"{"a": 1, "b": 3, "c": 4}"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &base);
    assert_eq!(merged, actual);
    assert!(!conflict);
}

#[test]
fn test_apply_detects_conflict_and_new_value_wins() {
    let base = json(r#"{"a": 1, "b": 2}"#);
    let actual = json(r#"{"a": 1, "b": 3, "c": 4}"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &json(r#"{"a": 1, "b": 99}"#));
    assert!(conflict);
    assert_eq!(merged.as_object().unwrap().get("b"), Some(&Node::Number(3.0)));
    assert_eq!(merged.as_object().unwrap().get("c"), Some(&Node::Number(4.0)));
}

#[test]
fn test_conflict_report_details() {
    let base = json(r#"{"server": {"port": 80}}"#);
    let actual = json(r#"{"server": {"port": 8080}}"#);
    let diff = compare(&actual, &base);

    let report = apply_with_report(&diff, &json(r#"{"server": {"port": 81}}"#));
    assert!(report.has_conflict());
    assert_eq!(report.conflicts.len(), 1);
    let conflict = &report.conflicts[0];
    assert_eq!(conflict.path, vec!["server".to_string(), "port".to_string()]);
    assert_eq!(conflict.expected, Some(Node::Number(80.0)));
    assert_eq!(conflict.found, Some(Node::Number(81.0)));
    assert_eq!(conflict.resolved, Node::Number(8080.0));
}

#[test]
fn test_local_only_keys_survive() {
    let base = json(r#"{"name": "egg"}"#);
    let actual = json(r#"{"name": "egg", "version": "1.0.0"}"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &json(r#"{"name": "egg", "local": true}"#));
    assert!(!conflict);
    assert_eq!(merged, json(r#"{"name": "egg", "version": "1.0.0", "local": true}"#));
}

#[test]
fn test_common_trusts_local_value() {
    let base = json(r#"{"name": "egg", "v": 1}"#);
    let actual = json(r#"{"name": "egg", "v": 2}"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &json(r#"{"name": "renamed", "v": 1}"#));
    assert!(!conflict);
    assert_eq!(merged, json(r#"{"name": "renamed", "v": 2}"#));
}

#[test]
fn test_removed_key_is_deleted_from_target() {
    let diff = compare(&json(r#"{"a": 1}"#), &json(r#"{"a": 1, "b": 2}"#));
    let (merged, conflict) = apply(&diff, &json(r#"{"a": 1, "b": 2}"#));
    assert_eq!(merged, json(r#"{"a": 1}"#));
    assert!(!conflict);
}

#[test]
fn test_array_reconciliation() {
    let base = json("[1, 2, 3]");
    let actual = json("[1, 3, 4]");
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &base);
    assert_eq!(merged, actual);
    assert!(!conflict);
}

#[test]
fn test_array_grown_locally_keeps_tail() {
    let base = json(r#"["a.ts", "b.ts"]"#);
    let actual = json(r#"["a.ts", "c.ts"]"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &json(r#"["a.ts", "b.ts", "local.ts"]"#));
    assert!(!conflict);
    assert_eq!(merged, json(r#"["a.ts", "c.ts", "local.ts"]"#));
}

#[test]
fn test_absent_slot_uses_diff_values() {
    let base = json(r#"{"meta": {"a": 1}}"#);
    let actual = json(r#"{"meta": {"a": 1, "b": 2}}"#);
    let diff = compare(&actual, &base);

    let (merged, conflict) = apply(&diff, &json("{}"));
    assert!(!conflict);
    assert_eq!(merged, actual);
}

#[test]
fn test_update_against_absent_slot_conflicts() {
    let diff = compare(&json(r#"{"a": 2}"#), &json(r#"{"a": 1}"#));
    let (merged, conflict) = apply(&diff, &json("{}"));
    assert!(conflict);
    assert_eq!(merged, json(r#"{"a": 2}"#));
}

#[test]
fn test_container_kind_mismatch_conflicts() {
    let diff = compare(&json(r#"{"list": [1, 2]}"#), &json(r#"{"list": [1]}"#));
    let report = apply_with_report(&diff, &json(r#"{"list": "not a list"}"#));
    assert!(report.has_conflict());
    assert_eq!(report.value, json(r#"{"list": [1, 2]}"#));
    assert_eq!(report.conflicts[0].expected, None);
}

#[test]
fn test_merging_continues_after_conflict() {
    let base = json(r#"{"a": 1, "b": 1}"#);
    let actual = json(r#"{"a": 2, "b": 2}"#);
    let diff = compare(&actual, &base);

    let report = apply_with_report(&diff, &json(r#"{"a": 9, "b": 9}"#));
    assert_eq!(report.conflicts.len(), 2);
    assert_eq!(report.value, actual);
}

#[test]
fn test_apply_does_not_mutate_inputs() {
    let base = json(r#"{"a": 1, "list": [1, 2]}"#);
    let actual = json(r#"{"a": 2, "list": [1, 2, 3], "new": null}"#);
    let diff = compare(&actual, &base);
    let diff_before = diff.clone();
    let target = json(r#"{"a": 1, "list": [1, 2], "mine": "x"}"#);
    let target_before = target.clone();

    let first = apply(&diff, &target);
    let second = apply(&diff, &target);
    assert_eq!(first, second);
    assert_eq!(diff, diff_before);
    assert_eq!(target, target_before);
}

#[test]
fn test_root_removal_merges_to_null() {
    let diff = DiffTree::Node(DiffNode::Removed(Node::Bool(true)));
    assert_eq!(apply(&diff, &Node::Bool(true)), (Node::Null, false));
}

#[test]
fn test_scalar_update_already_applied() {
    let diff = compare(&json("3"), &json("2"));
    assert_eq!(apply(&diff, &json("3")), (json("3"), false));
    assert_eq!(apply(&diff, &json("2")), (json("3"), false));
    assert_eq!(apply(&diff, &json("7")), (json("3"), true));
}
