use treesync::{compare, format_diff, parse_json, print, Node, OutputFormat, OutputOptions};

fn json(text: &str) -> Node {
    parse_json(text).unwrap()
}

fn plain(title: &str, actual: &str, base: &str, options: &OutputOptions) -> String {
    let diff = compare(&json(actual), &json(base));
    format_diff(title, &diff, &OutputFormat::Plain, options).unwrap()
}

#[test]
fn test_plain_object_layout() {
    let output = plain(
        "config",
        r#"{"a": 1, "b": 3, "c": 4}"#,
        r#"{"a": 1, "b": 2}"#,
        &OutputOptions::default(),
    );
    assert_eq!(
        output,
        "\n   [config] Deleted / Added\n\n   {\n     a: 1,\n -   b: 2,\n +   b: 3,\n +   c: 4,\n   },\n\nSummary: 1 added, 1 updated, 1 unchanged\n"
    );
}

#[test]
fn test_plain_array_layout() {
    let options = OutputOptions {
        summary: false,
        ..Default::default()
    };
    let output = plain("list", "[1, 3, 4]", "[1, 2, 3]", &options);
    assert_eq!(
        output,
        "\n   [list] Deleted / Added\n\n   [\n     1,\n -   2,\n     3,\n +   4,\n   ],\n\n"
    );
}

#[test]
fn test_nested_blocks_indent_two_spaces_per_level() {
    let options = OutputOptions {
        summary: false,
        ..Default::default()
    };
    let output = plain(
        "egg",
        r#"{"files": ["a.ts", "c.ts"]}"#,
        r#"{"files": ["a.ts"]}"#,
        &options,
    );
    assert!(output.contains("\n   {\n     files: [\n       \"a.ts\",\n +     \"c.ts\",\n     ],\n   },\n"));
}

#[test]
fn test_no_changes_summary() {
    let output = plain("same", r#"{"a": 1}"#, r#"{"a": 1}"#, &OutputOptions::default());
    assert!(output.ends_with("Summary: No changes\n"));
    assert!(!output.contains(" + "));
    assert!(!output.contains(" - "));
}

#[test]
fn test_compact_hides_unmodified_subtrees() {
    let options = OutputOptions {
        compact: true,
        summary: true,
    };
    let output = plain(
        "egg",
        r#"{"meta": {"x": 1}, "v": 2}"#,
        r#"{"meta": {"x": 1}, "v": 1}"#,
        &options,
    );
    assert!(!output.contains("meta"));
    assert!(output.contains(" -   v: 1,"));
    assert!(output.contains(" +   v: 2,"));
}

#[test]
fn test_print_writes_to_injected_sink() {
    let diff = compare(&json("[2]"), &json("[1]"));
    let mut sink: Vec<u8> = Vec::new();
    print("sink", &diff, &mut sink, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    let text = String::from_utf8(sink).unwrap();
    assert!(text.contains("[sink]"));
    assert!(text.contains(" -   1,\n +   2,"));
}

#[test]
fn test_json_format() {
    let diff = compare(&json(r#"{"a": 2, "b": true}"#), &json(r#"{"a": 1}"#));
    let output = format_diff("cfg", &diff, &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["title"], "cfg");
    assert_eq!(value["modified"], true);
    assert_eq!(
        value["diff"]["a"],
        serde_json::json!({"type": "updated", "value": 2, "old_value": 1})
    );
    assert_eq!(value["diff"]["b"], serde_json::json!({"type": "added", "value": true}));
    assert_eq!(value["stats"]["added"], 1);
    assert_eq!(value["stats"]["updated"], 1);
}

#[test]
fn test_terminal_contains_values() {
    let diff = compare(&Node::Number(43.0), &Node::Number(42.0));
    let output = format_diff("t", &diff, &OutputFormat::Terminal, &OutputOptions::default()).unwrap();
    assert!(output.contains("42"));
    assert!(output.contains("43"));
    assert!(output.contains("Deleted"));
}
