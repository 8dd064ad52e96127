use treesync::{OutputError, OutputFormat, ParseError, TreesyncError, WriteError};

#[test]
fn test_parse_error_display() {
    let err = ParseError::file_not_found("test.json");
    assert_eq!(err.to_string(), "File not found: test.json");
}

#[test]
fn test_unknown_format_error() {
    let err = ParseError::unknown_format("/path/to/file.txt");
    assert!(err.to_string().contains("Could not detect file format"));
    assert!(err.to_string().contains("/path/to/file.txt"));
}

#[test]
fn test_output_error_display() {
    let err = "xml".parse::<OutputFormat>().unwrap_err();
    assert!(matches!(err, OutputError::UnknownFormat { .. }));
    assert_eq!(err.to_string(), "Unknown output format: xml");
}

#[test]
fn test_treesync_error_from_parse_error() {
    let parse_err = ParseError::file_not_found("test.json");
    let err: TreesyncError = parse_err.into();
    assert!(matches!(err, TreesyncError::Parse(_)));
    assert_eq!(err.to_string(), "File not found: test.json");
}

#[test]
fn test_write_error_display() {
    let err = WriteError::unrepresentable("a string root");
    assert_eq!(err.to_string(), "Cannot represent a string root in TOML");
}
