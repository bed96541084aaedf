//! Tests for the JSON shapes exchanged with the browser form.

use serde_json::{Value, json};

use omni_rewrite::{FileDiff, LineDiff, Query, QueryResult};

#[test]
fn test_query_accepts_form_body() {
    let body = r#"{"Directory":"src","FileSuffixes":[".rs"],"MatchContent":"foo","ReplaceContent":"","Commit":true}"#;
    let query: Query = serde_json::from_str(body).unwrap();

    assert_eq!(query.directory, "src");
    assert_eq!(query.file_suffixes, vec![".rs"]);
    assert_eq!(query.replace_content, "");
    assert!(query.commit);
}

#[test]
fn test_query_missing_fields_default() {
    let query: Query = serde_json::from_str(r#"{"Directory":"x"}"#).unwrap();
    assert!(query.file_suffixes.is_empty());
    assert!(!query.commit);
}

#[test]
fn test_result_omits_empty_error_and_rewritten() {
    let result = QueryResult {
        error: String::new(),
        files: vec![FileDiff {
            path: "a.txt".to_string(),
            lines: vec![
                LineDiff {
                    line: 0,
                    text: "foo".to_string(),
                    rewritten: Some("qux".to_string()),
                },
                LineDiff {
                    line: 2,
                    text: "foo".to_string(),
                    rewritten: None,
                },
            ],
        }],
    };

    let value: Value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({
            "Files": [{
                "Path": "a.txt",
                "Lines": [
                    {"Line": 0, "Text": "foo", "Rewritten": "qux"},
                    {"Line": 2, "Text": "foo"}
                ]
            }]
        })
    );
}

#[test]
fn test_error_result_keeps_empty_files_array() {
    let result = QueryResult {
        error: "invalid pattern".to_string(),
        files: Vec::new(),
    };
    let value: Value = serde_json::to_value(&result).unwrap();
    assert_eq!(value, json!({"Error": "invalid pattern", "Files": []}));
}
