//! Tests for diff module - file diffs, content rebuild, unified output.

use regex::Regex;

use omni_rewrite::{
    LineRewriter, ReplaceMode, apply_line_diffs, diff_file, generate_unified_diff,
};

#[test]
fn test_rebuild_equals_direct_line_replace() {
    let original = "use a::b;\nfn main() { b(); b(); }\n\n// b\n";
    let re = Regex::new(r"\bb\b").unwrap();
    let rewriter = LineRewriter::new(re.clone(), "c", ReplaceMode::All);

    let diff = diff_file("main.rs", original, &rewriter);
    let rebuilt = apply_line_diffs(original, &diff.lines);

    assert_eq!(rebuilt, re.replace_all(original, "c"));
    assert_eq!(diff.changed_lines(), 3);
}

#[test]
fn test_unified_diff_of_rebuilt_content() {
    let original = "line1\nline2\nline3\n";
    let rewriter = LineRewriter::new(Regex::new("line2").unwrap(), "modified", ReplaceMode::All);
    let diff = diff_file("f.txt", original, &rewriter);

    let unified = generate_unified_diff(&diff.path, original, &apply_line_diffs(original, &diff.lines));

    assert!(unified.starts_with("--- a/f.txt\n+++ b/f.txt\n@@ "));
    assert!(unified.contains("-line2"));
    assert!(unified.contains("+modified"));
}

#[test]
fn test_no_changes() {
    let content = "same content\n";
    assert_eq!(generate_unified_diff("same.txt", content, content), "");
}
