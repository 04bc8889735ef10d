use super::*;
use proptest::prelude::*;

fn split(input: &str) -> Vec<String> {
    split_statements(input)
}

#[test]
fn splits_simple_statements() {
    assert_eq!(split("SELECT 1; SELECT 2;"), ["SELECT 1", "SELECT 2"]);
}

#[test]
fn semicolon_inside_quotes_is_not_a_split_point() {
    assert_eq!(
        split("SELECT 'a;b;c'; SELECT 2;"),
        ["SELECT 'a;b;c'", "SELECT 2"]
    );
    assert_eq!(split(r#"SELECT "x;y"; SELECT 2"#), [r#"SELECT "x;y""#, "SELECT 2"]);
}

#[test]
fn trailing_statement_without_semicolon_is_kept() {
    assert_eq!(split("SELECT 1"), ["SELECT 1"]);
    assert_eq!(split("SELECT 1; SELECT 2"), ["SELECT 1", "SELECT 2"]);
}

#[test]
fn empty_and_whitespace_statements_are_dropped() {
    assert_eq!(split(" ; \nSELECT 1; ; SELECT 2; "), ["SELECT 1", "SELECT 2"]);
    assert!(split("  ;;\n;  ").is_empty());
}

#[test]
fn multiline_statement_keeps_inner_newlines() {
    assert_eq!(
        split("SELECT id\nFROM table\nWHERE col = 1;\nSELECT 2;"),
        ["SELECT id\nFROM table\nWHERE col = 1", "SELECT 2"]
    );
}

#[test]
fn comment_contents_never_split_or_open_quotes() {
    let input = "-- Name: A\n-- don't; split here\nSELECT 1;\n/* it's; fine */ SELECT 2;";
    assert_eq!(
        split(input),
        [
            "-- Name: A\n-- don't; split here\nSELECT 1",
            "/* it's; fine */ SELECT 2"
        ]
    );
}

#[test]
fn doubled_quotes_stay_inside_the_literal() {
    assert_eq!(
        split("SELECT 'it''s; ok'; SELECT 2"),
        ["SELECT 'it''s; ok'", "SELECT 2"]
    );
}

#[test]
fn strips_line_comment_keeping_newline() {
    assert_eq!(
        strip_comments("SELECT 1; -- comment\nSELECT 2;"),
        "SELECT 1; \nSELECT 2;"
    );
}

#[test]
fn strips_block_comments() {
    assert_eq!(strip_comments("SELECT /* inline comment */ 1;"), "SELECT  1;");
    assert_eq!(
        strip_comments("SELECT 1; /* comment\nacross lines */ SELECT 2;"),
        "SELECT 1;  SELECT 2;"
    );
}

#[test]
fn quoted_comment_markers_are_untouched() {
    for input in [
        "SELECT '-- not a comment';",
        "SELECT '/* not a comment */';",
        r#"SELECT "/* also not */";"#,
        "SELECT 'it''s -- still text';",
        r#"SELECT "say ""--hi""";"#,
    ] {
        assert_eq!(strip_comments(input), input);
    }
}

#[test]
fn strip_edge_cases() {
    assert_eq!(strip_comments(r#"SELECT "abc"; -- comment"#), r#"SELECT "abc"; "#);
    assert_eq!(
        strip_comments("SELECT 1; -- comment\n-- another\nSELECT 2;"),
        "SELECT 1; \n\nSELECT 2;"
    );
    assert_eq!(strip_comments("-- full comment line\n"), "\n");
    assert_eq!(strip_comments("SELECT 1; SELECT 2;"), "SELECT 1; SELECT 2;");
    assert_eq!(strip_comments("SELECT 1 /* never closed"), "SELECT 1 ");
}

#[test]
fn placeholders_outside_quotes_only() {
    assert!(has_placeholders("SELECT id FROM users WHERE id = ?"));
    assert!(!has_placeholders("SELECT '?' FROM users"));
    assert!(!has_placeholders("SELECT 1 -- why?\n"));
    assert!(!has_placeholders("SELECT 1"));
}

#[test]
fn whitespace_normalization() {
    assert_eq!(normalize_whitespace("  SELECT\n\tid ,\n name  "), "SELECT id , name");
}

proptest! {
    #[test]
    fn stripping_keeps_top_level_semicolons(
        parts in prop::collection::vec("[a-zA-Z0-9 ,=]{0,12}", 1..6)
    ) {
        let input = parts.join("; -- note\n");
        let stripped = strip_comments(&input);
        prop_assert_eq!(split_statements(&stripped), split_statements(&input)
            .iter()
            .map(|s| strip_comments(s).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>());
    }

    #[test]
    fn text_without_comment_markers_is_untouched(input in "[a-z0-9 ',;\n]{0,40}") {
        prop_assert_eq!(strip_comments(&input), input);
    }
}
