use super::*;
use proptest::prelude::*;

const CASES: &[(&str, &str)] = &[
    // basic expected formats
    ("table_name", "TableName"),
    ("Table_Name", "TableName"),
    ("tableName", "TableName"),
    ("TableName", "TableName"),
    ("TABLENAME", "Tablename"),
    ("entity_user_data", "EntityUserData"),
    ("userID", "UserId"),
    ("user_id", "UserId"),
    ("user1_data2", "User1Data2"),
    ("", ""),
    // edge casing
    ("_table_name", "TableName"),
    ("table_name_", "TableName"),
    ("__table__name__", "TableName"),
    ("table__name", "TableName"),
    ("user___id", "UserId"),
    ("order-items", "OrderItems"),
    ("app.users", "AppUsers"),
    // acronyms and numbers
    ("ip_address_v4", "IpAddressV4"),
    ("cpu_temp_stats", "CpuTempStats"),
    ("user2fa_status", "User2faStatus"),
    ("v2_api_users", "V2ApiUsers"),
    // camel case with acronyms
    ("userIDStats", "UserIdStats"),
    ("HTTPConnection", "HttpConnection"),
    ("OAuthToken", "OAuthToken"),
    // mixed case and garbage
    ("123abc", "123Abc"),
    ("abc123def", "Abc123Def"),
    ("___", ""),
    ("__", ""),
    ("_", ""),
    ("tableName!", "TableName!"),
    // unicode
    ("tést_tab", "TéstTab"),
    ("über_cool", "ÜberCool"),
    ("данные_пользователя", "ДанныеПользователя"),
];

#[test]
fn normalize_truth_table() {
    for (input, expected) in CASES {
        assert_eq!(normalize(input), *expected, "normalize({input:?})");
    }
}

#[test]
fn normalize_is_idempotent_on_reference_outputs() {
    for input in [
        "",
        "___",
        "user_id",
        "HTTPConnection",
        "OAuthToken",
        "tableName!",
        "über_cool",
        "user1_data2",
    ] {
        let once = normalize(input);
        assert_eq!(normalize(&once), once, "input {input:?}");
    }
}

#[test]
fn capitalize_truth_table() {
    let cases = [
        ("", ""),
        ("a", "A"),
        ("A", "A"),
        ("abc", "Abc"),
        ("Abc", "Abc"),
        ("ABC", "Abc"),
        ("äbc", "Äbc"),
        ("ÄBC", "Äbc"),
        ("1test", "1test"),
        ("тест", "Тест"),
    ];

    for (input, expected) in cases {
        assert_eq!(capitalize(input), expected, "capitalize({input:?})");
    }
}

#[test]
fn identifier_check_rejects_leading_digits_and_punctuation() {
    assert!(is_identifier("UserId"));
    assert!(is_identifier("ÜberCool"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("123Abc"));
    assert!(!is_identifier("TableName!"));
}

proptest! {
    #[test]
    fn snake_input_normalizes_idempotently(raw in "[a-z]{2,8}([_.-][a-z]{2,8}){0,4}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn camel_input_normalizes_idempotently(raw in "[a-z]{2,6}([A-Z][a-z]{1,6}){0,3}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn separators_never_survive(raw in "[a-z_.-]{0,24}") {
        let out = normalize(&raw);
        prop_assert!(!out.chars().any(|c| SEPARATORS.contains(&c)));
    }
}
