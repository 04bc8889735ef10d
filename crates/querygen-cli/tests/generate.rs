use clap::Parser;
use querygen_cli::{Cli, CliError, execute};
use std::{fs, path::Path};

const SNAPSHOT: &str = r#"
[[tables]]
name = "users"
columns = [
    { name = "id", data_type = "int", column_type = "int(10) unsigned" },
    { name = "email", data_type = "varchar", column_type = "varchar(255)" },
]

[[tables]]
name = "order_items"
columns = [
    { name = "order_id", data_type = "bigint", column_type = "bigint(20)" },
    { name = "price", data_type = "decimal", column_type = "decimal(10,2)" },
]
"#;

fn cli(dir: &Path, extra: &[&str]) -> Cli {
    let snapshot = dir.join("schema.toml");
    let out = dir.join("out");
    let mut args = vec![
        "querygen".to_string(),
        "--schema-snapshot".into(),
        snapshot.display().to_string(),
        "--db-name".into(),
        "shop".into(),
        "--output-path".into(),
        out.display().to_string(),
        "--no-rustfmt".into(),
        "--config".into(),
        dir.join("querygen.toml").display().to_string(),
    ];
    args.extend(extra.iter().map(ToString::to_string));

    Cli::try_parse_from(args).unwrap()
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("schema.toml"), SNAPSHOT).unwrap();
    fs::write(dir.path().join("querygen.toml"), "").unwrap();
    dir
}

#[test]
fn snapshot_run_writes_entities_queries_and_index() {
    let dir = workspace();
    let sql = dir.path().join("sql");
    fs::create_dir(&sql).unwrap();
    fs::write(
        sql.join("users.sql"),
        "-- Name: UserEmail\n-- ResultMode: one\nSELECT email FROM users WHERE id = ?;\n",
    )
    .unwrap();

    let queries = sql.display().to_string();
    let summary = execute(cli(dir.path(), &["--queries-path", &queries])).unwrap();

    assert_eq!(summary.module, "shop");
    assert_eq!(summary.tables, 2);
    assert_eq!(summary.queries, 1);

    let root = dir.path().join("out").join("shop");
    for file in ["order_items.rs", "users.rs", "queries.rs", "mod.rs"] {
        assert!(root.join(file).is_file(), "{file}");
    }

    let queries = fs::read_to_string(root.join("queries.rs")).unwrap();
    assert!(queries.contains("UserEmailRow"));
    assert!(queries.contains("fn user_email_ctx_tx"));
}

#[test]
fn invalid_queries_path_only_skips_queries() {
    let dir = workspace();
    let missing = dir.path().join("no-such-dir").display().to_string();

    let summary = execute(cli(dir.path(), &["--queries-path", &missing])).unwrap();

    assert_eq!(summary.queries, 0);
    assert!(dir.path().join("out/shop/users.rs").is_file());
}

#[test]
fn select_star_aborts_the_run() {
    let dir = workspace();
    let file = dir.path().join("bad.sql");
    fs::write(&file, "-- Name: Everything\nSELECT * FROM users;\n").unwrap();

    let path = file.display().to_string();
    let err = execute(cli(dir.path(), &["--queries-path", &path])).unwrap_err();

    assert!(matches!(err, CliError::Core(_)));
    assert!(err.to_string().contains("SELECT *"));
}

#[test]
fn config_file_supplies_missing_flags() {
    let dir = workspace();
    fs::write(
        dir.path().join("querygen.toml"),
        format!(
            "[output]\npath = {:?}\nrustfmt = false\n",
            dir.path().join("from_config").display().to_string()
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "querygen".to_string(),
        "--schema-snapshot".into(),
        dir.path().join("schema.toml").display().to_string(),
        "--db-name".into(),
        "shop".into(),
        "--config".into(),
        dir.path().join("querygen.toml").display().to_string(),
    ])
    .unwrap();

    execute(cli).unwrap();
    assert!(dir.path().join("from_config/shop/mod.rs").is_file());
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = workspace();
    fs::remove_file(dir.path().join("schema.toml")).unwrap();

    let err = execute(cli(dir.path(), &[])).unwrap_err();
    assert!(matches!(err, CliError::Core(_)));
}
