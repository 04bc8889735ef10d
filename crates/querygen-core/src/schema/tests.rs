use super::*;

const SNAPSHOT: &str = r#"
[[tables]]
name = "users"
columns = [
    { name = "id", data_type = "int", column_type = "int(10) unsigned" },
    { name = "email", data_type = "varchar", column_type = "varchar(255)" },
    { name = "external_id", data_type = "char", column_type = "char(36)" },
]

[[tables]]
name = "audit_log"
columns = [
    { name = "at", data_type = "datetime", column_type = "datetime" },
]
"#;

#[test]
fn snapshot_lists_tables_by_name() {
    let mut snapshot = SchemaSnapshot::from_toml_str(SNAPSHOT).unwrap();

    assert_eq!(snapshot.table_names().unwrap(), ["audit_log", "users"]);
}

#[test]
fn introspect_maps_columns_in_order() {
    let mut snapshot = SchemaSnapshot::from_toml_str(SNAPSHOT).unwrap();
    let tables = introspect(&mut snapshot).unwrap();

    let users = &tables[1];
    assert_eq!(users.name, "users");

    let mapped: Vec<_> = users.fields.iter().map(|f| (f.name.as_str(), f.mapped)).collect();
    assert_eq!(
        mapped,
        [
            ("id", TargetType::UInt32),
            ("email", TargetType::String),
            ("external_id", TargetType::Uuid),
        ]
    );
}

#[test]
fn unmapped_type_aborts_introspection() {
    let mut snapshot = SchemaSnapshot::from_toml_str(
        r#"
        [[tables]]
        name = "shapes"
        columns = [{ name = "area", data_type = "geometry", column_type = "geometry" }]
        "#,
    )
    .unwrap();

    let err = introspect(&mut snapshot).unwrap_err();
    assert!(matches!(err, Error::Type(TypeError::Unmapped { .. })));
    assert_eq!(err.to_string(), "unhandled DB type: geometry (geometry)");
}

#[test]
fn unknown_table_is_reported() {
    let mut snapshot = SchemaSnapshot::default();

    assert!(matches!(
        snapshot.columns("ghost"),
        Err(IntrospectError::UnknownTable(name)) if name == "ghost"
    ));
}

#[test]
fn malformed_snapshot_is_rejected() {
    assert!(matches!(
        SchemaSnapshot::from_toml_str("[[tables]]\nnom = 1"),
        Err(IntrospectError::Snapshot(_))
    ));
}

#[test]
fn empty_schema_is_valid() {
    let mut snapshot = SchemaSnapshot::from_toml_str("").unwrap();
    assert!(introspect(&mut snapshot).unwrap().is_empty());
}

#[test]
fn snapshot_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.toml");
    std::fs::write(&path, SNAPSHOT).unwrap();

    assert_eq!(SchemaSnapshot::load(&path).unwrap().tables.len(), 2);
}
