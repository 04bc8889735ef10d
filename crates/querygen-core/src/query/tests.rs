use super::*;

fn source(origin: &str, content: &str) -> QuerySource {
    QuerySource::new(origin, content)
}

#[test]
fn compiles_named_blocks_in_order() {
    let sql = "-- Name: get_user_by_id\n\
               -- Returns: id name\n\
               -- ResultMode: one\n\
               SELECT id, name FROM users WHERE id = ?;\n\
               \n\
               -- Name: delete-user\n\
               -- ResultMode: exec\n\
               DELETE FROM users WHERE id = ?;";

    let queries = compile_sources(&[source("users.sql", sql)]).unwrap();

    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].name, "GetUserById");
    assert_eq!(queries[0].mode, ResultMode::One);
    assert_eq!(queries[0].origin, "users.sql#0");
    assert_eq!(queries[1].name, "DeleteUser");
    assert_eq!(queries[1].mode, ResultMode::Exec);
    assert_eq!(queries[1].query, "DELETE FROM users WHERE id = ?");
}

#[test]
fn encoded_query_decodes_to_stored_text() {
    let q = NamedQuery::new("Count", "SELECT COUNT(id) AS total FROM users", ResultMode::One);
    let decoded = STANDARD.decode(&q.query_encoded).unwrap();

    assert_eq!(String::from_utf8(decoded).unwrap(), q.query);
}

#[test]
fn select_star_is_rejected_with_position() {
    let sql = "-- Name: Ok\nSELECT id FROM t;\n-- Name: Bad\nSELECT * FROM t;";

    let err = compile_sources(&[source("bad.sql", sql)]).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::SelectStar { ref origin, index: 1, .. } if origin == "bad.sql"
    ));
}

#[test]
fn duplicate_names_collide_after_normalization() {
    let a = source("a.sql", "-- Name: list_users\nSELECT id FROM users");
    let b = source("b.sql", "-- Name: ListUsers\nSELECT name FROM users");

    let err = compile_sources(&[a, b]).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::DuplicateName { ref name, ref first, ref second }
            if name == "ListUsers" && first == "a.sql#0" && second == "b.sql#0"
    ));
}

#[test]
fn single_unnamed_block_takes_file_stem() {
    let queries =
        compile_sources(&[source("queries/count_active_users.sql", "SELECT id FROM users")])
            .unwrap();

    assert_eq!(queries[0].name, "CountActiveUsers");
}

#[test]
fn unnamed_block_among_several_is_an_error() {
    let sql = "-- Name: First\nSELECT a FROM t;\nSELECT b FROM t;";

    let err = compile_sources(&[source("multi.sql", sql)]).unwrap_err();
    assert!(matches!(err, ValidationError::MissingName { index: 1, .. }));
}

#[test]
fn name_that_cannot_be_an_identifier_is_rejected() {
    let err = compile_sources(&[source("x.sql", "-- Name: 2fa\nSELECT a FROM t")]).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidName { .. }));
}

#[test]
fn empty_and_comment_only_statements_are_skipped() {
    let sql = ";\n-- just a note\n;\n-- Name: Real\nSELECT a FROM t;\n  ;";

    let queries = compile_sources(&[source("sparse.sql", sql)]).unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].name, "Real");
}

#[test]
fn compiler_reports_added_count_per_source() {
    let mut compiler = QueryCompiler::new();

    let added = compiler
        .compile(&source("a.sql", "-- Name: A\nSELECT a FROM t;\n-- Name: B\nSELECT b FROM t;"))
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(compiler.finish().len(), 2);
}

#[test]
fn explicit_returns_win() {
    let q = NamedQuery::new("Q", "SELECT a, b, c FROM t", ResultMode::Many).with_returns(["x"]);

    assert_eq!(
        q.result_shape(),
        ResultShape::Rows {
            fields: vec!["x".into()],
            inferred: false,
        }
    );
}

#[test]
fn fields_are_inferred_without_returns() {
    let q = NamedQuery::new("Q", "SELECT u.id, u.name AS label FROM users u", ResultMode::One);

    assert_eq!(
        q.result_shape(),
        ResultShape::Rows {
            fields: vec!["id".into(), "label".into()],
            inferred: true,
        }
    );
}

#[test]
fn uninferable_projection_is_missing() {
    let no_from = NamedQuery::new("Q", "SELECT 1", ResultMode::Many);
    assert_eq!(no_from.result_shape(), ResultShape::Missing);

    let bad_name = NamedQuery::new("Q", "SELECT COUNT(id) FROM users", ResultMode::One);
    assert_eq!(bad_name.result_shape(), ResultShape::Missing);

    let qualified_star = NamedQuery::new("Q", "SELECT a.* FROM t a", ResultMode::Many);
    assert_eq!(qualified_star.result_shape(), ResultShape::Missing);
}

#[test]
fn duplicate_inferred_names_are_missing() {
    let join = NamedQuery::new(
        "Q",
        "SELECT u.id, p.id FROM users u JOIN posts p ON p.user_id = u.id",
        ResultMode::Many,
    );
    assert_eq!(join.result_shape(), ResultShape::Missing);

    // distinct raw names that normalize to the same field
    let folded = NamedQuery::new("Q", "SELECT user_id, userId FROM t", ResultMode::One);
    assert_eq!(folded.result_shape(), ResultShape::Missing);
}

#[test]
fn aliased_join_columns_are_inferred() {
    let join = NamedQuery::new(
        "Q",
        "SELECT u.id AS user_id, p.id AS post_id FROM users u JOIN posts p ON p.user_id = u.id",
        ResultMode::Many,
    );

    assert_eq!(
        join.result_shape(),
        ResultShape::Rows {
            fields: vec!["user_id".into(), "post_id".into()],
            inferred: true,
        }
    );
}

#[test]
fn explicit_returns_are_not_deduplicated() {
    let q = NamedQuery::new("Q", "SELECT u.id, p.id FROM users u JOIN posts p", ResultMode::Many)
        .with_returns(["id", "id"]);

    assert_eq!(
        q.result_shape(),
        ResultShape::Rows {
            fields: vec!["id".into(), "id".into()],
            inferred: false,
        }
    );
}

#[test]
fn exec_mode_has_exec_shape() {
    let q = NamedQuery::new("Q", "SELECT id FROM t", ResultMode::Exec).with_returns(["id"]);
    assert_eq!(q.result_shape(), ResultShape::Exec);
}

#[test]
fn params_come_from_declaration_or_placeholder() {
    assert!(NamedQuery::new("Q", "SELECT a FROM t WHERE b = ?", ResultMode::Many).has_params());
    assert!(
        NamedQuery::new("Q", "SELECT a FROM t", ResultMode::Many)
            .with_params(["b"])
            .has_params()
    );
    assert!(!NamedQuery::new("Q", "SELECT a FROM t WHERE b = '?'", ResultMode::Many).has_params());
}

#[test]
fn result_mode_parsing() {
    assert_eq!(ResultMode::parse("Many"), Some(ResultMode::Many));
    assert_eq!(ResultMode::parse(" exec , one"), Some(ResultMode::Exec));
    assert_eq!(ResultMode::parse(""), None);
    assert_eq!(ResultMode::default(), ResultMode::Many);
    assert_eq!(ResultMode::One.to_string(), "one");
}

#[test]
fn annotation_flags_carry_through() {
    let sql = "-- Name: Archive\n-- Tx\n-- Context\n-- ResultMode: exec\nUPDATE t SET a = 1";

    let q = &compile_sources(&[source("a.sql", sql)]).unwrap()[0];
    assert!(q.use_tx);
    assert!(q.use_ctx);
}
