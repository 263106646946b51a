use mysql_middleware::prelude::*;

fn record(pairs: &[(&str, RowValues)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

fn assert_parameter_error(result: Result<QueryAndParams, MysqlMiddlewareError>) {
    assert!(matches!(
        result,
        Err(MysqlMiddlewareError::ParameterError(_))
    ));
}

#[test]
fn where_placeholder_bind_mismatch_is_rejected() {
    let too_few = Where::new("id=? AND name=?", vec![RowValues::Int(1)]);
    assert_parameter_error(build_select("t", &SelectQuery::new().filter(too_few.clone())));
    assert_parameter_error(build_delete("t", Some(&too_few)));

    let too_many = Where::new("id=?", vec![RowValues::Int(1), RowValues::Int(2)]);
    assert_parameter_error(build_update(
        "t",
        &record(&[("a", RowValues::Int(0))]),
        Some(&too_many),
    ));
}

#[test]
fn empty_where_clause_with_binds_is_rejected() {
    // An empty clause with binds must not silently drop the filter; a
    // filtered delete degrading to a delete-all is the worst case.
    let orphaned_binds = Where::new("", vec![RowValues::Int(3)]);
    assert_parameter_error(build_delete("users", Some(&orphaned_binds)));
    assert_parameter_error(build_select(
        "users",
        &SelectQuery::new().filter(orphaned_binds.clone()),
    ));
    assert_parameter_error(build_update(
        "users",
        &record(&[("age", RowValues::Int(2))]),
        Some(&orphaned_binds),
    ));

    // An empty clause with zero binds is still treated as absent.
    let qp = build_delete("users", Some(&Where::new("", vec![]))).unwrap();
    assert_eq!(qp.query, "DELETE FROM users");
    assert!(qp.params.is_empty());
}

#[test]
fn empty_record_is_rejected() {
    let empty = Record::new();
    assert_parameter_error(build_insert("t", &empty));
    assert_parameter_error(build_update("t", &empty, None));
    assert_parameter_error(build_upsert("t", &empty, &[]));
}

#[test]
fn heterogeneous_batch_is_rejected() {
    let rows = vec![
        record(&[("a", RowValues::Int(1)), ("b", RowValues::Int(2))]),
        record(&[("a", RowValues::Int(3)), ("c", RowValues::Int(4))]),
    ];
    assert_parameter_error(build_insert_batch("t", &rows));

    // Same keys in a different order misaligns columns just the same.
    let rows = vec![
        record(&[("a", RowValues::Int(1)), ("b", RowValues::Int(2))]),
        record(&[("b", RowValues::Int(4)), ("a", RowValues::Int(3))]),
    ];
    assert_parameter_error(build_insert_batch("t", &rows));

    assert_parameter_error(build_insert_batch("t", &[]));
}

#[test]
fn upsert_with_only_key_columns_is_rejected() {
    let data = record(&[("id", RowValues::Int(1))]);
    assert_parameter_error(build_upsert("t", &data, &["id"]));
}

#[test]
fn error_kind_names_the_retry_category() {
    let config_err = MysqlMiddlewareError::ConfigError("database is required".to_string());
    assert_eq!(error_kind(&config_err), ErrorKind::Other);

    let io_err = MysqlMiddlewareError::MysqlError(mysql::Error::IoError(
        std::io::Error::from(std::io::ErrorKind::ConnectionReset),
    ));
    assert_eq!(error_kind(&io_err), ErrorKind::ConnectionLost);
}
