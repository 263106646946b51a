use std::sync::Arc;

use mysql_middleware::prelude::*;

fn sample_result_set() -> ResultSet {
    let mut rs = ResultSet::with_capacity(2);
    rs.set_column_names(Arc::new(vec!["id".to_string(), "name".to_string()]));
    rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("alice".into())]);
    rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("bob".into())]);
    rs.rows_affected = 2;
    rs
}

#[test]
fn rows_share_column_metadata() {
    let rs = sample_result_set();
    assert_eq!(rs.results.len(), 2);

    let row = &rs.results[0];
    assert_eq!(row.column_index("name"), Some(1));
    assert_eq!(row.get("id"), Some(&RowValues::Int(1)));
    assert_eq!(row.get_by_index(1), Some(&RowValues::Text("alice".into())));
    assert_eq!(row.get("missing"), None);
}

#[test]
fn row_converts_to_ordered_record() {
    let rs = sample_result_set();
    let record = rs.results[1].to_record();

    // Column order survives the conversion.
    let keys: Vec<&String> = record.keys().collect();
    assert_eq!(keys, vec!["id", "name"]);
    assert_eq!(record.get("name"), Some(&RowValues::Text("bob".into())));
}

#[test]
fn empty_result_set_has_no_columns() {
    let rs = ResultSet::default();
    assert!(rs.results.is_empty());
    assert!(rs.column_names().is_none());
    assert_eq!(rs.rows_affected, 0);
    assert_eq!(rs.last_insert_id, None);
}

#[test]
fn row_values_accessors() {
    assert_eq!(RowValues::Int(5).as_int(), Some(&5));
    assert_eq!(RowValues::Text("x".into()).as_text(), Some("x"));
    assert_eq!(RowValues::Float(1.5).as_float(), Some(1.5));
    assert!(RowValues::Null.is_null());

    // Integer 0/1 coerce to bool, matching how MySQL stores booleans.
    assert_eq!(RowValues::Int(1).as_bool(), Some(&true));
    assert_eq!(RowValues::Int(0).as_bool(), Some(&false));
    assert_eq!(RowValues::Int(2).as_bool(), None);

    // Timestamps parse from the driver's text form.
    let ts = RowValues::Text("2024-06-15 10:30:00".into()).as_timestamp();
    assert!(ts.is_some());
}

#[test]
fn row_values_from_impls() {
    assert_eq!(RowValues::from(1i64), RowValues::Int(1));
    assert_eq!(RowValues::from("a"), RowValues::Text("a".into()));
    assert_eq!(RowValues::from(true), RowValues::Bool(true));
    assert_eq!(RowValues::from(2.5f64), RowValues::Float(2.5));
}
