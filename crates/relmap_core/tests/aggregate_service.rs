use relmap_core::db::open_db_in_memory;
use relmap_core::{
    row_count, AggregateServiceError, AggregateTable, Child, Fetched, Parent, ParentKey,
    SqliteAggregateService,
};
use uuid::Uuid;

#[test]
fn create_many_then_query_mirrors_key_shape() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteAggregateService::from_connection(&conn);

    let first = Parent::new(vec![Child::new(), Child::new()]);
    let second = Parent::new(vec![Child::new()]);
    let third = Parent::new(vec![Child::new(), first.children[0]]);

    let inserted = service
        .create_many(&[first.clone(), second.clone(), third.clone()])
        .unwrap();
    assert_eq!(inserted, 3);
    assert_eq!(row_count(&conn, AggregateTable::Parents).unwrap(), 3);
    assert_eq!(row_count(&conn, AggregateTable::Children).unwrap(), 4);
    assert_eq!(row_count(&conn, AggregateTable::ParentChildren).unwrap(), 5);

    let single = service.query(first.id).unwrap().into_one().unwrap();
    assert_eq!(single.id, first.id);
    assert_eq!(single.child_ids(), first.child_ids());

    let many = service.query(vec![first.id, second.id]).unwrap();
    assert_eq!(many, Fetched::Many(vec![first, second]));
}

#[test]
fn query_unknown_single_key_is_parent_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteAggregateService::from_connection(&conn);
    service
        .create_many(&[Parent::new(vec![Child::new()])])
        .unwrap();

    let missing = Uuid::new_v4();
    let err = service.query(ParentKey::One(missing)).unwrap_err();
    assert!(matches!(err, AggregateServiceError::ParentNotFound(id) if id == missing));
}

#[test]
fn query_many_with_unknown_keys_is_partial_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteAggregateService::from_connection(&conn);
    let stored = Parent::new(vec![Child::new()]);
    service.create_many(&[stored.clone()]).unwrap();

    let fetched = service
        .query(ParentKey::Many(vec![Uuid::new_v4(), stored.id]))
        .unwrap();
    assert_eq!(fetched.into_many(), vec![stored]);
}

#[test]
fn rejected_batch_reports_table_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteAggregateService::from_connection(&conn);
    let shared = Child::new();
    let stored = Parent::new(vec![shared]);
    service.create_many(&[stored.clone()]).unwrap();

    let err = service
        .create_many(&[Parent::new(Vec::new()), Parent::new(vec![shared])])
        .unwrap_err();
    assert!(matches!(
        err,
        AggregateServiceError::BatchRejected {
            table: AggregateTable::Children,
            ..
        }
    ));
    assert_eq!(row_count(&conn, AggregateTable::Parents).unwrap(), 1);
    assert_eq!(service.get(stored.id).unwrap(), stored);
}
