use saphire_console::db::prepare_draft_store;

mod common;

#[test]
fn test_creates_connection_pool() {
    let test_db = common::TestDb::new("test_pool.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_prepare_draft_store_is_idempotent() {
    let test_db = common::TestDb::new("test_prepare.db");
    assert!(prepare_draft_store(&test_db.pool()).is_ok());
    assert!(prepare_draft_store(&test_db.pool()).is_ok());
}
