use piscan_core::db::{open_db_in_memory, BUNDLED_TABLES_SQL};
use piscan_core::{
    Account, AccountRepository, NewItem, ScanService, SqliteAccountRepository,
    SqliteItemRepository, ANONYMOUS_EMAIL,
};
use rusqlite::Connection;

fn service(conn: &Connection) -> ScanService<SqliteAccountRepository<'_>, SqliteItemRepository<'_>> {
    ScanService::new(
        SqliteAccountRepository::new(conn),
        SqliteItemRepository::new(conn),
    )
}

#[test]
fn unknown_or_missing_email_falls_back_to_anonymous() {
    let conn = open_db_in_memory(BUNDLED_TABLES_SQL).unwrap();
    let service = service(&conn);

    let from_none = service.resolve_account(None).unwrap();
    let from_blank = service.resolve_account(Some("  ")).unwrap();
    let from_unknown = service.resolve_account(Some("who@example.org")).unwrap();

    assert_eq!(from_none.email, ANONYMOUS_EMAIL);
    assert_eq!(from_blank.id, from_none.id);
    assert_eq!(from_unknown.id, from_none.id);
}

#[test]
fn scans_are_recorded_under_the_resolved_account() {
    let conn = open_db_in_memory(BUNDLED_TABLES_SQL).unwrap();
    SqliteAccountRepository::new(&conn)
        .add_account(&Account::new("member@example.org", "member-code"))
        .unwrap();
    let service = service(&conn);

    let member_scan = service
        .record_scan(Some("member@example.org"), &NewItem::new("100"))
        .unwrap();
    service.record_scan(None, &NewItem::new("200")).unwrap();

    let member_items = service.items_for(Some("member@example.org")).unwrap();
    assert_eq!(member_items.len(), 1);
    assert_eq!(member_items[0].id, member_scan);

    let anonymous_items = service.items_for(None).unwrap();
    assert_eq!(anonymous_items.len(), 1);
    assert_eq!(anonymous_items[0].barcode, "200");
}

#[test]
fn set_favorite_toggles_favorites_listing() {
    let conn = open_db_in_memory(BUNDLED_TABLES_SQL).unwrap();
    let service = service(&conn);

    let id = service.record_scan(None, &NewItem::new("300")).unwrap();
    service.set_favorite(id, true).unwrap();
    assert_eq!(service.favorites_for(None).unwrap().len(), 1);

    service.set_favorite(id, false).unwrap();
    assert!(service.favorites_for(None).unwrap().is_empty());
    assert_eq!(service.items_for(None).unwrap().len(), 1);
}
