use chrono::{NaiveDate, NaiveDateTime};
use planbook_core::db::open_db_in_memory;
use planbook_core::{
    AuditLog, AuditLogQuery, AuditLogRepository, DomainError, RepoError, SqliteAuditLogRepository,
};

fn at(hour: u32, minute: u32, second: u32, milli: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_milli_opt(hour, minute, second, milli)
        .unwrap()
}

#[test]
fn append_and_get_roundtrip_keeps_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuditLogRepository::try_new(&conn).unwrap();

    let entry = AuditLog::new("task", "create id=1", at(9, 30, 15, 250));
    let id = repo.append_entry(&entry).unwrap();

    let loaded = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.ts, at(9, 30, 15, 250));
    assert_eq!(loaded.entity, "task");
    assert_eq!(loaded.action, "create id=1");
}

#[test]
fn list_is_newest_first_and_filters_by_entity_and_window() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuditLogRepository::try_new(&conn).unwrap();

    repo.append_entry(&AuditLog::new("task", "create id=1", at(8, 0, 0, 0)))
        .unwrap();
    repo.append_entry(&AuditLog::new("goal", "create id=1", at(9, 0, 0, 0)))
        .unwrap();
    repo.append_entry(&AuditLog::new("task", "update id=1", at(10, 0, 0, 0)))
        .unwrap();

    let actions: Vec<_> = repo
        .list_entries(&AuditLogQuery::default())
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, ["update id=1", "create id=1", "create id=1"]);

    let task_entries = repo
        .list_entries(&AuditLogQuery {
            entity: Some("task".to_string()),
            ..AuditLogQuery::default()
        })
        .unwrap();
    assert_eq!(task_entries.len(), 2);
    assert!(task_entries.iter().all(|entry| entry.entity == "task"));

    let window = repo
        .list_entries(&AuditLogQuery {
            since: Some(at(9, 0, 0, 0)),
            until: Some(at(10, 0, 0, 0)),
            ..AuditLogQuery::default()
        })
        .unwrap();
    assert_eq!(window.len(), 2);

    let latest = repo
        .list_entries(&AuditLogQuery {
            limit: Some(1),
            ..AuditLogQuery::default()
        })
        .unwrap();
    assert_eq!(latest[0].ts, at(10, 0, 0, 0));
}

#[test]
fn storage_refuses_to_rewrite_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuditLogRepository::try_new(&conn).unwrap();
    let id = repo
        .append_entry(&AuditLog::new("user", "create id=3", at(12, 0, 0, 0)))
        .unwrap();

    let result = conn.execute(
        "UPDATE audit_log SET ts = '2000-01-01 00:00:00.000' WHERE id = ?1;",
        [id],
    );
    assert!(result.is_err());
    assert_eq!(repo.get_entry(id).unwrap().unwrap().ts, at(12, 0, 0, 0));
}

#[test]
fn storage_default_timestamp_is_readable() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO audit_log (entity, action) VALUES ('category', 'create id=1');",
        [],
    )
    .unwrap();
    let repo = SqliteAuditLogRepository::try_new(&conn).unwrap();

    let entries = repo.list_entries(&AuditLogQuery::default()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity, "category");
}

#[test]
fn sub_millisecond_timestamp_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAuditLogRepository::try_new(&conn).unwrap();
    let ts = NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_micro_opt(8, 0, 0, 123_456)
        .unwrap();

    let err = repo
        .append_entry(&AuditLog::new("task", "create id=1", ts))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Domain(DomainError::SubMillisecondTimestamp { ts: rejected }) if rejected == ts
    ));
    assert!(repo
        .list_entries(&AuditLogQuery::default())
        .unwrap()
        .is_empty());
}
