// Integration tests for online snapshots (SQLite backup API)

use rusqlite::Connection;
use sqlship_core::ShipError;
use sqlship_store::{BackupOptions, RowGenerator, SnapshotStore};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn populated_store(dir: &Path, rows: u32) -> (SnapshotStore, PathBuf) {
    let path = dir.join("people.sqlite");
    let mut store = SnapshotStore::open(&path).unwrap();
    store.ensure_schema().unwrap();
    store.insert_with(rows, &mut RowGenerator::seeded(11)).unwrap();
    (store, path)
}

fn lock_exclusively(path: &Path) -> Connection {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch("CREATE TABLE IF NOT EXISTS placeholder (x); BEGIN EXCLUSIVE;")
        .unwrap();
    conn
}

#[test]
fn test_backup_copy_has_same_row_count() {
    // Given: A store with 25 rows
    let temp_dir = TempDir::new().unwrap();
    let (store, _) = populated_store(temp_dir.path(), 25);
    let dest = temp_dir.path().join("snapshot.sqlite");

    // When: We back it up
    let info = store.backup(&dest).unwrap();

    // Then: The snapshot is described correctly
    assert_eq!(info.path, dest);
    assert!(info.size_bytes > 0);
    assert_eq!(info.size_bytes, std::fs::metadata(&dest).unwrap().len());

    // And: Opened independently, it holds the same rows
    let copy = SnapshotStore::open(&dest).unwrap();
    assert_eq!(copy.row_count().unwrap(), 25);
}

#[test]
fn test_backup_of_in_memory_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = SnapshotStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    store.insert_with(10, &mut RowGenerator::seeded(5)).unwrap();

    let dest = temp_dir.path().join("from-memory.sqlite");
    store.backup(&dest).unwrap();

    let conn = Connection::open(&dest).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 10);
}

#[test]
fn test_backup_waits_out_a_transient_lock() {
    // Given: The destination is exclusively locked by another connection
    let temp_dir = TempDir::new().unwrap();
    let (store, _) = populated_store(temp_dir.path(), 15);
    let dest = temp_dir.path().join("snapshot.sqlite");

    let (locked_tx, locked_rx) = mpsc::channel();
    let lock_path = dest.clone();
    let holder = thread::spawn(move || {
        let conn = lock_exclusively(&lock_path);
        locked_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(250));
        conn.execute_batch("COMMIT;").unwrap();
    });
    locked_rx.recv().unwrap();

    // When: We back up while the lock is held
    let result = store.backup_with(
        &dest,
        &BackupOptions {
            busy_pause: Duration::from_millis(20),
            ..BackupOptions::default()
        },
    );
    holder.join().unwrap();

    // Then: The busy steps were retried and the backup completed
    let info = result.expect("backup should succeed once the lock is released");
    assert!(info.size_bytes > 0);
    assert_eq!(SnapshotStore::open(&dest).unwrap().row_count().unwrap(), 15);
}

#[test]
fn test_backup_fails_cleanly_when_lock_persists() {
    // Given: A destination lock that is never released during the backup
    let temp_dir = TempDir::new().unwrap();
    let (store, _) = populated_store(temp_dir.path(), 5);
    let dest = temp_dir.path().join("snapshot.sqlite");
    let locker = lock_exclusively(&dest);

    // When: We back up with a small retry budget
    let err = store
        .backup_with(
            &dest,
            &BackupOptions {
                busy_pause: Duration::from_millis(5),
                max_busy_retries: 3,
                ..BackupOptions::default()
            },
        )
        .unwrap_err();

    // Then: A backup error is reported, not a success
    match err {
        ShipError::Backup { path, reason } => {
            assert_eq!(path, dest);
            assert!(reason.contains("busy/locked"), "{}", reason);
        }
        other => panic!("expected backup error, got {:?}", other),
    }
    locker.execute_batch("ROLLBACK;").unwrap();
}

#[test]
fn test_backup_with_concurrent_writer() {
    // Given: Another connection writing to the source while we back up
    let temp_dir = TempDir::new().unwrap();
    let (store, path) = populated_store(temp_dir.path(), 20);
    let dest = temp_dir.path().join("snapshot.sqlite");

    let writer = thread::spawn(move || {
        let conn = Connection::open(&path).unwrap();
        conn.busy_timeout(Duration::from_secs(5)).unwrap();
        for i in 0..30 {
            conn.execute(
                "INSERT INTO people (first_name, last_name, email, created_at)
                 VALUES ('Writer', 'Thread', ?1, '2024-01-01T00:00:00Z')",
                [format!("writer{}@example.com", i)],
            )
            .unwrap();
            thread::sleep(Duration::from_millis(2));
        }
    });

    // When: The backup runs during the writes
    let result = store.backup(&dest);
    writer.join().unwrap();

    // Then: It completes with a consistent row count
    result.unwrap();
    let count = SnapshotStore::open(&dest).unwrap().row_count().unwrap();
    assert!((20..=50).contains(&count), "unexpected row count {}", count);
}

#[test]
fn test_backup_into_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let (store, _) = populated_store(temp_dir.path(), 1);

    let err = store
        .backup(temp_dir.path().join("missing/dir/snapshot.sqlite"))
        .unwrap_err();

    assert!(matches!(err, ShipError::Backup { .. }));
}
