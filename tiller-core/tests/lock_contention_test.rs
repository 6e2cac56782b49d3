//! Lock contention tests
//!
//! Competing runner instances must never apply the same pending migration:
//! wait mode serializes them on the advisory lock, fail mode surfaces the
//! contention instead of proceeding unsynchronized.
//!
//! Run with: cargo test --test lock_contention_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use duckdb::Connection;
use tempfile::TempDir;

use tiller_core::adapters::duckdb::{self as target_db, DuckDbTarget};
use tiller_core::domain::migration::MigrationRecord;
use tiller_core::domain::{Error, Result as CoreResult, Revert};
use tiller_core::services::{LockMode, MigrationRunner, RunnerLock};

/// Number of competing runner instances.
/// Keep this realistic - in production at most a few deploy replicas race.
const RUNNER_COUNT: usize = 4;

fn create_one(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("CREATE TABLE one (id INTEGER)")?;
    Ok(())
}

fn drop_one(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("DROP TABLE one")?;
    Ok(())
}

fn create_two(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("CREATE TABLE two (id INTEGER)")?;
    Ok(())
}

fn drop_two(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("DROP TABLE two")?;
    Ok(())
}

fn create_three(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("CREATE TABLE three (id INTEGER)")?;
    Ok(())
}

fn drop_three(conn: &Connection) -> CoreResult<()> {
    conn.execute_batch("DROP TABLE three")?;
    Ok(())
}

const REGISTRY: &[MigrationRecord] = &[
    MigrationRecord {
        name: "1705600800000-CreateOne",
        up: create_one,
        down: Revert::Reversible(drop_one),
    },
    MigrationRecord {
        name: "1705600900000-CreateTwo",
        up: create_two,
        down: Revert::Reversible(drop_two),
    },
    MigrationRecord {
        name: "1705601000000-CreateThree",
        up: create_three,
        down: Revert::Reversible(drop_three),
    },
];

#[test]
fn test_fail_fast_mode_surfaces_contention() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.duckdb");
    let lock_path = temp_dir.path().join("tiller.lock");

    let target = Arc::new(DuckDbTarget::open(&db_path).unwrap());
    let runner = MigrationRunner::new(
        Arc::clone(&target),
        REGISTRY,
        lock_path.clone(),
        LockMode::Fail,
    );

    // Simulate another replica mid-run
    let held = RunnerLock::acquire(&lock_path, LockMode::Wait).unwrap();
    let err = runner.run_pending().unwrap_err();
    assert!(matches!(err, Error::LockContention(_)));

    // Nothing ran while the lock was contended
    assert!(!target
        .with_connection(target_db::ledger_exists)
        .unwrap());

    drop(held);
    let outcome = runner.run_pending().unwrap();
    assert_eq!(outcome.applied.len(), REGISTRY.len());
}

#[test]
fn test_wait_mode_applies_each_migration_exactly_once() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("store.duckdb");
    let lock_path = temp_dir.path().join("tiller.lock");

    let target = Arc::new(DuckDbTarget::open(&db_path).unwrap());

    let barrier = Arc::new(Barrier::new(RUNNER_COUNT));
    let total_applied = Arc::new(AtomicUsize::new(0));
    let error_count = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];

    for runner_id in 0..RUNNER_COUNT {
        let barrier = Arc::clone(&barrier);
        let target = Arc::clone(&target);
        let lock_path = lock_path.clone();
        let total_applied = Arc::clone(&total_applied);
        let error_count = Arc::clone(&error_count);

        let handle = thread::spawn(move || {
            let runner = MigrationRunner::new(target, REGISTRY, lock_path, LockMode::Wait);

            // Start all runners at once
            barrier.wait();

            match runner.run_pending() {
                Ok(outcome) => {
                    total_applied.fetch_add(outcome.applied.len(), Ordering::SeqCst);
                }
                Err(e) => {
                    eprintln!("Runner {}: failed: {}", runner_id, e);
                    error_count.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Whoever won the lock applied everything; the rest applied nothing
    assert_eq!(error_count.load(Ordering::SeqCst), 0);
    assert_eq!(total_applied.load(Ordering::SeqCst), REGISTRY.len());

    for table in ["one", "two", "three"] {
        assert!(target
            .with_connection(|conn| target_db::table_exists(conn, table))
            .unwrap());
    }
}
