//! Tests for the locks subsystem.

use super::*;
use crate::catalog::ComponentRole;
use crate::files::ShpFiles;
use crate::test_support::fast_config;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

#[test]
fn test_requestors_are_unique() {
    let a = Requestor::new("reader");
    let b = Requestor::new("reader");

    assert_ne!(a, b);
    assert_ne!(a.id(), b.id());
    assert_eq!(a.name(), b.name());
    assert_eq!(a, a.clone());
}

#[test]
fn test_requestor_display() {
    let r = Requestor::new("dbf-writer");
    assert_eq!(r.to_string(), format!("dbf-writer#{}", r.id()));
}

#[test]
fn test_access_display() {
    assert_eq!(Access::Read.to_string(), "read");
    assert_eq!(Access::Write.to_string(), "write");
}

#[test]
fn test_locker_creation() {
    let requestor = Requestor::new("reader");
    let locker = Locker::new("/data/roads.shp", &requestor, Access::Read, false);

    assert_eq!(locker.identifier, "/data/roads.shp");
    assert_eq!(locker.requestor, requestor);
    assert_eq!(locker.access, Access::Read);
    assert!(locker.owner.contains('@'));
    assert!(!locker.thread.is_empty());
    assert!(locker.age().num_minutes() < 1);
}

#[test]
fn test_locker_matches_exact_triple() {
    let requestor = Requestor::new("writer");
    let stranger = Requestor::new("writer");
    let locker = Locker::new("/data/roads.dbf", &requestor, Access::Write, false);

    assert!(locker.matches("/data/roads.dbf", &requestor, Access::Write));
    assert!(!locker.matches("/data/roads.dbf", &stranger, Access::Write));
    assert!(!locker.matches("/data/roads.dbf", &requestor, Access::Read));
    assert!(!locker.matches("/data/roads.shp", &requestor, Access::Write));
}

#[test]
fn test_locker_forced_trace_is_captured() {
    let requestor = Requestor::new("reader");
    let locker = Locker::new("/data/roads.shp", &requestor, Access::Read, true);
    assert_eq!(
        locker.trace().status(),
        std::backtrace::BacktraceStatus::Captured
    );
}

#[test]
fn test_locker_age_string_and_staleness() {
    let requestor = Requestor::new("reader");
    let mut locker = Locker::new("/data/roads.shp", &requestor, Access::Read, false);

    assert!(locker.age_string().ends_with('s'));
    assert!(!locker.is_stale(StdDuration::from_secs(60)));

    locker.created_at = Utc::now() - Duration::minutes(5);
    assert!(locker.age_string().contains('m'));
    assert!(locker.is_stale(StdDuration::from_secs(60)));

    locker.created_at = Utc::now() - Duration::hours(3);
    assert!(locker.age_string().contains('h'));
}

#[test]
fn test_locker_display() {
    let requestor = Requestor::new("shx-writer");
    let locker = Locker::new("/data/roads.shx", &requestor, Access::Write, false);

    let line = locker.to_string();
    assert!(line.starts_with("write lock on '/data/roads.shx'"));
    assert!(line.contains("shx-writer"));
    assert!(!line.contains('\n'));
}

#[test]
fn test_registry_register_and_remove() {
    let registry = LockerRegistry::new();
    let requestor = Requestor::new("reader");
    assert!(registry.is_empty());

    registry.register(Locker::new("/data/roads.shp", &requestor, Access::Read, false));
    assert_eq!(registry.len(), 1);

    let removed = registry
        .remove("/data/roads.shp", &requestor, Access::Read)
        .unwrap();
    assert_eq!(removed.identifier, "/data/roads.shp");
    assert!(registry.is_empty());
}

#[test]
fn test_registry_remove_mismatch_changes_nothing() {
    let registry = LockerRegistry::new();
    let requestor = Requestor::new("reader");
    registry.register(Locker::new("/data/roads.shp", &requestor, Access::Read, false));

    assert!(registry
        .remove("/data/roads.shp", &Requestor::new("other"), Access::Read)
        .is_none());
    assert!(registry
        .remove("/data/roads.shp", &requestor, Access::Write)
        .is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_stale_filter() {
    let registry = LockerRegistry::new();
    let requestor = Requestor::new("reader");

    let mut old = Locker::new("/data/roads.shp", &requestor, Access::Read, false);
    old.created_at = Utc::now() - Duration::minutes(10);
    registry.register(old);
    registry.register(Locker::new("/data/roads.dbf", &requestor, Access::Read, false));

    let stale = registry.stale(StdDuration::from_secs(60));
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].identifier, "/data/roads.shp");
}

#[test]
fn test_report_outstanding_logs_once() {
    let registry = LockerRegistry::new();
    let requestor = Requestor::new("leaky");
    registry.register(Locker::new("/data/roads.shp", &requestor, Access::Write, false));
    registry.register(Locker::new("/data/roads.dbf", &requestor, Access::Write, false));

    assert_eq!(registry.report_outstanding("/data/roads"), 2);
    assert!(registry.is_empty());
    assert_eq!(registry.report_outstanding("/data/roads"), 0);
}

#[test]
fn test_group_lock_try_and_unlock() {
    let lock = GroupLock::new();
    assert!(!lock.is_locked());

    assert!(lock.try_lock());
    assert!(lock.is_locked());
    assert!(!lock.try_lock());

    lock.unlock();
    assert!(!lock.is_locked());
    lock.lock();
    assert!(lock.is_locked());
    lock.unlock();
}

#[test]
fn test_auditor_pass_reports_stale_lockers() {
    let files = ShpFiles::with_config("/data/roads.shp", fast_config()).unwrap();
    let holder = Requestor::new("holder");

    let id = files.acquire_write(ComponentRole::Shp, &holder).unwrap();
    std::thread::sleep(StdDuration::from_millis(20));

    assert_eq!(LockAuditor::audit(&files, StdDuration::from_millis(1)), 1);
    assert_eq!(LockAuditor::audit(&files, StdDuration::from_secs(3600)), 0);

    // Auditing never releases anything.
    assert_eq!(files.lock_count(), 1);
    files.unlock_write(&id, &holder).unwrap();
}

#[test]
fn test_auditor_shutdown_on_drop() {
    let files = Arc::new(ShpFiles::with_config("/data/roads.shp", fast_config()).unwrap());
    let auditor = LockAuditor::start(
        &files,
        StdDuration::from_millis(10),
        StdDuration::from_secs(60),
    )
    .unwrap();

    std::thread::sleep(StdDuration::from_millis(30));
    assert!(!auditor.is_finished());
    drop(auditor);
}

#[test]
fn test_auditor_exits_when_set_is_dropped() {
    let files = Arc::new(ShpFiles::with_config("/data/roads.shp", fast_config()).unwrap());
    // Audit interval far longer than the wait below.
    let auditor = LockAuditor::start(
        &files,
        StdDuration::from_secs(3600),
        StdDuration::from_secs(60),
    )
    .unwrap();
    drop(files);

    let deadline = Instant::now() + StdDuration::from_secs(2);
    while !auditor.is_finished() && Instant::now() < deadline {
        std::thread::sleep(StdDuration::from_millis(10));
    }
    assert!(auditor.is_finished());
}

#[test]
fn test_auditor_uses_configured_interval() {
    let files = Arc::new(ShpFiles::with_config("/data/roads.shp", fast_config()).unwrap());
    let auditor = LockAuditor::start_configured(&files).unwrap();
    auditor.shutdown();
    drop(auditor);
}
