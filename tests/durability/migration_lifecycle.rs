//! Migration Lifecycle Tests
//!
//! Old savestates are stepped to the current version on load, persisted
//! once, and the pre-migration file survives in the backups.

use crate::common::*;
use savestate::MigrationSteps;
use std::sync::Arc;

#[test]
fn each_step_applies_its_marker_once() {
    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 2, "old", 7);
    let saves = saves.with_migrator(history_migrator(5));

    let report = saves.streamer.load_report();
    assert_eq!(
        report.outcome,
        LoadOutcome::Migrated {
            source: SlotSource::Main,
            from: 2,
            to: 5
        }
    );
    assert_eq!(report.state.version, 5);
    assert_eq!(report.state.history, vec!["v2->v3", "v3->v4", "v4->v5"]);
    assert_eq!(report.state.name, "old");
    assert_eq!(report.state.level, 7);
}

#[test]
fn current_version_applies_no_steps() {
    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 5, "current", 1);
    let saves = saves.with_migrator(history_migrator(5));
    let before = saves.snapshot();

    let report = saves.streamer.load_report();
    assert_eq!(
        report.outcome,
        LoadOutcome::Loaded {
            source: SlotSource::Main
        }
    );
    assert!(report.state.history.is_empty());
    assert_eq!(report.state, Profile::new(5, "current", 1));
    assert_eq!(saves.snapshot(), before);
}

#[test]
fn migrated_state_is_persisted_once() {
    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 1, "old", 1);
    let original = std::fs::read(saves.main_path()).unwrap();
    let mut saves = saves.with_migrator(history_migrator(3));

    let migrated = saves.streamer.load();
    assert!(!migrated.is_dirty());
    assert_eq!(read_framed(&saves.main_path()), migrated);

    // Pre-migration file kept in the backups
    let snapshot = saves.snapshot();
    assert!(snapshot.values().any(|bytes| *bytes == original));

    // A restarted process loads the migrated file without stepping again
    saves.reopen();
    let again = saves.streamer.load_report();
    assert_eq!(
        again.outcome,
        LoadOutcome::Loaded {
            source: SlotSource::Main
        }
    );
    assert_eq!(again.state.history, vec!["v1->v2", "v2->v3"]);
}

#[test]
fn stalled_step_yields_fallback() {
    let stall: Arc<dyn Migrator<Profile>> =
        Arc::new(ChainMigrator::new(4, |p: Profile| Ok::<_, MigrationError>(p)));

    let result = stall.try_migrate(Profile::new(2, "stuck", 1));
    assert!(matches!(
        result,
        Err(MigrationError::Stalled {
            from: 2,
            produced: 2
        })
    ));

    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 2, "stuck", 1);
    let saves = saves.with_migrator(stall);

    let report = saves.streamer.load_report();
    assert_eq!(report.outcome, LoadOutcome::Fallback(FallbackReason::MigrationFailed));
    assert_eq!(report.state, fallback_profile());
}

#[test]
fn failing_step_leaves_main_untouched() {
    let failing: Arc<dyn Migrator<Profile>> = Arc::new(
        MigrationSteps::new(3)
            .step(1, |mut p: Profile| {
                p.version = 2;
                Ok(p)
            })
            .step(2, |_p: Profile| Err(MigrationError::step(2, "schema mismatch"))),
    );

    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 1, "old", 1);
    let original = std::fs::read(saves.main_path()).unwrap();
    let saves = saves.with_migrator(failing);

    assert_eq!(saves.streamer.load(), fallback_profile());
    assert_eq!(std::fs::read(saves.main_path()).unwrap(), original);
}

#[test]
fn future_version_yields_fallback() {
    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 1000, "from the future", 1);
    let saves = saves.with_migrator(history_migrator(3));

    let report = saves.streamer.load_report();
    assert_eq!(report.outcome, LoadOutcome::Fallback(FallbackReason::MigrationFailed));
}

#[test]
fn recovered_backup_is_migrated() {
    let saves = TestSaves::new();
    saves.plant(&saves.backup_path(0), 1, "backup", 2);
    std::fs::write(saves.main_path(), b"SAVE").unwrap();
    let saves = saves.with_migrator(history_migrator(2));

    let report = saves.streamer.load_report();
    assert_eq!(
        report.outcome,
        LoadOutcome::Migrated {
            source: SlotSource::Backup(0),
            from: 1,
            to: 2
        }
    );
    assert_eq!(read_framed(&saves.main_path()).history, vec!["v1->v2"]);
}

#[test]
fn migration_without_backups_still_persists() {
    let saves = TestSaves::with_config(|c| c.with_backup_count(0));
    saves.plant(&saves.main_path(), 1, "old", 1);
    let saves = saves.with_migrator(history_migrator(2));

    saves.streamer.load();
    assert_eq!(read_framed(&saves.main_path()).version, 2);
    assert_eq!(saves.snapshot().len(), 1);
}
