//! Folder Operation Tests
//!
//! Settings that change what lands on disk, plus the maintenance
//! operations: delete, temp cleanup, debug text, initialization errors.

use crate::common::*;
use savestate::ConfigError;
use std::sync::Arc;

#[test]
fn raw_mode_round_trips_without_header() {
    let saves = TestSaves::with_config(|c| c.with_validation(false));
    let saved = saves.save(4, "raw", 4);

    let bytes = std::fs::read(saves.main_path()).unwrap();
    assert_eq!(bytes.first(), Some(&b'{'));
    assert_eq!(saves.streamer.load(), saved);
}

#[test]
fn raw_mode_recovers_from_backup() {
    let saves = TestSaves::with_config(|c| c.with_validation(false));
    saves.save(1, "good", 1);
    saves.save(1, "bad", 2);
    truncate_file(&saves.main_path(), 3);

    assert_eq!(saves.streamer.load().name, "good");
}

#[test]
fn test_savestate_bypasses_folder() {
    let pinned = Profile::clean(9, "pinned", 9);
    let saves = TestSaves::with_config(|c| c.with_test_savestate(pinned.clone()));
    saves.plant(&saves.main_path(), 1, "on disk", 1);

    let report = saves.streamer.load_report();
    assert_eq!(report.outcome, LoadOutcome::TestValue);
    assert_eq!(report.state, pinned);
}

#[test]
fn disabled_test_savestate_is_ignored() {
    let saves = TestSaves::with_config(|c| {
        c.with_test_savestate(Profile::clean(9, "pinned", 9)).with_use_test_savestate(false)
    });
    saves.plant(&saves.main_path(), 1, "on disk", 1);

    assert_eq!(saves.streamer.load().name, "on disk");
}

#[test]
fn debug_export_mirrors_last_save() {
    let saves = TestSaves::with_config(|c| c.with_debug_mode(true));
    saves.save(1, "first", 1);
    saves.save(2, "second", 2);

    let path = saves.dir.path().join("savestate_debug.json");
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(exported["name"], "second");
    assert_eq!(exported["version"], 2);
}

#[test]
fn max_frame_version_sends_new_headers_to_backups() {
    let saves = TestSaves::with_config(|c| c.with_max_frame_version(10));
    saves.plant(&saves.backup_path(0), 10, "newest allowed", 1);
    saves.plant(&saves.main_path(), 1000, "too new", 1);

    let report = saves.streamer.load_report();
    assert_eq!(
        report.outcome,
        LoadOutcome::Loaded {
            source: SlotSource::Backup(0)
        }
    );
    assert_eq!(report.state.name, "newest allowed");
}

#[test]
fn absurd_version_accepted_without_bound_or_migrator() {
    let saves = TestSaves::new();
    saves.plant(&saves.main_path(), 1000, "far future", 1);

    let report = saves.streamer.load_report();
    assert_eq!(
        report.outcome,
        LoadOutcome::Loaded {
            source: SlotSource::Main
        }
    );
    assert_eq!(report.state.version, 1000);
}

#[test]
fn delete_all_saves_clears_every_save_file() {
    let saves = TestSaves::with_config(|c| c.with_debug_mode(true).with_backup_count(2));
    for i in 0..4 {
        saves.save(1, "x", i);
    }
    saves.plant(&saves.backup_path(9), 1, "stale slot", 1);
    std::fs::write(saves.dir.path().join("notes.txt"), b"unrelated").unwrap();

    // main, debug, backup0, backup1, backup9
    assert_eq!(saves.streamer.delete_all_saves().unwrap(), 5);
    assert_eq!(
        saves.snapshot().into_keys().collect::<Vec<_>>(),
        vec!["notes.txt".to_string()]
    );
    assert_eq!(saves.streamer.load(), fallback_profile());
}

#[test]
fn cleanup_removes_interrupted_write() {
    let saves = TestSaves::new();
    saves.save(1, "ok", 1);
    let temp = saves.dir.path().join(".savestate.sav.tmp");
    std::fs::write(&temp, b"SAVE\x01\x00").unwrap();

    assert_eq!(saves.streamer.cleanup_temp_files().unwrap(), 1);
    assert!(!temp.exists());
    assert_eq!(saves.streamer.load().name, "ok");
}

#[test]
fn debug_text_of_backup_slot() {
    let saves = TestSaves::new();
    saves.save(1, "older", 1);
    saves.save(1, "newer", 2);

    let text = saves.streamer.debug_text(SlotSource::Backup(0)).unwrap();
    assert!(text.contains("older"));
    assert!(saves.streamer.debug_text(SlotSource::Backup(2)).is_err());
}

#[test]
fn builder_without_serializer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = SaveStreamer::builder(StreamerConfig::new(dir.path(), fallback_profile())).build();
    assert!(matches!(result, Err(ConfigError::MissingSerializer)));
}

#[test]
fn test_mode_without_value_fails_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let config = StreamerConfig::new(dir.path(), fallback_profile()).with_use_test_savestate(true);
    let result = SaveStreamer::builder(config)
        .serializer(Arc::new(JsonSerializer::new()))
        .build();
    assert!(matches!(result, Err(ConfigError::MissingTestSavestate)));
}
