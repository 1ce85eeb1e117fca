//! Local-first behavior of the sync coordinator against an in-memory mirror.

use chrono::{TimeZone, Utc};
use habits_core::{
    Database, Error, Frequency, HabitId, HabitUpdate, NewHabit, RemoteId, SyncConfig,
    SyncCoordinator, UserId,
};
use habits_rest_api_contract::DocumentId;
use habits_rest_client_mock::{MockCall, MockRemoteMirror};
use std::sync::Arc;
use std::time::Duration;

fn user() -> UserId {
    UserId::new("user-1")
}

fn local_only() -> SyncCoordinator {
    SyncCoordinator::new(Database::open_in_memory().unwrap())
}

fn mirrored(mock: &MockRemoteMirror) -> SyncCoordinator {
    local_only().with_remote(Arc::new(mock.clone()))
}

#[tokio::test]
async fn test_create_with_mirror_links_remote_id() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);

    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();

    assert!(created.is_mirrored());
    let remote_id = created.remote_id.clone().unwrap();
    assert!(mock.contains(&DocumentId::new(remote_id.as_str())));

    let habit = coordinator.queries().habit(created.id).unwrap();
    assert_eq!(habit.remote_id, Some(remote_id));
}

#[tokio::test]
async fn test_create_with_unreachable_mirror_stays_local() {
    let mock = MockRemoteMirror::offline();
    let coordinator = mirrored(&mock);

    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();

    assert_eq!(created.remote_id, None);
    let habits = coordinator.queries().all_habits(&user()).unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].title, "Run");
    assert_eq!(habits[0].frequency, Frequency::Daily);
    assert_eq!(habits[0].streak_count, 0);
    assert_eq!(habits[0].remote_id, None);
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_create_with_failing_mirror_stays_local() {
    let mock = MockRemoteMirror::new();
    mock.fail_creates(true);
    let coordinator = mirrored(&mock);

    let created = coordinator
        .create(NewHabit::new("Read", Frequency::Weekly, user()))
        .await
        .unwrap();

    assert_eq!(created.remote_id, None);
    assert_eq!(mock.document_count(), 0);
}

#[tokio::test]
async fn test_slow_mirror_is_abandoned_after_timeout() {
    let mock = MockRemoteMirror::new().with_latency(Duration::from_millis(500));
    let coordinator = mirrored(&mock).with_config(SyncConfig {
        remote_timeout: Duration::from_millis(50),
    });

    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();

    assert_eq!(created.remote_id, None);
    assert_eq!(coordinator.queries().all_habits(&user()).unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_without_mirror() {
    let coordinator = local_only();
    assert!(!coordinator.is_mirrored());

    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Monthly, user()))
        .await
        .unwrap();
    assert_eq!(created.remote_id, None);
}

#[tokio::test]
async fn test_invalid_input_rejected_before_remote_call() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);

    let err = coordinator
        .create(NewHabit::new("   ", Frequency::Daily, user()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let err = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, UserId::new("")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    assert!(mock.calls().is_empty());
    assert_eq!(coordinator.queries().all_habits(&user()).unwrap().len(), 0);
}

#[tokio::test]
async fn test_local_failure_propagates_after_remote_success() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);
    coordinator
        .database()
        .with_connection(|conn| {
            conn.execute_batch("DROP TABLE habits")?;
            Ok(())
        })
        .unwrap();

    let err = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Persistence(_)));
    // The mirror already accepted the document; nothing rolls it back.
    assert_eq!(mock.document_count(), 1);
}

#[tokio::test]
async fn test_delete_one_removes_local_and_remote() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);
    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();

    coordinator.delete_one(created.id).await.unwrap();

    assert!(coordinator.queries().all_habits(&user()).unwrap().is_empty());
    assert_eq!(mock.document_count(), 0);
}

#[tokio::test]
async fn test_delete_one_without_remote_id_skips_mirror() {
    let mock = MockRemoteMirror::offline();
    let coordinator = mirrored(&mock);
    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();
    mock.set_offline(false);

    coordinator.delete_one(created.id).await.unwrap();

    assert!(coordinator.queries().all_habits(&user()).unwrap().is_empty());
    let deletes = mock
        .calls()
        .into_iter()
        .filter(|call| matches!(call, MockCall::Delete { .. }))
        .count();
    assert_eq!(deletes, 0);
}

#[tokio::test]
async fn test_delete_one_survives_remote_failure() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);
    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();
    mock.fail_deletes(true);

    coordinator.delete_one(created.id).await.unwrap();

    assert!(coordinator.queries().all_habits(&user()).unwrap().is_empty());
    assert_eq!(mock.document_count(), 1);
}

#[tokio::test]
async fn test_delete_missing_habit_is_ok() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);

    coordinator.delete_one(HabitId(404)).await.unwrap();
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_delete_many_attempts_every_remote_delete() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);

    let mut ids = Vec::new();
    let mut remote_ids = Vec::new();
    for title in ["A", "B", "C"] {
        let created = coordinator
            .create(NewHabit::new(title, Frequency::Daily, user()))
            .await
            .unwrap();
        ids.push(created.id);
        remote_ids.push(created.remote_id.unwrap());
    }
    let keep = coordinator
        .create(NewHabit::new("Keep", Frequency::Daily, user()))
        .await
        .unwrap();

    let first = DocumentId::new(remote_ids[0].as_str());
    mock.fail_delete_of(first.clone());

    let report = coordinator.delete_many(&ids).await.unwrap();

    assert_eq!(report.requested, 3);
    assert_eq!(report.deleted_locally, 3);
    assert_eq!(report.remote_attempted, 3);
    assert_eq!(report.remote_deleted, 2);

    let remaining = coordinator.queries().all_habits(&user()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);

    assert!(mock.contains(&first));
    assert!(!mock.contains(&DocumentId::new(remote_ids[1].as_str())));
    assert!(!mock.contains(&DocumentId::new(remote_ids[2].as_str())));
}

#[tokio::test]
async fn test_delete_many_empty_is_noop() {
    let mock = MockRemoteMirror::new();
    let coordinator = mirrored(&mock);
    coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();

    let report = coordinator.delete_many(&[]).await.unwrap();

    assert_eq!(report.requested, 0);
    assert_eq!(report.deleted_locally, 0);
    assert_eq!(coordinator.queries().all_habits(&user()).unwrap().len(), 1);
    assert_eq!(mock.document_count(), 1);
}

#[tokio::test]
async fn test_delete_many_local_only_reports_no_remote_attempts() {
    let coordinator = local_only();
    let a = coordinator
        .create(NewHabit::new("A", Frequency::Daily, user()))
        .await
        .unwrap();

    let report = coordinator.delete_many(&[a.id, HabitId(999)]).await.unwrap();

    assert_eq!(report.requested, 2);
    assert_eq!(report.deleted_locally, 1);
    assert_eq!(report.remote_attempted, 0);
}

#[tokio::test]
async fn test_top_streaks_ranking() {
    let coordinator = local_only();
    for (title, streak) in [("A", 5), ("B", 2), ("C", 9)] {
        let created = coordinator
            .create(NewHabit::new(title, Frequency::Daily, user()))
            .await
            .unwrap();
        coordinator
            .update(created.id, &HabitUpdate::new().streak_count(streak))
            .unwrap();
    }

    let top = coordinator.queries().top_streaks(3).unwrap();
    let streaks: Vec<u32> = top.iter().map(|h| h.streak_count).collect();
    assert_eq!(streaks, vec![9, 5, 2]);
}

#[tokio::test]
async fn test_update_missing_habit_is_not_found() {
    let coordinator = local_only();
    let err = coordinator
        .update(HabitId(7), &HabitUpdate::new().title("Swim"))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { id: HabitId(7) }));
}

#[tokio::test]
async fn test_update_changes_only_patched_fields() {
    let coordinator = local_only();
    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()).with_description("5k"))
        .await
        .unwrap();

    coordinator
        .update(
            created.id,
            &HabitUpdate::new()
                .title("Run far")
                .remote_id(RemoteId::new("doc-9")),
        )
        .unwrap();

    let habit = coordinator.queries().habit(created.id).unwrap();
    assert_eq!(habit.title, "Run far");
    assert_eq!(habit.description, "5k");
    assert_eq!(habit.remote_id, Some(RemoteId::new("doc-9")));
}

#[tokio::test]
async fn test_completion_tracks_streaks() {
    let coordinator = local_only();
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
    let created = coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()).created_at(start))
        .await
        .unwrap();

    let day = |d: u32| Utc.with_ymd_and_hms(2026, 3, d, 19, 0, 0).unwrap();
    coordinator.complete_at(created.id, day(1)).unwrap();
    coordinator.complete_at(created.id, day(2)).unwrap();
    let habit = coordinator.complete_at(created.id, day(3)).unwrap();
    assert_eq!((habit.streak_count, habit.best_streak, habit.total_count), (3, 3, 3));

    let habit = coordinator.complete_at(created.id, day(6)).unwrap();
    assert_eq!((habit.streak_count, habit.best_streak, habit.total_count), (1, 3, 4));

    let err = coordinator.complete_at(HabitId(99), day(6)).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_habits_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("habits.db");

    let coordinator = SyncCoordinator::new(Database::open(&path).unwrap());
    coordinator
        .create(NewHabit::new("Run", Frequency::Daily, user()))
        .await
        .unwrap();
    coordinator.close().unwrap();

    let reopened = SyncCoordinator::new(Database::open(&path).unwrap());
    let habits = reopened.queries().all_habits(&user()).unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].title, "Run");
}
