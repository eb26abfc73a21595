//! Integration tests for task create/read/update/delete through the client.
//!
//! Each test starts the task server in-process on an OS-assigned port and
//! drives it with [`TaskClient`] and [`TaskBoard`].

use std::sync::Arc;

use chrono::NaiveDate;
use taskboard::board::{BoardError, TaskBoard};
use taskboard::cache::{EditFormCache, FormField, TaskDraft};
use taskboard::client::{ClientError, TaskClient};
use taskboard_proto::input::TaskInput;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Priority, TaskId, TaskStatus};
use taskboard_server::routes::{self, AppState};
use taskboard_server::store::MemoryStore;

/// Start the task server in-process and return a client for it.
async fn start_server() -> (TaskClient, tokio::task::JoinHandle<()>) {
    let (addr, handle) = routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    let client = TaskClient::parse(&format!("http://{addr}")).unwrap();
    (client, handle)
}

fn rent_draft() -> TaskDraft {
    TaskDraft {
        title: "Pay rent".to_string(),
        description: "transfer before the 1st".to_string(),
        due_date: "2024-03-01".to_string(),
        priority: Priority::High,
        tags: "bills,home".to_string(),
        status: TaskStatus::NotStarted,
    }
}

// =============================================================================
// Scenario: "Pay rent"
// =============================================================================

#[tokio::test]
async fn pay_rent_create_then_complete() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client.clone());

    let created = board.submit_new(&rent_draft()).await.unwrap();
    assert_eq!(created.title, "Pay rent");
    assert_eq!(
        created.due_date,
        Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
    assert_eq!(board.list().tasks(), &[created.clone()]);

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut form = EditFormCache::new();
    form.set_task(&fetched);
    form.set_field(FormField::Status, "Completed").unwrap();
    let updated = board
        .submit_edit(&created.id, form.draft())
        .await
        .unwrap();

    let after = client.get(&created.id).await.unwrap();
    assert_eq!(after, updated);
    assert_eq!(after.status, TaskStatus::Completed);
    assert_eq!(after.id, created.id);
    assert_eq!(after.created_at, created.created_at);
    assert_eq!(after.title, created.title);
    assert_eq!(after.description, created.description);
    assert_eq!(after.due_date, created.due_date);
    assert_eq!(after.priority, created.priority);
    assert_eq!(after.tags, created.tags);
    assert!(after.updated_at >= created.updated_at);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn server_rejects_missing_fields_without_persisting() {
    let (client, _handle) = start_server().await;

    let no_title = TaskInput {
        title: None,
        ..rent_draft().to_input()
    };
    let err = client.create(&no_title).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, .. }));

    let no_due = TaskInput {
        due_date: None,
        ..rent_draft().to_input()
    };
    let err = client.create(&no_due).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "dueDate is required");
        }
        other => panic!("expected 400, got {other:?}"),
    }

    assert!(client.list(&TaskQuery::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn board_blocks_invalid_draft_before_sending() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client.clone());

    let draft = TaskDraft {
        tags: "waytoolongtag".to_string(),
        ..rent_draft()
    };
    let err = board.submit_new(&draft).await.unwrap_err();
    assert!(matches!(err, BoardError::Form(_)));
    assert!(client.list(&TaskQuery::all()).await.unwrap().is_empty());
}

// =============================================================================
// Update and delete edge cases
// =============================================================================

#[tokio::test]
async fn edit_of_unknown_task_rolls_back() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client);
    board.submit_new(&rent_draft()).await.unwrap();
    let before = board.list().clone();

    let err = board
        .submit_edit(&TaskId::new(), &rent_draft())
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::Client(ClientError::NotFound(_))));
    assert_eq!(board.list(), &before);
}

#[tokio::test]
async fn delete_of_unknown_id_leaves_list_unchanged() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client.clone());
    board.submit_new(&rent_draft()).await.unwrap();

    board.remove(&TaskId::new()).await.unwrap();
    assert_eq!(board.list().len(), 1);
    assert_eq!(client.list(&TaskQuery::all()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_removes_from_server_and_list() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client.clone());
    let task = board.submit_new(&rent_draft()).await.unwrap();

    board.remove(&task.id).await.unwrap();
    assert!(board.list().is_empty());
    assert!(matches!(
        client.get(&task.id).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn bulk_delete_counts_existing_tasks() {
    let (client, _handle) = start_server().await;
    let mut board = TaskBoard::new(client);
    let a = board.submit_new(&rent_draft()).await.unwrap();
    let b = board.submit_new(&rent_draft()).await.unwrap();
    let keep = board.submit_new(&rent_draft()).await.unwrap();

    let deleted = board
        .remove_many(&[a.id, b.id, TaskId::new()])
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(board.list().tasks(), &[keep]);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn snapshot_survives_server_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let store = MemoryStore::open(&path).await.unwrap();
    let (addr, handle) = routes::start_server_with_state("127.0.0.1:0", Arc::new(AppState::new(store)))
        .await
        .unwrap();
    let client = TaskClient::parse(&format!("http://{addr}")).unwrap();
    let created = client.create(&rent_draft().to_input()).await.unwrap();
    handle.abort();

    let reopened = MemoryStore::open(&path).await.unwrap();
    let (addr, _handle) =
        routes::start_server_with_state("127.0.0.1:0", Arc::new(AppState::new(reopened)))
            .await
            .unwrap();
    let client = TaskClient::parse(&format!("http://{addr}")).unwrap();
    assert_eq!(client.get(&created.id).await.unwrap(), created);
}
