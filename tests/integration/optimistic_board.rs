//! Integration tests for the board's optimistic update cycle.
//!
//! After a confirmed mutation the list is re-derived from the server with the
//! board's current query, so the cache always ends up matching the store.

use taskboard::board::TaskBoard;
use taskboard::cache::{ListAction, TaskDraft, TaskListCache};
use taskboard::client::TaskClient;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Priority, TaskStatus};

async fn start_board() -> (TaskBoard, TaskClient, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskboard_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    let client = TaskClient::parse(&format!("http://{addr}")).unwrap();
    (TaskBoard::new(client.clone()), client, handle)
}

fn draft(title: &str, priority: Priority) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        due_date: "2024-06-01".to_string(),
        priority,
        ..TaskDraft::default()
    }
}

#[tokio::test]
async fn created_task_outside_filter_is_dropped_on_rederive() {
    let (mut board, _client, _handle) = start_board().await;
    board.submit_new(&draft("urgent one", Priority::High)).await.unwrap();
    board
        .load(TaskQuery::all().with_priority(Priority::High))
        .await
        .unwrap();

    board.submit_new(&draft("someday", Priority::Low)).await.unwrap();

    let titles: Vec<&str> = board.list().tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["urgent one"]);
}

#[tokio::test]
async fn rederived_list_replaces_provisional_record() {
    let (mut board, client, _handle) = start_board().await;
    let created = board.submit_new(&draft("a", Priority::Low)).await.unwrap();

    // Provisional ids are local; only the stored record remains.
    assert_eq!(board.list().len(), 1);
    assert_eq!(board.list().tasks()[0].id, created.id);
    assert_eq!(
        board.list().tasks(),
        client.list(&TaskQuery::all()).await.unwrap().as_slice()
    );
}

#[tokio::test]
async fn edit_refreshes_stale_cache() {
    let (mut board, client, _handle) = start_board().await;
    let task = board.submit_new(&draft("a", Priority::Low)).await.unwrap();

    // Another writer changes the task behind the board's back.
    let mut other = TaskDraft::from_task(&task);
    other.title = "renamed elsewhere".to_string();
    client.update(&task.id, &other.to_input()).await.unwrap();
    assert_eq!(board.list().get(&task.id).unwrap().title, "a");

    let mine = TaskDraft {
        status: TaskStatus::InProgress,
        ..TaskDraft::from_task(&client.get(&task.id).await.unwrap())
    };
    board.submit_edit(&task.id, &mine).await.unwrap();

    let cached = board.list().get(&task.id).unwrap();
    assert_eq!(cached.title, "renamed elsewhere");
    assert_eq!(cached.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn injected_cache_is_replaced_by_load() {
    let (_board, client, _handle) = start_board().await;
    client
        .create(&draft("stored", Priority::Medium).to_input())
        .await
        .unwrap();

    let mut stale = TaskListCache::new();
    let phantom = taskboard_proto::task::Task::create(
        taskboard_proto::task::TaskFields::new("phantom"),
        chrono::Utc::now(),
    );
    stale.apply(ListAction::Append(phantom));

    let mut board = TaskBoard::with_cache(client, stale);
    let titles: Vec<String> = board
        .load(TaskQuery::all())
        .await
        .unwrap()
        .iter()
        .map(|t| t.title.clone())
        .collect();
    assert_eq!(titles, vec!["stored"]);
}
