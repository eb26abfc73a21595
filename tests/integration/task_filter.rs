//! Integration tests for list filtering over HTTP.
//!
//! Seeds a small board of tasks, then checks each query parameter alone and
//! in combination as the server evaluates them.

use chrono::NaiveDate;
use taskboard::client::TaskClient;
use taskboard::view::{TaskView, search_views};
use taskboard_proto::input::TaskInput;
use taskboard_proto::query::TaskQuery;
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn input(title: &str, due: &str, priority: &str, tags: &str, status: &str) -> TaskInput {
    TaskInput {
        title: Some(title.to_string()),
        description: None,
        due_date: Some(due.to_string()),
        priority: Some(priority.to_string()),
        tags: Some(tags.to_string()),
        status: Some(status.to_string()),
    }
}

/// Start a server and seed it; tasks are created in the order listed.
async fn seeded() -> (TaskClient, tokio::task::JoinHandle<()>) {
    let (addr, handle) = taskboard_server::routes::start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    let client = TaskClient::parse(&format!("http://{addr}")).unwrap();

    for body in [
        input("Pay rent", "2024-01-15", "High", "urgent, low-cost", "Not Started"),
        input("Renew passport", "2024-02-01", "Medium", "nonurgent", "In Progress"),
        input("Water plants", "2024-01-31", "Low", "home", "Completed"),
        input("File taxes", "2024-04-15", "High", "Urgent,money", "In Progress"),
    ] {
        client.create(&body).await.unwrap();
    }
    (client, handle)
}

async fn titles(client: &TaskClient, query: &TaskQuery) -> Vec<String> {
    client
        .list(query)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect()
}

#[tokio::test]
async fn no_parameters_returns_all_newest_first() {
    let (client, _handle) = seeded().await;
    assert_eq!(
        titles(&client, &TaskQuery::all()).await,
        vec!["File taxes", "Water plants", "Renew passport", "Pay rent"]
    );
}

#[tokio::test]
async fn tag_is_whole_word_and_case_insensitive() {
    let (client, _handle) = seeded().await;
    assert_eq!(
        titles(&client, &TaskQuery::all().with_tag("urgent")).await,
        vec!["File taxes", "Pay rent"]
    );
}

#[tokio::test]
async fn title_is_substring() {
    let (client, _handle) = seeded().await;
    assert_eq!(
        titles(&client, &TaskQuery::all().with_title("re")).await,
        vec!["Renew passport", "Pay rent"]
    );
}

#[tokio::test]
async fn date_range_is_inclusive() {
    let (client, _handle) = seeded().await;
    let january = TaskQuery::all().with_due_range(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
    assert_eq!(
        titles(&client, &january).await,
        vec!["Water plants", "Pay rent"]
    );
}

#[tokio::test]
async fn status_and_priority_combine() {
    let (client, _handle) = seeded().await;
    let query = TaskQuery::all()
        .with_status(TaskStatus::InProgress)
        .with_priority(Priority::High);
    assert_eq!(titles(&client, &query).await, vec!["File taxes"]);

    let none = TaskQuery::all()
        .with_status(TaskStatus::Completed)
        .with_priority(Priority::High);
    assert!(titles(&client, &none).await.is_empty());
}

#[tokio::test]
async fn id_short_circuits_other_parameters() {
    let (client, _handle) = seeded().await;
    let all = client.list(&TaskQuery::all()).await.unwrap();
    let target: &Task = &all[0];

    let query = TaskQuery {
        tag: Some("no-such-tag".to_string()),
        ..TaskQuery::by_id(&target.id)
    };
    assert_eq!(client.list(&query).await.unwrap(), vec![target.clone()]);

    assert!(client
        .list(&TaskQuery::by_id(&TaskId::new()))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn local_search_runs_over_server_results() {
    let (client, _handle) = seeded().await;
    let today = date(2024, 2, 1);
    let views: Vec<TaskView> = client
        .list(&TaskQuery::all())
        .await
        .unwrap()
        .iter()
        .map(|t| TaskView::from_task(t, today))
        .collect();

    let hits = search_views(&views, "PLANTS");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].due, "31/1/2024");
    assert!(hits[0].expired);
    assert_eq!(hits[0].tags, vec!["home"]);
}
