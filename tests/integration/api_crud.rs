// Test-specific lint overrides: integration tests use unwrap/expect freely,
// and some pedantic/nursery lints are not appropriate for test code.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::missing_docs_in_private_items
)]

//! End-to-end CRUD tests for the JSON API.
//!
//! Each test starts a real server on an OS-assigned port over a shared
//! in-memory store and speaks JSON over HTTP, exercising the full
//! route → document-operation → persistence path.

use std::sync::Arc;

use choreboard_model::Document;
use choreboard_server::api;
use choreboard_server::store::{AppState, MemoryStore};
use serde_json::{Value, json};

/// Starts a server over a fresh in-memory store, returning the base URL
/// and a handle observing what the server persists.
async fn start_server(doc: Document) -> (String, MemoryStore) {
    let store = MemoryStore::new(doc);
    let state = Arc::new(AppState::new(store.clone()));
    let (addr, _handle) = api::start_server_with_state("127.0.0.1:0", state)
        .await
        .expect("failed to start test server");
    (format!("http://{addr}"), store)
}

async fn get_data(client: &reqwest::Client, base: &str) -> Value {
    client
        .get(format!("{base}/api/data"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn room_task_member_crud_flow() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let member: Value = client
        .post(format!("{base}/api/members"))
        .json(&json!({ "name": "Alice" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let member_id = member["id"].as_str().unwrap().to_string();

    let room: Value = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen", "recurrence": 7 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let room_id = room["id"].as_str().unwrap().to_string();

    let task: Value = client
        .post(format!("{base}/api/rooms/{room_id}/tasks"))
        .json(&json!({ "name": "Do dishes", "assigned_to": member_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // No recurrence supplied: the room default is inherited.
    assert_eq!(task["recurrence"], json!(7));

    let data = get_data(&client, &base).await;
    let tasks = data["rooms"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Do dishes");
    assert_eq!(tasks[0]["assignee_name"], "Alice");
    assert_eq!(tasks[0]["is_due"], json!(true));
}

#[tokio::test]
async fn member_delete_cascades_across_rooms() {
    let (base, store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let member: Value = client
        .post(format!("{base}/api/members"))
        .json(&json!({ "name": "Alice" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let member_id = member["id"].as_str().unwrap().to_string();

    for (room_name, task_name) in [("Kitchen", "Dishes"), ("Bathroom", "Scrub tub")] {
        let room: Value = client
            .post(format!("{base}/api/rooms"))
            .json(&json!({ "name": room_name }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let room_id = room["id"].as_str().unwrap();
        client
            .post(format!("{base}/api/rooms/{room_id}/tasks"))
            .json(&json!({ "name": task_name, "assigned_to": member_id }))
            .send()
            .await
            .unwrap();
    }

    let removed: Value = client
        .delete(format!("{base}/api/members/{member_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["removed"], json!(true));

    let data = get_data(&client, &base).await;
    assert!(data["members"].as_array().unwrap().is_empty());
    for room in data["rooms"].as_array().unwrap() {
        for task in room["tasks"].as_array().unwrap() {
            assert_eq!(task["assigned_to"], Value::Null);
        }
    }

    // The cascade reached the persisted document, not just the view.
    let persisted = store.snapshot();
    assert!(persisted.members.is_empty());
    assert!(
        persisted
            .rooms
            .iter()
            .flat_map(|r| &r.tasks)
            .all(|t| t.assigned_to.is_none())
    );
}

#[tokio::test]
async fn unknown_ids_return_not_found() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/rooms/room99/tasks"))
        .json(&json!({ "name": "Mop" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    let resp = client
        .post(format!("{base}/api/rooms/room99/tasks/task99/complete"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn assigning_unknown_member_is_not_found() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let room: Value = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let room_id = room["id"].as_str().unwrap();
    let task: Value = client
        .post(format!("{base}/api/rooms/{room_id}/tasks"))
        .json(&json!({ "name": "Mop" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let task_id = task["id"].as_str().unwrap();

    let resp = client
        .post(format!("{base}/api/rooms/{room_id}/tasks/{task_id}/assign"))
        .json(&json!({ "member": "member99" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_rejected_with_bad_request() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    // Non-positive recurrence.
    let resp = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen", "recurrence": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    // Unknown named frequency.
    let resp = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen", "recurrence": "yearly" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    // Empty name.
    let resp = client
        .post(format!("{base}/api/members"))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deletes_are_idempotent() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let room: Value = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let room_id = room["id"].as_str().unwrap();

    let first: Value = client
        .delete(format!("{base}/api/rooms/{room_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["removed"], json!(true));

    let second = client
        .delete(format!("{base}/api/rooms/{room_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), reqwest::StatusCode::OK);
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["removed"], json!(false));
}

#[tokio::test]
async fn reorder_changes_room_order() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let room: Value = client
            .post(format!("{base}/api/rooms"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(room["id"].as_str().unwrap().to_string());
    }

    client
        .post(format!("{base}/api/rooms/reorder"))
        .json(&json!({ "dragged_id": ids[0], "target_id": ids[2] }))
        .send()
        .await
        .unwrap();

    let data = get_data(&client, &base).await;
    let names: Vec<&str> = data["rooms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[tokio::test]
async fn member_and_due_filters_restrict_the_view() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let alice: Value = client
        .post(format!("{base}/api/members"))
        .json(&json!({ "name": "Alice" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let alice_id = alice["id"].as_str().unwrap().to_string();

    let room: Value = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let room_id = room["id"].as_str().unwrap().to_string();

    client
        .post(format!("{base}/api/rooms/{room_id}/tasks"))
        .json(&json!({ "name": "Dishes", "assigned_to": alice_id }))
        .send()
        .await
        .unwrap();
    let mop: Value = client
        .post(format!("{base}/api/rooms/{room_id}/tasks"))
        .json(&json!({ "name": "Mop" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mop_id = mop["id"].as_str().unwrap().to_string();

    let data: Value = client
        .get(format!("{base}/api/data?member={alice_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tasks = data["rooms"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Dishes");

    let data: Value = client
        .get(format!("{base}/api/data?member=unassigned"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tasks = data["rooms"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Mop");

    // Complete the one-shot "Mop" and filter to due tasks only.
    client
        .post(format!("{base}/api/rooms/{room_id}/tasks/{mop_id}/complete"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap();
    let data: Value = client
        .get(format!("{base}/api/data?due_only=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tasks = data["rooms"][0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Dishes");
}

#[tokio::test]
async fn room_assignment_cascades_onto_tasks() {
    let (base, _store) = start_server(Document::default()).await;
    let client = reqwest::Client::new();

    let bob: Value = client
        .post(format!("{base}/api/members"))
        .json(&json!({ "name": "Bob" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bob_id = bob["id"].as_str().unwrap().to_string();

    let room: Value = client
        .post(format!("{base}/api/rooms"))
        .json(&json!({ "name": "Kitchen" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let room_id = room["id"].as_str().unwrap().to_string();
    for name in ["Dishes", "Mop"] {
        client
            .post(format!("{base}/api/rooms/{room_id}/tasks"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
    }

    client
        .post(format!("{base}/api/rooms/{room_id}/assign"))
        .json(&json!({ "member": bob_id }))
        .send()
        .await
        .unwrap();

    let data = get_data(&client, &base).await;
    let room = &data["rooms"][0];
    assert_eq!(room["assignee_name"], "Bob");
    for task in room["tasks"].as_array().unwrap() {
        assert_eq!(task["assignee_name"], "Bob");
    }
}

#[tokio::test]
async fn index_serves_the_embedded_page() {
    let (base, _store) = start_server(Document::default()).await;
    let body = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert!(body.contains("Choreboard"));
}
