//! HTTP API: route table, JSON handlers, and server startup.
//!
//! Every mutating handler performs one load-modify-save cycle against the
//! injected document store, under the state's writer lock. The data read
//! (`GET /api/data`) applies rollover to every task before computing due
//! flags and persists the document back when anything rolled over, so
//! due-ness is recomputed correctly no matter how long the server went
//! unobserved.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use chrono::Utc;
use choreboard_model::view::{DocumentView, MemberFilter, ViewFilter};
use choreboard_model::{ChoreError, Document, Member, Recurrence, Room, Task};

use crate::store::{AppState, StoreError};

/// Errors surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A document operation was rejected.
    #[error(transparent)]
    Chore(#[from] ChoreError),
    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Chore(
                ChoreError::RoomNotFound(_)
                | ChoreError::TaskNotFound(_)
                | ChoreError::MemberNotFound(_),
            ) => StatusCode::NOT_FOUND,
            Self::Chore(_) => StatusCode::BAD_REQUEST,
            Self::Store(e) => {
                tracing::error!(error = %e, "document store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Runs one load-modify-save cycle under the writer lock.
async fn with_document<T>(
    state: &AppState,
    op: impl FnOnce(&mut Document) -> Result<T, ChoreError>,
) -> Result<T, ApiError> {
    let store = state.store.lock().await;
    let mut doc = store.load()?;
    let out = op(&mut doc)?;
    store.save(&doc)?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
struct AddRoomRequest {
    name: String,
    #[serde(default)]
    recurrence: Option<Recurrence>,
    #[serde(default)]
    assigned_to: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AddTaskRequest {
    name: String,
    #[serde(default)]
    recurrence: Option<Recurrence>,
    #[serde(default)]
    assigned_to: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct AddMemberRequest {
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct RecurrenceRequest {
    /// `null` (or omitted) clears the recurrence.
    #[serde(default)]
    recurrence: Option<Recurrence>,
}

#[derive(Debug, serde::Deserialize)]
struct AssignRequest {
    /// `null` (or omitted) unassigns.
    #[serde(default)]
    member: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CompleteRequest {
    completed: bool,
}

#[derive(Debug, serde::Deserialize)]
struct ReorderRequest {
    dragged_id: String,
    target_id: String,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DataQuery {
    member: Option<String>,
    due_only: bool,
}

/// Response body for idempotent deletes.
#[derive(Debug, serde::Serialize)]
struct Removed {
    removed: bool,
}

/// Maps the `member` query parameter onto a view filter.
fn parse_member_filter(raw: Option<&str>) -> Option<MemberFilter> {
    match raw {
        None | Some("all" | "") => None,
        Some("unassigned") => Some(MemberFilter::Unassigned),
        Some(id) => Some(MemberFilter::Member(id.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<DocumentView>, ApiError> {
    let now = Utc::now();
    let store = state.store.lock().await;
    let mut doc = store.load()?;
    if doc.roll_over_all(now) {
        tracing::debug!("rollover reopened tasks, persisting");
        store.save(&doc)?;
    }
    drop(store);

    let filter = ViewFilter {
        member: parse_member_filter(query.member.as_deref()),
        due_only: query.due_only,
    };
    Ok(Json(DocumentView::build(&doc, now, &filter)))
}

async fn add_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRoomRequest>,
) -> Result<Json<Room>, ApiError> {
    let AddRoomRequest {
        name,
        recurrence,
        assigned_to,
    } = req;
    let room = with_document(&state, move |doc| {
        doc.add_room(&name, recurrence, assigned_to)
    })
    .await?;
    tracing::info!(room_id = %room.id, "room added");
    Ok(Json(room))
}

async fn update_room_recurrence(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<RecurrenceRequest>,
) -> Result<StatusCode, ApiError> {
    with_document(&state, |doc| {
        doc.update_room_recurrence(&room_id, req.recurrence)
    })
    .await?;
    tracing::info!(room_id = %room_id, "room default recurrence updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> Result<StatusCode, ApiError> {
    with_document(&state, |doc| doc.assign_room(&room_id, req.member)).await?;
    tracing::info!(room_id = %room_id, "room assignee updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_rooms(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    with_document(&state, |doc| {
        doc.reorder_room(&req.dragged_id, &req.target_id)
    })
    .await?;
    tracing::info!(dragged = %req.dragged_id, target = %req.target_id, "rooms reordered");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Removed>, ApiError> {
    let removed =
        with_document(&state, |doc| Ok::<_, ChoreError>(doc.remove_room(&room_id))).await?;
    tracing::info!(room_id = %room_id, removed, "room delete");
    Ok(Json(Removed { removed }))
}

async fn add_task(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<AddTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let AddTaskRequest {
        name,
        recurrence,
        assigned_to,
    } = req;
    let task = with_document(&state, move |doc| {
        doc.add_task(&room_id, &name, recurrence, assigned_to)
    })
    .await?;
    tracing::info!(task_id = %task.id, "task added");
    Ok(Json(task))
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path((room_id, task_id)): Path<(String, String)>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<Task>, ApiError> {
    let now = Utc::now();
    let task = with_document(&state, |doc| {
        doc.set_task_completed(&room_id, &task_id, req.completed, now)
    })
    .await?;
    tracing::info!(room_id = %room_id, task_id = %task_id, completed = req.completed, "task completion updated");
    Ok(Json(task))
}

async fn update_task_recurrence(
    State(state): State<Arc<AppState>>,
    Path((room_id, task_id)): Path<(String, String)>,
    Json(req): Json<RecurrenceRequest>,
) -> Result<StatusCode, ApiError> {
    with_document(&state, |doc| {
        doc.update_task_recurrence(&room_id, &task_id, req.recurrence)
    })
    .await?;
    tracing::info!(room_id = %room_id, task_id = %task_id, "task recurrence updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_task(
    State(state): State<Arc<AppState>>,
    Path((room_id, task_id)): Path<(String, String)>,
    Json(req): Json<AssignRequest>,
) -> Result<StatusCode, ApiError> {
    with_document(&state, |doc| doc.assign_task(&room_id, &task_id, req.member)).await?;
    tracing::info!(room_id = %room_id, task_id = %task_id, "task assignee updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path((room_id, task_id)): Path<(String, String)>,
) -> Result<Json<Removed>, ApiError> {
    let removed = with_document(&state, |doc| {
        Ok::<_, ChoreError>(doc.remove_task(&room_id, &task_id))
    })
    .await?;
    tracing::info!(room_id = %room_id, task_id = %task_id, removed, "task delete");
    Ok(Json(Removed { removed }))
}

async fn delete_history_entry(
    State(state): State<Arc<AppState>>,
    Path((room_id, task_id, index)): Path<(String, String, usize)>,
) -> Result<Json<Removed>, ApiError> {
    let removed = with_document(&state, |doc| {
        Ok::<_, ChoreError>(doc.remove_history_entry(&room_id, &task_id, index))
    })
    .await?;
    tracing::info!(room_id = %room_id, task_id = %task_id, index, removed, "history entry delete");
    Ok(Json(Removed { removed }))
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<Member>, ApiError> {
    let member = with_document(&state, |doc| doc.add_member(&req.name)).await?;
    tracing::info!(member_id = %member.id, "member added");
    Ok(Json(member))
}

async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<String>,
) -> Result<Json<Removed>, ApiError> {
    let removed = with_document(&state, |doc| {
        Ok::<_, ChoreError>(doc.remove_member(&member_id))
    })
    .await?;
    tracing::info!(member_id = %member_id, removed, "member delete");
    Ok(Json(Removed { removed }))
}

// ---------------------------------------------------------------------------
// Router and startup
// ---------------------------------------------------------------------------

/// Builds the application router over shared state.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/data", get(get_data))
        .route("/api/rooms", post(add_room))
        .route("/api/rooms/reorder", post(reorder_rooms))
        .route("/api/rooms/{room_id}", delete(delete_room))
        .route("/api/rooms/{room_id}/recurrence", post(update_room_recurrence))
        .route("/api/rooms/{room_id}/assign", post(assign_room))
        .route("/api/rooms/{room_id}/tasks", post(add_task))
        .route("/api/rooms/{room_id}/tasks/{task_id}", delete(delete_task))
        .route(
            "/api/rooms/{room_id}/tasks/{task_id}/recurrence",
            post(update_task_recurrence),
        )
        .route("/api/rooms/{room_id}/tasks/{task_id}/assign", post(assign_task))
        .route(
            "/api/rooms/{room_id}/tasks/{task_id}/complete",
            post(complete_task),
        )
        .route(
            "/api/rooms/{room_id}/tasks/{task_id}/history/{index}",
            delete(delete_history_entry),
        )
        .route("/api/members", post(add_member))
        .route("/api/members/{member_id}", delete(delete_member))
        .with_state(state)
}

/// Starts the server with a pre-configured [`AppState`].
///
/// Returns the bound address (useful with port 0) and the serve task's
/// join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
