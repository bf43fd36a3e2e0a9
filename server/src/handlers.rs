//! Request handlers, one per todo verb plus the informational routes.
//!
//! Each todo handler extracts its inputs, makes exactly one store call and
//! maps the outcome to a response. Failures are returned as `AppError` and
//! rendered by its `IntoResponse` impl.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todo_core::{ListFilter, ObjectId, Todo, TodoPatch, TodoStore, TodoWithId};

use crate::error::AppError;

/// Raw `GET /todos` query parameters, interpreted by `ListFilter::from_query`.
///
/// A key given more than once has no single value and is treated as absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut status = Param::Absent;
        let mut search = Param::Absent;
        for (key, value) in pairs {
            match key.as_str() {
                "status" => status.push(value),
                "search" => search.push(value),
                _ => {}
            }
        }
        Self {
            status: status.into_single(),
            search: search.into_single(),
        }
    }
}

enum Param {
    Absent,
    Single(String),
    Repeated,
}

impl Param {
    fn push(&mut self, value: String) {
        *self = match self {
            Self::Absent => Self::Single(value),
            Self::Single(_) | Self::Repeated => Self::Repeated,
        };
    }

    fn into_single(self) -> Option<String> {
        match self {
            Self::Single(value) => Some(value),
            Self::Absent | Self::Repeated => None,
        }
    }
}

/// Parse the `{id}` path segment, routing every failure through `AppError`.
fn object_id(path: Result<Path<String>, PathRejection>) -> Result<(String, ObjectId), AppError> {
    let Path(id) = path?;
    let parsed: ObjectId = id.parse()?;
    Ok((id, parsed))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "🦄🌈✨👋🌎🌍🌏✨🌈🦄".to_string(),
    })
}

pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "API - 👋🌎🌍🌏".to_string(),
    })
}

pub async fn list_todos<S: TodoStore>(
    State(store): State<S>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<TodoWithId>>, AppError> {
    let Query(pairs) = query?;
    let query = ListQuery::from_pairs(pairs);
    let filter = ListFilter::from_query(query.status.as_deref(), query.search.as_deref());
    Ok(Json(store.list(&filter).await?))
}

pub async fn create_todo<S: TodoStore>(
    State(store): State<S>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoWithId>), AppError> {
    let Json(body) = body?;
    let todo = Todo::validate(&body)?;
    let created = store.create(todo).await?;
    tracing::debug!(id = %created.id, "todo created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_todo<S: TodoStore>(
    State(store): State<S>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TodoWithId>, AppError> {
    let (id, object_id) = object_id(path)?;
    store
        .find_by_id(&object_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(id))
}

/// Serves both PUT and PATCH; either way only the supplied fields change.
pub async fn update_todo<S: TodoStore>(
    State(store): State<S>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TodoWithId>, AppError> {
    let (id, object_id) = object_id(path)?;
    let Json(body) = body?;
    let patch = TodoPatch::validate(&body)?;
    match store.update_by_id(&object_id, &patch).await? {
        Some(updated) => {
            tracing::debug!(id = %updated.id, "todo updated");
            Ok(Json(updated))
        }
        None => Err(AppError::NotFound(id)),
    }
}

pub async fn delete_todo<S: TodoStore>(
    State(store): State<S>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let (id, object_id) = object_id(path)?;
    if store.delete_by_id(&object_id).await? {
        tracing::debug!(id = %object_id, "todo deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(id))
    }
}

/// Fallback for requests no route matched.
pub async fn not_found(uri: Uri) -> AppError {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);
    AppError::RouteNotFound(target)
}
