use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Todo, TodoInput, TodoList, TodoPatch, TodoQuery},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const TODO_NOT_FOUND: &str = "Task not found.";

/// Creates a todo owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the stored todo.
/// - `401 Unauthorized`: missing or rejected bearer token.
/// - `422 Unprocessable Entity`: title or description out of bounds.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    todo: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo.validate()?;

    let todo = Todo::insert(pool.get_ref(), &todo, current.id).await?;

    Ok(HttpResponse::Created().json(todo))
}

/// Lists the authenticated user's todos.
///
/// ## Query Parameters:
/// - `title`, `description` (optional): case-insensitive substring filters.
/// - `state` (optional): exact state match.
/// - `offset`, `limit` (optional): pagination, defaults 0 and 100.
#[get("")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    query: web::Query<TodoQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let todos = Todo::list_for_owner(pool.get_ref(), current.id, &query).await?;

    Ok(HttpResponse::Ok().json(TodoList { todos }))
}

/// Partially updates a todo.
///
/// Todos that belong to someone else answer `404`, exactly like missing ones.
#[patch("/{todo_id}")]
pub async fn patch_todo(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    todo_id: web::Path<i32>,
    patch: web::Json<TodoPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let todo = Todo::update_owned(pool.get_ref(), todo_id.into_inner(), current.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(todo))
}

#[delete("/{todo_id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    current: CurrentUser,
    todo_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    if !Todo::delete_owned(pool.get_ref(), todo_id.into_inner(), current.id).await? {
        return Err(AppError::NotFound(TODO_NOT_FOUND.into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task has been deleted successfully." })))
}
