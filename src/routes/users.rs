use crate::{
    auth::{authorize, CurrentUser, PasswordHasher},
    error::AppError,
    models::{Page, User, UserList, UserPublic, UserSchema},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

const USER_NOT_FOUND: &str = "User not found";

/// Creates a new account.
///
/// The username and email must both be unused. The uniqueness checks and the insert
/// share one transaction; a concurrent insert that slips past the checks is still
/// caught by the table's unique constraints and reported as a conflict.
///
/// ## Responses:
/// - `201 Created`: the new account's public view.
/// - `400 Bad Request`: `Username already exists` or `Email already exists`.
/// - `422 Unprocessable Entity`: the body did not deserialize or failed field validation.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    payload: web::Json<UserSchema>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let payload = payload.into_inner();

    let mut tx = pool.begin().await?;

    if User::find_by_username(&mut *tx, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".into()));
    }
    if User::find_by_email(&mut *tx, &payload.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already exists".into()));
    }

    let password_hash = hasher.hash_blocking(payload.password).await?;
    let user = User::insert(&mut *tx, &payload.username, &payload.email, &password_hash).await?;
    tx.commit().await?;

    log::info!("Created user {}", user.id);
    Ok(HttpResponse::Created().json(UserPublic::from(user)))
}

/// Lists accounts ordered by id.
///
/// ## Query Parameters:
/// - `offset` (optional, default 0)
/// - `limit` (optional, 1 to 100, default 100)
#[get("")]
pub async fn read_users(
    pool: web::Data<PgPool>,
    page: web::Query<Page>,
) -> Result<impl Responder, AppError> {
    page.validate()?;

    let users = User::list(pool.get_ref(), page.offset(), page.limit()).await?;

    Ok(HttpResponse::Ok().json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

#[get("/{user_id}")]
pub async fn read_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = User::find_by_id(pool.get_ref(), user_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

/// Replaces the caller's own account.
///
/// The permission check runs before anything else, so targeting any other id,
/// existing or not, answers `403 Forbidden`.
///
/// ## Responses:
/// - `200 OK`: the updated public view.
/// - `401 Unauthorized`: missing or rejected bearer token.
/// - `403 Forbidden`: the id is not the caller's.
/// - `409 Conflict`: the new username or email belongs to another account.
/// - `422 Unprocessable Entity`: the body did not deserialize or failed field validation.
#[put("/{user_id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    user_id: web::Path<i32>,
    current: CurrentUser,
    payload: web::Json<UserSchema>,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    authorize(&current, user_id)?;
    payload.validate()?;
    let payload = payload.into_inner();

    let password_hash = hasher.hash_blocking(payload.password).await?;

    let user = User::update(
        pool.get_ref(),
        user_id,
        &payload.username,
        &payload.email,
        &password_hash,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.into()))?;

    log::info!("Updated user {}", user.id);
    Ok(HttpResponse::Ok().json(UserPublic::from(user)))
}

/// Deletes the caller's own account together with all of its todos.
#[delete("/{user_id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i32>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let user_id = user_id.into_inner();
    authorize(&current, user_id)?;

    if !User::delete(pool.get_ref(), user_id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.into()));
    }

    log::info!("Deleted user {}", user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}
