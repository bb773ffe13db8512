use crate::{
    auth::{CurrentUser, PasswordHasher, TokenKeys, TokenRequest, TokenResponse},
    error::AppError,
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const INCORRECT_LOGIN: &str = "Incorrect email or password";

/// Login user
///
/// Exchanges an email (sent as `username`) and password for an access token.
/// An unknown email and a wrong password produce the same 401 response.
#[post("/token")]
pub async fn login_for_access_token(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    keys: web::Data<TokenKeys>,
    form: web::Form<TokenRequest>,
) -> Result<impl Responder, AppError> {
    form.validate()?;
    let form = form.into_inner();

    let user = User::find_by_email(pool.get_ref(), &form.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INCORRECT_LOGIN.into()))?;

    if !hasher
        .verify_blocking(form.password, user.password_hash.clone())
        .await?
    {
        log::info!("Failed login attempt for user {}", user.id);
        return Err(AppError::Unauthorized(INCORRECT_LOGIN.into()));
    }

    let access_token = keys.issue_for(&user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}

/// Refresh token
///
/// Issues a fresh access token for the bearer of a still-valid one.
#[post("/refresh_token")]
pub async fn refresh_access_token(
    keys: web::Data<TokenKeys>,
    current: CurrentUser,
) -> Result<impl Responder, AppError> {
    let access_token = keys.issue_for(&current.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access_token)))
}
