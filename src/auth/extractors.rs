use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::ops::Deref;

use crate::auth::{identity, TokenKeys};
use crate::error::AppError;
use crate::models::User;

/// The account behind the request's bearer token.
///
/// Extraction runs the full authentication chain: read the `Authorization` header,
/// verify the token with the shared [`TokenKeys`], then load the account from the pool.
/// A missing header yields `AppError::NotAuthenticated`; every other failure yields
/// `AppError::InvalidCredentials`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req).map(str::to_owned);
        let keys = req.app_data::<web::Data<TokenKeys>>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(AppError::NotAuthenticated)?;
            let (keys, pool) = match (keys, pool) {
                (Some(keys), Some(pool)) => (keys, pool),
                _ => {
                    return Err(AppError::InternalServerError(
                        "Token keys or database pool not registered as app data".into(),
                    )
                    .into())
                }
            };

            let claims = keys.verify(&token)?;
            let user = identity::resolve(pool.get_ref(), &claims).await?;
            Ok(CurrentUser(user))
        })
    }
}

/// Returns the credentials of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; any other scheme counts as no token.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credentials) = value.trim().split_once(' ')?;
    let credentials = credentials.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !credentials.is_empty() {
        Some(credentials)
    } else {
        None
    }
}
