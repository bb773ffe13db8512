#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use todo_api::auth::{PasswordHasher, TokenKeys, TokenResponse};
use todo_api::models::UserPublic;
use todo_api::routes;

pub const SECRET: &str = "integration-test-secret";

/// Connects to `DATABASE_URL` and applies migrations.
///
/// Returns `None` when the variable is unset so database tests skip instead of failing.
pub async fn test_pool() -> Option<PgPool> {
    dotenv::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping database test: DATABASE_URL is not set");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// A pool that never connects. Good for requests rejected before any lookup.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("valid connection string")
}

pub fn token_keys() -> TokenKeys {
    TokenKeys::new(SECRET, Algorithm::HS256, Duration::minutes(30)).expect("valid token keys")
}

pub async fn init_app(
    pool: PgPool,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    init_app_with_hasher(pool, PasswordHasher::new(4)).await
}

pub async fn init_app_with_hasher(
    pool: PgPool,
    hasher: PasswordHasher,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(token_keys()))
            .app_data(web::Data::new(hasher))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

/// A username/email pair no other test (or earlier run) is using.
pub fn unique_identity(prefix: &str) -> (String, String) {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() % 1_000_000_000;
    let username = format!("{}_{}_{}", prefix, stamp, n);
    let email = format!("{}@email.com", username);
    (username, email)
}

pub struct TestUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

/// Registers a fresh account through `POST /users` and logs in through `POST /auth/token`.
pub async fn register_and_login<S, B>(app: &S, prefix: &str) -> TestUser
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (username, email) = unique_identity(prefix);
    let password = format!("{}@123", username);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
    let created: UserPublic = test::read_body_json(resp).await;

    let token = login(app, &email, &password).await;

    TestUser {
        id: created.id,
        username,
        email,
        password,
        token,
    }
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", email), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token_type, "bearer");
    body.access_token
}

pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}
