use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use todo_api::{
    auth::{PasswordHasher, TokenKeys},
    config::Config,
    routes,
};

fn startup_error<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> io::Error {
    move |e: E| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error("Invalid configuration"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(startup_error("Failed to connect to database"))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(startup_error("Failed to run migrations"))?;

    let keys = TokenKeys::from_config(&config).map_err(startup_error("Invalid token settings"))?;
    let keys = web::Data::new(keys);
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));
    let pool = web::Data::new(pool);

    log::info!("Starting todo-api server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(keys.clone())
            .app_data(hasher.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
