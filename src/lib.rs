#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Accounts and personal to-do items behind JWT bearer authentication. A protected"]
#![doc = "request runs verify token -> resolve account -> check ownership before its handler"]
#![doc = "touches any data. The binary (`main.rs`) wires configuration, the database pool and"]
#![doc = "these routes into an Actix Web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::error::AppError;
