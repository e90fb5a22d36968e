//! userbase - CRUD over user records in MongoDB
//!
//! Five routes, six handlers, one storage call each:
//!
//! - **Storage gateway** (`db`): one MongoDB client opened and pinged at
//!   startup, exposed to handlers through the `UserStore` trait
//! - **Request router** (`server`, `routes`): hyper server dispatching
//!   `/users` requests to handlers that answer with JSON

pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, User, UserbaseError};
