//! HTTP routes for userbase

pub mod users;

pub use users::{dispatch, error_response, DeleteResponse};
