//! HTTP serving layer

mod http;

pub use http::{run, serve, AppState};
