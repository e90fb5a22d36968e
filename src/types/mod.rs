//! Shared types for userbase

mod error;
mod user;

pub use error::{Result, UserbaseError};
pub use user::{zero_time, User};
