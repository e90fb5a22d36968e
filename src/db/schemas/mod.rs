//! Database schemas for userbase

mod user;

pub use user::{UserDoc, USER_COLLECTION};
