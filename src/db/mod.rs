//! Database layer for userbase
//!
//! Provides MongoDB storage for users and an in-process store with the
//! same semantics.

pub mod memory;
pub mod mongo;
pub mod schemas;
pub mod store;

pub use memory::MemoryUserStore;
pub use mongo::{MongoClient, MongoUserStore};
pub use schemas::{UserDoc, USER_COLLECTION};
pub use store::{ListDecodePolicy, UserStore};
