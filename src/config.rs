//! Configuration for userbase
//!
//! CLI arguments and environment variable handling using clap. Defaults
//! are the fixed values the service has always been deployed with.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

use crate::db::{ListDecodePolicy, USER_COLLECTION};
use crate::types::{Result, UserbaseError};

/// userbase - CRUD over user records in MongoDB
#[derive(Parser, Debug, Clone)]
#[command(name = "userbase")]
#[command(about = "HTTP CRUD service for user records stored in MongoDB")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "example")]
    pub mongodb_db: String,

    /// Collection holding user documents
    #[arg(long, env = "USERS_COLLECTION", default_value = USER_COLLECTION)]
    pub users_collection: String,

    /// Connect and server selection timeout for the startup ping, in seconds
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value = "10")]
    pub connect_timeout_secs: u64,

    /// What listing does with documents that fail to decode
    #[arg(long, env = "LIST_DECODE_POLICY", value_enum, default_value_t = ListDecodePolicy::Skip)]
    pub list_decode_policy: ListDecodePolicy,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_secs == 0 {
            return Err(UserbaseError::Config(
                "CONNECT_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if self.mongodb_db.trim().is_empty() {
            return Err(UserbaseError::Config("MONGODB_DB must not be empty".to_string()));
        }

        if self.users_collection.trim().is_empty() {
            return Err(UserbaseError::Config(
                "USERS_COLLECTION must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["userbase"]).unwrap();
        assert_eq!(args.listen.port(), 8000);
        assert_eq!(args.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(args.mongodb_db, "example");
        assert_eq!(args.users_collection, "users");
        assert_eq!(args.connect_timeout(), Duration::from_secs(10));
        assert_eq!(args.list_decode_policy, ListDecodePolicy::Skip);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_fail_fast_policy_flag() {
        let args =
            Args::try_parse_from(["userbase", "--list-decode-policy", "fail"]).unwrap();
        assert_eq!(args.list_decode_policy, ListDecodePolicy::Fail);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = Args::try_parse_from(["userbase", "--connect-timeout-secs", "0"]).unwrap();
        let err = args.validate().unwrap_err();
        assert!(matches!(err, UserbaseError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: CONNECT_TIMEOUT_SECS must be greater than zero"
        );
    }

    #[test]
    fn test_empty_collection_rejected() {
        let args = Args::try_parse_from(["userbase", "--users-collection", " "]).unwrap();
        assert!(args.validate().is_err());
    }
}
