//! Storage seam between the router and the database
//!
//! Handlers only see `UserStore`. Production uses [`MongoUserStore`],
//! tests use [`MemoryUserStore`].
//!
//! [`MongoUserStore`]: crate::db::MongoUserStore
//! [`MemoryUserStore`]: crate::db::MemoryUserStore

use bson::{oid::ObjectId, Bson, Document};
use std::fmt;
use tracing::warn;

use crate::db::schemas::UserDoc;
use crate::types::Result;

/// What listing does with a stored document that does not decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListDecodePolicy {
    /// Drop the document and log it
    #[default]
    Skip,
    /// Fail the whole listing
    Fail,
}

impl ListDecodePolicy {
    /// Decode one listed document according to the policy.
    ///
    /// `Ok(None)` means the document was skipped.
    pub fn decode(self, raw: Document) -> Result<Option<UserDoc>> {
        let id = raw.get("_id").cloned();
        match bson::from_document::<UserDoc>(raw) {
            Ok(user_doc) => Ok(Some(user_doc)),
            Err(e) => match self {
                Self::Skip => {
                    warn!(
                        id = %id.unwrap_or(Bson::Null),
                        error = %e,
                        "Skipping user document that failed to decode"
                    );
                    Ok(None)
                }
                Self::Fail => Err(e.into()),
            },
        }
    }
}

impl fmt::Display for ListDecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// One storage primitive per handler
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user under a freshly generated id and return it as
    /// stored (timestamps truncated to BSON millisecond precision)
    async fn insert(&self, user_doc: UserDoc) -> Result<UserDoc>;

    /// Every user in the collection, filtered through the list decode policy
    async fn find_all(&self) -> Result<Vec<UserDoc>>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<UserDoc>>;

    /// First user whose username matches exactly
    async fn find_by_username(&self, username: &str) -> Result<Option<UserDoc>>;

    /// `$set` every non-id field on the user with `user_doc._id`.
    /// Returns the matched count; no match is not an error.
    async fn update_fields(&self, user_doc: &UserDoc) -> Result<u64>;

    /// Returns the deleted count (0 or 1)
    async fn delete_by_id(&self, id: ObjectId) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_skip_policy_drops_bad_document() {
        let raw = doc! { "_id": ObjectId::new(), "username": 7 };
        assert!(ListDecodePolicy::Skip.decode(raw).unwrap().is_none());
    }

    #[test]
    fn test_fail_policy_surfaces_decode_error() {
        let raw = doc! { "_id": ObjectId::new(), "password": true };
        let err = ListDecodePolicy::Fail.decode(raw).unwrap_err();
        assert_eq!(err.code(), "DECODE_ERROR");
    }

    #[test]
    fn test_good_document_decodes_under_either_policy() {
        let raw = doc! { "_id": ObjectId::new(), "username": "dave", "password": "x" };
        for policy in [ListDecodePolicy::Skip, ListDecodePolicy::Fail] {
            let user_doc = policy.decode(raw.clone()).unwrap().unwrap();
            assert_eq!(user_doc.username, "dave");
        }
    }

    #[test]
    fn test_policy_display_matches_cli_value() {
        assert_eq!(ListDecodePolicy::Skip.to_string(), "skip");
        assert_eq!(ListDecodePolicy::Fail.to_string(), "fail");
    }
}
