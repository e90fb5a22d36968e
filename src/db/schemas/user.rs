//! User document schema
//!
//! Stored shape of a user in the `users` collection.

use bson::{oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{zero_time, Result, User};

/// Collection name for users
pub const USER_COLLECTION: &str = "users";

/// User document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Kept under the lowercase key existing deployments already use
    #[serde(
        rename = "createddate",
        default = "zero_time",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_date: DateTime<Utc>,
}

impl UserDoc {
    /// Fields to `$set` on update: everything except `_id`
    pub fn set_fields(&self) -> Result<Document> {
        let mut fields = bson::to_document(self)?;
        fields.remove("_id");
        Ok(fields)
    }
}

impl From<User> for UserDoc {
    fn from(user: User) -> Self {
        Self {
            _id: user.id,
            username: user.username,
            password: user.password,
            created_date: user.created_date,
        }
    }
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        Self {
            id: doc._id,
            username: doc.username,
            password: doc.password,
            created_date: doc.created_date,
        }
    }
}
