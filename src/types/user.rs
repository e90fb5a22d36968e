//! User as seen by HTTP clients
//!
//! The JSON shape differs from the stored document: the identifier is
//! exposed as a hex string under `id` and the creation date is an
//! RFC 3339 timestamp under `createdDate`.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record exchanged over the HTTP API
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier (ignored on create, required on update)
    #[serde(default, with = "object_id_hex")]
    pub id: Option<ObjectId>,

    #[serde(default)]
    pub username: String,

    /// Stored and returned in plaintext
    #[serde(default)]
    pub password: String,

    /// Client supplied; zero time when absent
    #[serde(default = "zero_time")]
    pub created_date: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: password.into(),
            created_date: zero_time(),
        }
    }
}

/// `0001-01-01T00:00:00Z`, the value an unset timestamp takes
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(-62_135_596_800, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Serde adapter for `Option<ObjectId>` as a plain hex string.
///
/// `ObjectId`'s own `Serialize` emits extended JSON (`{"$oid": ...}`),
/// which is not what API clients send or expect.
mod object_id_hex {
    use bson::oid::ObjectId;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(oid) => serializer.serialize_str(&oid.to_hex()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ObjectId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => ObjectId::parse_str(&s)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid id {:?}: {}", s, e))),
        }
    }
}
