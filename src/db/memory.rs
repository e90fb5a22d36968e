//! In-process user store
//!
//! Keeps raw BSON documents in insertion order and applies the same
//! decode rules as the MongoDB store, so a malformed document behaves the
//! same way in both.

use bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use crate::db::schemas::UserDoc;
use crate::db::store::{ListDecodePolicy, UserStore};
use crate::types::{Result, UserbaseError};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    docs: RwLock<Vec<Document>>,
    policy: ListDecodePolicy,
}

impl MemoryUserStore {
    pub fn new(policy: ListDecodePolicy) -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            policy,
        }
    }

    /// Store a document as-is, bypassing `UserDoc` encoding
    pub async fn insert_raw(&self, raw: Document) {
        self.docs.write().await.push(raw);
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    async fn find_first<F>(&self, matches: F) -> Result<Option<UserDoc>>
    where
        F: Fn(&Document) -> bool,
    {
        let docs = self.docs.read().await;
        match docs.iter().find(|raw| matches(raw)) {
            Some(raw) => Ok(Some(bson::from_document(raw.clone())?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, mut user_doc: UserDoc) -> Result<UserDoc> {
        user_doc._id = Some(ObjectId::new());
        let raw = bson::to_document(&user_doc)?;
        let stored = bson::from_document(raw.clone())?;
        self.docs.write().await.push(raw);
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<UserDoc>> {
        let docs = self.docs.read().await;
        let mut users = Vec::with_capacity(docs.len());
        for raw in docs.iter() {
            if let Some(user_doc) = self.policy.decode(raw.clone())? {
                users.push(user_doc);
            }
        }
        Ok(users)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<UserDoc>> {
        self.find_first(|raw| raw.get_object_id("_id").ok() == Some(id))
            .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserDoc>> {
        self.find_first(|raw| raw.get_str("username").ok() == Some(username))
            .await
    }

    async fn update_fields(&self, user_doc: &UserDoc) -> Result<u64> {
        let id = user_doc
            ._id
            .ok_or_else(|| UserbaseError::BadRequest("User ID is required".into()))?;
        let fields = user_doc.set_fields()?;

        let mut docs = self.docs.write().await;
        match docs
            .iter_mut()
            .find(|raw| raw.get_object_id("_id").ok() == Some(id))
        {
            Some(raw) => {
                raw.extend(fields);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<u64> {
        let mut docs = self.docs.write().await;
        match docs
            .iter()
            .position(|raw| raw.get_object_id("_id").ok() == Some(id))
        {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
