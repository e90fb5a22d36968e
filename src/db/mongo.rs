//! MongoDB client and user store
//!
//! The client is opened once at startup and verified with a single ping.
//! Connection failures are not retried.

use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{options::ClientOptions, Client, Collection};
use std::time::Duration;
use tracing::{debug, info};

use crate::db::schemas::UserDoc;
use crate::db::store::{ListDecodePolicy, UserStore};
use crate::types::{Result, UserbaseError};

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and ping. `timeout` bounds both the TCP connect and server
    /// selection, so an unreachable server fails the ping instead of hanging.
    pub async fn new(uri: &str, db_name: &str, timeout: Duration) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| UserbaseError::Database(format!("Invalid MongoDB URI: {}", e)))?;
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)
            .map_err(|e| UserbaseError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| UserbaseError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// User store over the named collection
    pub fn user_store(&self, collection: &str, policy: ListDecodePolicy) -> MongoUserStore {
        let collection = self
            .client
            .database(&self.db_name)
            .collection::<Document>(collection);
        MongoUserStore::new(collection, policy)
    }

    /// Get the raw MongoDB client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// `UserStore` backed by a MongoDB collection.
///
/// Documents are read untyped and decoded here so that a malformed
/// document surfaces as a decode error rather than a driver error.
#[derive(Debug, Clone)]
pub struct MongoUserStore {
    inner: Collection<Document>,
    policy: ListDecodePolicy,
}

impl MongoUserStore {
    pub fn new(inner: Collection<Document>, policy: ListDecodePolicy) -> Self {
        Self { inner, policy }
    }

    async fn find_one(&self, filter: Document) -> Result<Option<UserDoc>> {
        match self.inner.find_one(filter).await? {
            Some(raw) => Ok(Some(bson::from_document(raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, mut user_doc: UserDoc) -> Result<UserDoc> {
        user_doc._id = Some(ObjectId::new());
        let raw = bson::to_document(&user_doc)?;
        let stored = bson::from_document(raw.clone())?;

        self.inner
            .insert_one(raw)
            .await
            .map_err(|e| UserbaseError::Database(format!("Insert failed: {}", e)))?;

        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<UserDoc>> {
        let mut cursor = self
            .inner
            .find(doc! {})
            .await
            .map_err(|e| UserbaseError::Database(format!("Find failed: {}", e)))?;

        let mut users = Vec::new();
        while let Some(raw) = cursor.try_next().await? {
            if let Some(user_doc) = self.policy.decode(raw)? {
                users.push(user_doc);
            }
        }

        debug!("Listed {} users", users.len());
        Ok(users)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<UserDoc>> {
        self.find_one(doc! { "_id": id }).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserDoc>> {
        self.find_one(doc! { "username": username }).await
    }

    async fn update_fields(&self, user_doc: &UserDoc) -> Result<u64> {
        let id = user_doc
            ._id
            .ok_or_else(|| UserbaseError::BadRequest("User ID is required".into()))?;

        let result = self
            .inner
            .update_one(doc! { "_id": id }, doc! { "$set": user_doc.set_fields()? })
            .await
            .map_err(|e| UserbaseError::Database(format!("Update failed: {}", e)))?;

        Ok(result.matched_count)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<u64> {
        let result = self
            .inner
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| UserbaseError::Database(format!("Delete failed: {}", e)))?;

        Ok(result.deleted_count)
    }
}
