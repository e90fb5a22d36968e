//! MongoDB store integration tests
//!
//! These need a running MongoDB instance and are ignored by default:
//!
//! ```sh
//! USERBASE_TEST_MONGODB_URI=mongodb://localhost:27017 cargo test -- --ignored
//! ```
//!
//! Each test works in its own collection and drops it afterwards.

use bson::{doc, oid::ObjectId, Document};
use std::time::Duration;

use userbase::db::{ListDecodePolicy, MongoClient, MongoUserStore, UserStore};
use userbase::User;

const TEST_DB: &str = "userbase_test";

async fn connect() -> MongoClient {
    let uri = std::env::var("USERBASE_TEST_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    MongoClient::new(&uri, TEST_DB, Duration::from_secs(10))
        .await
        .expect("MongoDB should be reachable")
}

fn collection_name() -> String {
    format!("users_{}", ObjectId::new().to_hex())
}

async fn drop_collection(mongo: &MongoClient, name: &str) {
    mongo
        .inner()
        .database(mongo.db_name())
        .collection::<Document>(name)
        .drop()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn test_crud_cycle() {
    let mongo = connect().await;
    let name = collection_name();
    let store: MongoUserStore = mongo.user_store(&name, ListDecodePolicy::Skip);

    let created = store.insert(User::new("alice", "p1").into()).await.unwrap();
    let id = created._id.unwrap();

    let by_id = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(by_id, created);

    let by_name = store.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name._id, Some(id));

    let mut changed = created.clone();
    changed.password = "p2".into();
    assert_eq!(store.update_fields(&changed).await.unwrap(), 1);
    assert_eq!(store.find_by_id(id).await.unwrap().unwrap().password, "p2");

    assert_eq!(store.find_all().await.unwrap().len(), 1);

    assert_eq!(store.delete_by_id(id).await.unwrap(), 1);
    assert_eq!(store.delete_by_id(id).await.unwrap(), 0);
    assert!(store.find_by_id(id).await.unwrap().is_none());

    drop_collection(&mongo, &name).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn test_decode_policy_against_real_documents() {
    let mongo = connect().await;
    let name = collection_name();

    let raw = mongo
        .inner()
        .database(mongo.db_name())
        .collection::<Document>(&name);
    raw.insert_one(doc! { "_id": ObjectId::new(), "username": 99 })
        .await
        .unwrap();

    let skipping = mongo.user_store(&name, ListDecodePolicy::Skip);
    skipping.insert(User::new("bob", "pw").into()).await.unwrap();
    assert_eq!(skipping.find_all().await.unwrap().len(), 1);

    let failing = mongo.user_store(&name, ListDecodePolicy::Fail);
    let err = failing.find_all().await.unwrap_err();
    assert_eq!(err.code(), "DECODE_ERROR");

    drop_collection(&mongo, &name).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB instance"]
async fn test_unreachable_server_fails_within_timeout() {
    let started = std::time::Instant::now();
    let result = MongoClient::new("mongodb://127.0.0.1:1", TEST_DB, Duration::from_secs(1)).await;
    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(10));
}
