//! userbase - CRUD over user records in MongoDB

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userbase::{config::Args, db::MongoClient, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("userbase={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  userbase");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Database: {} / {}", args.mongodb_db, args.users_collection);
    info!("List decode policy: {}", args.list_decode_policy);
    info!("======================================");

    // No retry: a storage failure at startup ends the process
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db, args.connect_timeout())
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let store = mongo.user_store(&args.users_collection, args.list_decode_policy);
    info!(
        "Serving collection '{}' in database '{}'",
        args.users_collection,
        mongo.db_name()
    );

    let state = Arc::new(server::AppState::new(Arc::new(store)));

    if let Err(e) = server::run(state, args.listen).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
