//! Bug record store backed by a MongoDB collection.

pub mod models;

use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    options::{ClientOptions, IndexOptions},
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::bug::Bug;

const BUG_COLLECTION: &str = "bugs";

#[derive(Debug, Error)]
pub enum BugStoreError {
    #[error("bug not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Handle to the bug database. Cheap to clone; every clone shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct DbService {
    database: Database,
}

impl DbService {
    /// Connect to MongoDB and make sure the collection indexes exist.
    pub async fn connect(connection_string: &str, database_name: &str) -> Result<Self, BugStoreError> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let database = client.database(database_name);

        let service = Self { database };
        service.ensure_indexes().await?;

        info!(database = database_name, "connected to MongoDB");
        Ok(service)
    }

    /// The bug collection handle.
    pub fn bugs(&self) -> Collection<Bug> {
        self.database.collection(BUG_COLLECTION)
    }

    async fn ensure_indexes(&self) -> Result<(), BugStoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.bugs().create_index(index).await?;
        Ok(())
    }
}
