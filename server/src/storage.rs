//! Image hosting.
//!
//! Uploaded images are written to an [`ObjectStore`] and referenced from
//! recipes and feedback by their public URL (`{base}/api/images/{id}`).

use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::NewStoredObject;
use crate::schema::stored_objects;

/// Largest image accepted on upload.
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage query failed: {0}")]
    Query(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Recipe,
    Feedback,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Recipe => "recipe",
            Bucket::Feedback => "feedback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` and return the new object's id.
    async fn put(
        &self,
        bucket: Bucket,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Uuid, StorageError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredObject>, StorageError>;
}

/// URL under which an object is served to clients.
pub fn public_url(base_url: &str, id: Uuid) -> String {
    format!("{}/api/images/{}", base_url.trim_end_matches('/'), id)
}

/// Keeps objects in the `stored_objects` table.
pub struct PgObjectStore {
    pool: Arc<DbPool>,
}

impl PgObjectStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObjectStore for PgObjectStore {
    async fn put(
        &self,
        bucket: Bucket,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Uuid, StorageError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let stored_name = format!("{}_{}", chrono::Utc::now().timestamp_millis(), file_name);
        let new_object = NewStoredObject {
            bucket: bucket.as_str(),
            file_name: &stored_name,
            content_type,
            data,
        };

        diesel::insert_into(stored_objects::table)
            .values(&new_object)
            .returning(stored_objects::id)
            .get_result(&mut conn)
            .map_err(|e| StorageError::Query(e.to_string()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredObject>, StorageError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        let row: Option<(String, Vec<u8>)> = stored_objects::table
            .find(id)
            .select((stored_objects::content_type, stored_objects::data))
            .first(&mut conn)
            .optional()
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(row.map(|(content_type, data)| StoredObject { content_type, data }))
    }
}

#[cfg(test)]
pub use memory::InMemoryObjectStore;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        let id = Uuid::nil();
        assert_eq!(
            public_url("https://larder.example/", id),
            "https://larder.example/api/images/00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = InMemoryObjectStore::default();
        let id = store
            .put(Bucket::Feedback, "a.png", "image/png", b"png-bytes")
            .await
            .unwrap();

        let object = store.get(id).await.unwrap().unwrap();
        assert_eq!(object.content_type, "image/png");
        assert_eq!(object.data, b"png-bytes");
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
