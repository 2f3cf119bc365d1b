//! Session lookup for the auth extractors.

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::DbPool;
use crate::models::User;

use super::crypto::hash_token;
use super::db::find_user_by_token_hash;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Owner of the live session for `token`. Unknown, expired and
    /// unverifiable tokens all give `None`.
    async fn user_for_token(&self, token: &str) -> Option<User>;
}

pub struct PgSessionStore {
    pool: Arc<DbPool>,
}

impl PgSessionStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn user_for_token(&self, token: &str) -> Option<User> {
        let pool = self.pool.clone();
        let token_hash = hash_token(token);

        // r2d2 checkout and the query both block.
        let lookup = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| e.to_string())?;
            find_user_by_token_hash(&mut conn, &token_hash).map_err(|e| e.to_string())
        })
        .await;

        match lookup {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Session lookup failed, treating caller as guest");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Session lookup task panicked");
                None
            }
        }
    }
}

#[cfg(test)]
pub use memory::InMemorySessionStore;

#[cfg(test)]
mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;
    use uuid::Uuid;

    /// Sessions keyed by token hash, with a lookup counter.
    #[derive(Default)]
    pub struct InMemorySessionStore {
        sessions: RwLock<HashMap<String, User>>,
        lookups: AtomicUsize,
    }

    impl InMemorySessionStore {
        /// Open a session for a new user called `username` and return its token.
        pub fn sign_in(&self, username: &str) -> String {
            let token = crate::auth::crypto::generate_token();
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                password_hash: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.sessions
                .write()
                .unwrap()
                .insert(hash_token(&token), user);
            token
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionStore for InMemorySessionStore {
        async fn user_for_token(&self, token: &str) -> Option<User> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.sessions
                .read()
                .unwrap()
                .get(&hash_token(token))
                .cloned()
        }
    }
}
