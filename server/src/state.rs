use axum::extract::FromRef;
use larder_core::{RecipeRepository, SearchEngine};
use std::sync::Arc;

use crate::auth::SessionStore;
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::storage::ObjectStore;

/// Application state shared across all handlers.
///
/// Everything is built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub sessions: Arc<dyn SessionStore>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub search: SearchEngine,
    pub objects: Arc<dyn ObjectStore>,
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for Arc<dyn SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
