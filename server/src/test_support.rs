//! Router fixtures backed by in-memory collaborators.

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use larder_core::{
    Category, Difficulty, InMemoryRecipeRepository, Ranker, RankingError, Recipe, SearchEngine,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::InMemorySessionStore;
use crate::config::ServerConfig;
use crate::db::lazy_pool;
use crate::storage::InMemoryObjectStore;
use crate::AppState;

/// Ranker with a canned answer.
pub struct StubRanker {
    answer: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl StubRanker {
    /// Names no candidate, so results stay in local order.
    pub fn silent() -> Self {
        Self::answering(Vec::new())
    }

    pub fn answering(ids: Vec<String>) -> Self {
        Self {
            answer: Some(ids),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ranker for StubRanker {
    async fn rank(
        &self,
        _tokens: &[String],
        _candidates: &[Recipe],
    ) -> Result<Vec<String>, RankingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().ok_or(RankingError::MissingArray)
    }
}

/// A recipe created `age_mins` minutes ago.
pub fn recipe(title: &str, ingredients: &[&str], category: Category, age_mins: i64) -> Recipe {
    let created_at = Utc::now() - Duration::minutes(age_mins);
    Recipe {
        id: Uuid::new_v4(),
        title: title.to_string(),
        image: format!("http://larder.test/api/images/{}", Uuid::new_v4()),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        steps: vec!["Cook".to_string()],
        category,
        difficulty: Difficulty::Easy,
        description: String::new(),
        estimated_time: "20 min".to_string(),
        created_at,
        updated_at: created_at,
    }
}

pub struct TestApp {
    pub router: Router,
    pub recipes: Arc<InMemoryRecipeRepository>,
    pub ranker: Arc<StubRanker>,
    pub objects: Arc<InMemoryObjectStore>,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    pub fn new(recipes: Vec<Recipe>, ranker: StubRanker) -> Self {
        Self::build(
            InMemoryRecipeRepository::new(recipes),
            ranker,
            ServerConfig::for_tests(),
        )
    }

    pub fn build(
        repo: InMemoryRecipeRepository,
        ranker: StubRanker,
        config: ServerConfig,
    ) -> Self {
        let recipes = Arc::new(repo);
        let ranker = Arc::new(ranker);
        let objects = Arc::new(InMemoryObjectStore::default());
        let sessions = Arc::new(InMemorySessionStore::default());

        let state = AppState {
            pool: Arc::new(lazy_pool(&config.database_url)),
            sessions: sessions.clone(),
            recipes: recipes.clone(),
            search: SearchEngine::new(recipes.clone(), ranker.clone()),
            objects: objects.clone(),
            config: Arc::new(config),
        };

        Self {
            router: crate::app::router(state),
            recipes,
            ranker,
            objects,
            sessions,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// `name=value` part of the `Set-Cookie` header for `name`, ready to be
    /// sent back in a `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{name}=")))
            .map(str::to_string)
    }

    /// Ids of the recipes under `results`, in order.
    pub fn result_ids(&self) -> Vec<String> {
        self.json()["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    }
}

/// A `multipart/form-data` body with text fields only.
pub fn multipart_request(method: &str, uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    const BOUNDARY: &str = "larder-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
