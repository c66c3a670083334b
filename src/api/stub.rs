//! In-process offset API serving canned bodies, for tests.

use crate::api::Endpoint;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct StubApi {
    responses: HashMap<(Endpoint, String), (StatusCode, String)>,
    requests: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: Endpoint, zookeeper: &str, body: &str) -> Self {
        self.respond_with_status(endpoint, zookeeper, StatusCode::OK, body)
    }

    pub fn respond_with_status(
        mut self,
        endpoint: Endpoint,
        zookeeper: &str,
        status: StatusCode,
        body: &str,
    ) -> Self {
        self.responses
            .insert((endpoint, zookeeper.to_string()), (status, body.to_string()));
        self
    }

    /// Bind to an ephemeral port and return the base URL (with trailing slash).
    pub async fn serve(self) -> (String, Arc<Self>) {
        let state = Arc::new(self);
        let app = Router::new()
            .route("/latest_offset", get(latest_offset_handler))
            .route("/consumer_group_distance", get(distance_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/"), state)
    }

    /// Requests received so far, as `<path>?zookeeper=<conn>`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn reply(&self, endpoint: Endpoint, query: &HashMap<String, String>) -> (StatusCode, String) {
        let zookeeper = query.get("zookeeper").cloned().unwrap_or_default();
        self.requests
            .lock()
            .unwrap()
            .push(format!("{}?zookeeper={}", endpoint.path(), zookeeper));

        self.responses
            .get(&(endpoint, zookeeper))
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, "unknown zookeeper".to_string()))
    }
}

async fn latest_offset_handler(
    State(api): State<Arc<StubApi>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    api.reply(Endpoint::LatestOffset, &query)
}

async fn distance_handler(
    State(api): State<Arc<StubApi>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    api.reply(Endpoint::ConsumerGroupDistance, &query)
}
