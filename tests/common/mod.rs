//! Shared test utilities.

#![allow(dead_code)]

pub mod mock_backend;

use postboard::api::ApiClient;
use postboard::config::{ApiConfig, StoreConfig, UpdateFailurePolicy};
use postboard::posts::FetchPolicy;
use postboard::store::Store;

use mock_backend::MockBackend;

/// API settings pointing at a mock backend, with short timeouts.
pub fn api_config(mock: &MockBackend) -> ApiConfig {
    ApiConfig {
        base_url: mock.base_url(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
    }
}

pub fn store_config(fetch_policy: FetchPolicy, update_failure: UpdateFailurePolicy) -> StoreConfig {
    StoreConfig {
        update_failure,
        fetch_policy,
        command_buffer: 16,
    }
}

/// A running store with default policies, talking to `mock`.
pub fn spawn_store(mock: &MockBackend) -> Store {
    spawn_store_with(mock, StoreConfig::default())
}

pub fn spawn_store_with(mock: &MockBackend, config: StoreConfig) -> Store {
    let api = ApiClient::new(&api_config(mock)).expect("api client");
    Store::spawn(api, &config)
}

/// JSON for a `GET /posts` response with the given ids (all by user 1).
pub fn posts_json(ids: &[u64]) -> String {
    let posts: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "userId": 1,
                "id": id,
                "title": format!("post {}", id),
                "body": format!("body of post {}", id),
            })
        })
        .collect();
    serde_json::Value::Array(posts).to_string()
}

pub fn users_json() -> String {
    serde_json::json!([
        {"id": 1, "name": "Leanne Graham", "username": "Bret"},
        {"id": 2, "name": "Ervin Howell", "username": "Antonette"},
    ])
    .to_string()
}

/// Ids currently held by the store, in collection order.
pub fn post_ids(store: &Store) -> Vec<u64> {
    store.state().posts.posts.iter().map(|p| p.id).collect()
}
