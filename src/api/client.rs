use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::error::ApiError;
use crate::config::ApiConfig;
use crate::models::{NewPost, PostId, PostUpdate, RemotePost, UpdatedPost, User};

/// Thin wrapper over the five REST calls the store needs.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|source| ApiError::Build { source })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /posts`
    pub async fn list_posts(&self) -> Result<Vec<RemotePost>, ApiError> {
        let url = self.url("/posts");
        let resp = self.send(self.client.get(&url), &url).await?;
        decode(resp, &url).await
    }

    /// `POST /posts`. The id in the echo is not trustworthy.
    pub async fn create_post(&self, post: &NewPost) -> Result<RemotePost, ApiError> {
        let url = self.url("/posts");
        let resp = self.send(self.client.post(&url).json(post), &url).await?;
        decode(resp, &url).await
    }

    /// `PUT /posts/{id}` with the full post.
    ///
    /// A body that is not a post-shaped object comes back as an empty
    /// [`UpdatedPost`] so the caller can tell the merge apart from a failure.
    pub async fn update_post(&self, post: &PostUpdate) -> Result<UpdatedPost, ApiError> {
        let url = self.url(&format!("/posts/{}", post.id));
        let resp = self.send(self.client.put(&url).json(post), &url).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Connection {
                url: url.clone(),
                source,
            })?;

        match serde_json::from_slice::<UpdatedPost>(&bytes) {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::warn!(post_id = post.id, error = %e, "Unrecognized update response");
                Ok(UpdatedPost::default())
            }
        }
    }

    /// `DELETE /posts/{id}`. Only a plain 200 counts as deleted.
    pub async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        let url = self.url(&format!("/posts/{}", id));
        let resp = self.send(self.client.delete(&url), &url).await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(())
    }

    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.url("/users");
        let resp = self.send(self.client.get(&url), &url).await?;
        decode(resp, &url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx answers into [`ApiError::Status`].
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Response, ApiError> {
        let resp = builder.send().await.map_err(|source| ApiError::Connection {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        tracing::debug!(url, status = status.as_u16(), "API response");

        if !status.is_success() {
            let message = resp
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, url: &str) -> Result<T, ApiError> {
    let bytes = resp.bytes().await.map_err(|source| ApiError::Connection {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/posts/3"), "http://localhost:3000/posts/3");
    }
}
