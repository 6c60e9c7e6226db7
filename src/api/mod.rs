//! HTTP client for the remote posts/users collection.

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;
