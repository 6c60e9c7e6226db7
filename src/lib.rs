//! Client-side store for a posts/users REST collection.
//!
//! Posts and users are fetched into an in-memory store owned by a single
//! actor. Callers read snapshots through [`selectors`] and change state only
//! through the named operations on [`store::Store`].

pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod mvi;
pub mod posts;
pub mod selectors;
pub mod store;
pub mod users;
