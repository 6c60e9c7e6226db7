//! Base trait for slice state.

use serde::Serialize;

/// Marker trait for slice state objects.
///
/// States must be cheap to snapshot (Clone), comparable so tests can assert
/// that a no-op action left them untouched, and have an initial value.
pub trait SliceState: Clone + PartialEq + Default + Send + Sync + 'static {}

/// Lifecycle of a slice's fetch-all request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Idle => "idle",
            LoadStatus::Loading => "loading",
            LoadStatus::Succeeded => "succeeded",
            LoadStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
