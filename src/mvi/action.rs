//! Base trait for actions.

/// Marker trait for action objects.
///
/// Actions describe something that already happened: a user edit, or the
/// pending/fulfilled/rejected phase of a request. They carry every input the
/// reducer needs (timestamps included) so reducers stay deterministic.
pub trait Action: Send + 'static {}
