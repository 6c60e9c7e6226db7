use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::mvi::Reducer;

use super::root::{RootAction, RootReducer, RootState};

/// Immutable view of committed state.
pub type Snapshot = Arc<RootState>;

pub(crate) enum StoreCommand {
    Dispatch {
        action: RootAction,
        respond_to: oneshot::Sender<Snapshot>,
    },
}

/// The single writer. Owns the state and applies actions one at a time.
pub struct StoreServer {
    receiver: mpsc::Receiver<StoreCommand>,
    state: Snapshot,
    publisher: watch::Sender<Snapshot>,
}

impl StoreServer {
    pub(crate) fn new(
        receiver: mpsc::Receiver<StoreCommand>,
        initial: RootState,
    ) -> (Self, watch::Receiver<Snapshot>) {
        let state = Arc::new(initial);
        let (publisher, snapshots) = watch::channel(state.clone());
        (
            Self {
                receiver,
                state,
                publisher,
            },
            snapshots,
        )
    }

    /// Apply commands until every [`Store`](super::Store) handle is dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                StoreCommand::Dispatch { action, respond_to } => {
                    let snapshot = self.apply(action);
                    if respond_to.send(snapshot).is_err() {
                        tracing::trace!("Store: dispatch response dropped (receiver gone)");
                    }
                }
            }
        }
        tracing::debug!("Store: command channel closed, stopping");
    }

    fn apply(&mut self, action: RootAction) -> Snapshot {
        let current = Arc::unwrap_or_clone(std::mem::take(&mut self.state));
        self.state = Arc::new(RootReducer::reduce(current, action));
        self.publisher.send_replace(self.state.clone());
        self.state.clone()
    }
}
