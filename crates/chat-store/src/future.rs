//! Single-assignment result handle for issued store operations

use std::future::{Future, IntoFuture};

use chat_core::DomainError;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::Instrument;

/// Result of a store operation
pub type StoreResult<T> = Result<T, DomainError>;

enum State<T> {
    Pending(oneshot::Receiver<StoreResult<T>>),
    Resolved(StoreResult<T>),
}

/// Handle to a store operation running on its own task
///
/// Issuing never blocks. The owner either consumes the handle with
/// `.await`, or calls [`StoreFuture::wait`] as often as it likes and gets
/// the same result every time.
pub struct StoreFuture<T> {
    state: State<T>,
}

fn abandoned() -> DomainError {
    DomainError::StoreUnavailable("store operation ended without a result".to_string())
}

impl<T: Send + 'static> StoreFuture<T> {
    /// Start `op` on the current runtime, inside the caller's span
    ///
    /// Resolves immediately with `StoreUnavailable` when there is no
    /// runtime to run it on.
    pub fn issue<F>(op: F) -> Self
    where
        F: Future<Output = StoreResult<T>> + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            return Self::ready(Err(DomainError::StoreUnavailable(
                "no async runtime to run the store operation".to_string(),
            )));
        };

        let (tx, rx) = oneshot::channel();
        handle.spawn(
            async move {
                // The owner may have dropped the handle; nothing to report then
                let _ = tx.send(op.await);
            }
            .in_current_span(),
        );

        Self {
            state: State::Pending(rx),
        }
    }
}

impl<T> StoreFuture<T> {
    /// An already resolved handle
    pub fn ready(result: StoreResult<T>) -> Self {
        Self {
            state: State::Resolved(result),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, State::Resolved(_))
    }

    /// Wait for the producer if it has not finished yet
    ///
    /// Cancel safe: dropping this future mid-wait leaves the handle pending.
    async fn settle(&mut self) {
        if let State::Pending(rx) = &mut self.state {
            let result = rx.await.unwrap_or_else(|_| Err(abandoned()));
            self.state = State::Resolved(result);
        }
    }
}

impl<T: Clone> StoreFuture<T> {
    /// Wait for the result; repeated calls return the stored outcome
    pub async fn wait(&mut self) -> StoreResult<T> {
        self.settle().await;
        match &self.state {
            State::Resolved(result) => result.clone(),
            State::Pending(_) => Err(abandoned()),
        }
    }
}

impl<T: Send + 'static> IntoFuture for StoreFuture<T> {
    type Output = StoreResult<T>;
    type IntoFuture = BoxFuture<'static, StoreResult<T>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            match self.state {
                State::Resolved(result) => result,
                State::Pending(rx) => rx.await.unwrap_or_else(|_| Err(abandoned())),
            }
        })
    }
}

impl<T> std::fmt::Debug for StoreFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreFuture")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
