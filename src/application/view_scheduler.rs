// View scheduler - Re-runs a view's fetch whenever one of its inputs changes
use crate::application::view_state::ViewCell;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Inputs a view declares. `changed` resolves once any of them moved on
/// and returns false once they can no longer change.
#[async_trait]
pub trait Dependencies: Send + 'static {
    type Snapshot: Send + 'static;

    fn snapshot(&mut self) -> Self::Snapshot;

    async fn changed(&mut self) -> bool;
}

#[async_trait]
impl<T> Dependencies for watch::Receiver<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Snapshot = T;

    fn snapshot(&mut self) -> T {
        self.borrow_and_update().clone()
    }

    async fn changed(&mut self) -> bool {
        watch::Receiver::changed(self).await.is_ok()
    }
}

#[async_trait]
impl<A, B> Dependencies for (A, B)
where
    A: Dependencies,
    B: Dependencies,
{
    type Snapshot = (A::Snapshot, B::Snapshot);

    fn snapshot(&mut self) -> Self::Snapshot {
        (self.0.snapshot(), self.1.snapshot())
    }

    async fn changed(&mut self) -> bool {
        let (a, b) = self;
        let first_closed = tokio::select! {
            open = a.changed() => {
                if open {
                    return true;
                }
                true
            }
            open = b.changed() => {
                if open {
                    return true;
                }
                false
            }
        };

        // One side is gone; the view lives on as long as the other can change
        if first_closed {
            b.changed().await
        } else {
            a.changed().await
        }
    }
}

/// Drive `cell` from `deps`: fetch once for the current inputs, then again
/// on every change. Fetches run concurrently; the cell drops superseded
/// results by generation.
pub fn spawn_view<D, T, F, Fut>(mut deps: D, cell: Arc<ViewCell<T>>, fetch: F) -> JoinHandle<()>
where
    D: Dependencies,
    T: Clone + Send + Sync + 'static,
    F: Fn(D::Snapshot) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let inputs = deps.snapshot();
            let ticket = cell.begin();
            tracing::debug!("{} view fetching (generation {})", cell.view(), ticket.generation());

            let pending = fetch(inputs);
            let target = cell.clone();
            tokio::spawn(async move {
                let outcome = pending.await;
                target.resolve(ticket, outcome);
            });

            if !deps.changed().await {
                tracing::debug!("{} view inputs closed, stopping", cell.view());
                break;
            }
        }
    })
}

/// Run a fetch exactly once into `cell`, for data loaded at startup
pub fn spawn_once<T, Fut>(cell: Arc<ViewCell<T>>, fetch: Fut) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
{
    let ticket = cell.begin();
    tokio::spawn(async move {
        let outcome = fetch.await;
        cell.resolve(ticket, outcome);
    })
}
