use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use futures_util::{stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::api::ApiError;
use crate::clock::{Clock, Tick};
use crate::namespace::NamespaceSelector;

pub type TriggerStream<K> = Pin<Box<dyn Stream<Item = K> + Send>>;

/// What a view currently shows for one pipeline.
#[derive(Debug)]
pub struct PipelineState<T> {
    /// Result of the latest fetch that succeeded and was not superseded.
    pub data: Option<Arc<T>>,
    /// Whether the most recently issued fetch is still outstanding.
    pub loading: bool,
    /// Generation of the fetch that produced `data` (0 before any data).
    pub generation: u64,
}

impl<T> Clone for PipelineState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            generation: self.generation,
        }
    }
}

impl<T> Default for PipelineState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            generation: 0,
        }
    }
}

/// Ticks of the shared clock, one per emission.
pub fn ticks(clock: &Clock) -> TriggerStream<Tick> {
    Box::pin(WatchStream::from_changes(clock.subscribe()))
}

/// Combine-latest of the clock and the namespace selector.
///
/// Nothing is emitted before the first tick; afterwards every tick and every
/// namespace change yields the latest `(tick, namespace)` pair.
pub fn ticks_with_namespace(
    clock: &Clock,
    namespace: &NamespaceSelector,
) -> TriggerStream<(Tick, String)> {
    let ticks = clock.subscribe();
    let namespaces = namespace.subscribe();
    Box::pin(stream::unfold(
        (ticks, namespaces, None::<Tick>),
        |(mut ticks, mut namespaces, mut last)| async move {
            loop {
                tokio::select! {
                    changed = ticks.changed() => {
                        changed.ok()?;
                        let tick = *ticks.borrow_and_update();
                        last = Some(tick);
                        let ns = namespaces.borrow_and_update().clone();
                        return Some(((tick, ns), (ticks, namespaces, last)));
                    }
                    changed = namespaces.changed() => {
                        changed.ok()?;
                        let ns = namespaces.borrow_and_update().clone();
                        if let Some(tick) = last {
                            return Some(((tick, ns), (ticks, namespaces, last)));
                        }
                    }
                }
            }
        },
    ))
}

/// A continuously refreshed, latest-wins view model.
///
/// Each trigger issues one fetch. Fetches run to completion on their own
/// task (so their error side effects still happen), but only the result of
/// the most recently issued fetch is ever applied. A failed fetch keeps the
/// previous data. Dropping the pipeline stops the driver and releases its
/// upstream subscriptions.
#[derive(Debug)]
pub struct Pipeline<T> {
    name: &'static str,
    state: watch::Receiver<PipelineState<T>>,
    driver: JoinHandle<()>,
}

impl<T: Send + Sync + 'static> Pipeline<T> {
    pub fn spawn<K, F, Fut>(name: &'static str, triggers: TriggerStream<K>, fetch: F) -> Self
    where
        K: Send + 'static,
        F: Fn(K) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (tx, state) = watch::channel(PipelineState::default());
        let driver = tokio::spawn(drive(name, triggers, fetch, tx));
        Self {
            name,
            state,
            driver,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> PipelineState<T> {
        self.state.borrow().clone()
    }

    /// Marks the current state as seen and returns it.
    pub fn take_state(&mut self) -> PipelineState<T> {
        self.state.borrow_and_update().clone()
    }

    /// Waits for the next state change. `false` once the pipeline has
    /// stopped (its trigger source is gone).
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState<T>> {
        self.state.clone()
    }
}

impl<T> Drop for Pipeline<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<T, K, F, Fut>(
    name: &'static str,
    mut triggers: TriggerStream<K>,
    fetch: F,
    state: watch::Sender<PipelineState<T>>,
) where
    T: Send + Sync + 'static,
    K: Send + 'static,
    F: Fn(K) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Result<T, ApiError>)>();
    let mut issued: u64 = 0;

    loop {
        tokio::select! {
            trigger = triggers.next() => {
                let Some(key) = trigger else {
                    tracing::debug!(pipeline = name, "trigger source closed, pipeline stopped");
                    return;
                };
                issued += 1;
                let generation = issued;
                state.send_modify(|s| s.loading = true);
                let request = fetch(key);
                let done = done_tx.clone();
                tokio::spawn(async move {
                    let _ = done.send((generation, request.await));
                });
            }
            Some((generation, result)) = done_rx.recv() => {
                if generation != issued {
                    tracing::debug!(pipeline = name, generation, latest = issued, "discarding superseded result");
                    continue;
                }
                match result {
                    Ok(data) => {
                        let data = Arc::new(data);
                        state.send_modify(|s| {
                            s.data = Some(data);
                            s.loading = false;
                            s.generation = generation;
                        });
                    }
                    Err(e) => {
                        tracing::debug!(pipeline = name, generation, error = %e, "fetch failed, keeping previous data");
                        state.send_modify(|s| s.loading = false);
                    }
                }
            }
        }
    }
}
