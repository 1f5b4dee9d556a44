//! # Roster Runtime
//!
//! Runtime implementation for the event roster.
//!
//! This crate provides the Store runtime that owns domain state, serialises
//! reducer execution, and runs the effects reducers return.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Turns effect descriptions into futures and collects the actions they yield
//! - **Feedback Loop**: Actions produced by effects are reduced in FIFO order
//!
//! ## Example
//!
//! ```ignore
//! use roster_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use futures::future::join_all;
use roster_core::{SmallVec, effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

/// Boxed future yielding the actions an effect fed back
type ActionsFuture<A> = Pin<Box<dyn Future<Output = Vec<A>> + Send>>;

/// Convert an effect description into a future that yields its feedback actions
///
/// Parallel children are awaited together with `join_all`; their actions are
/// returned in declaration order regardless of completion order. Sequential
/// children are awaited one at a time.
fn execute_effect<A>(effect: Effect<A>) -> ActionsFuture<A>
where
    A: Send + 'static,
{
    match effect {
        Effect::None => {
            metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            Box::pin(async { Vec::new() })
        },
        Effect::Future(fut) => {
            metrics::counter!("store.effects.executed", "type" => "future").increment(1);
            Box::pin(async move { fut.await.into_iter().collect() })
        },
        Effect::Parallel(effects) => {
            metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
            let futures: Vec<_> = effects.into_iter().map(execute_effect).collect();
            Box::pin(async move { join_all(futures).await.into_iter().flatten().collect() })
        },
        Effect::Sequential(effects) => {
            metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
            let futures: Vec<_> = effects.into_iter().map(execute_effect).collect();
            Box::pin(async move {
                let mut actions = Vec::new();
                for future in futures {
                    actions.extend(future.await);
                }
                actions
            })
        },
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, Effect, Ordering, Reducer, RwLock, SmallVec, StoreError, VecDeque,
        execute_effect,
    };

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, so every reducer call is a single writer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Releases the lock and executes the returned effects
        /// 4. Actions produced by effects are reduced in turn (feedback loop)
        ///
        /// Returns once every effect, including those triggered by feedback
        /// actions, has completed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            self.send_and_inspect(action, |_| ()).await
        }

        /// Send an action and read state under the same write lock
        ///
        /// The closure runs right after the reducer, before any other sender
        /// can touch the state. Use it to read back the outcome of a command
        /// when several callers share one store.
        ///
        /// ```ignore
        /// let outcome = store
        ///     .send_and_inspect(RosterAction::Register { .. }, |s| s.last_outcome.clone())
        ///     .await?;
        /// ```
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        pub async fn send_and_inspect<F, T>(&self, action: A, inspect: F) -> Result<T, StoreError>
        where
            F: FnOnce(&S) -> T,
        {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (effects, value) = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");
                let effects = self.reduce_locked(&mut state, action);
                (effects, inspect(&state))
            };

            self.run_effects(effects).await;
            tracing::debug!("Action processing completed");

            Ok(value)
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let registrations = store.state(|s| s.catalog.registrations().len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Stop accepting new actions
        ///
        /// Actions already being reduced finish normally. Feedback actions
        /// produced after this call are dropped.
        pub fn shutdown(&self) {
            tracing::info!("Store shutdown requested");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Returns `true` once `shutdown()` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        fn reduce_locked(&self, state: &mut S, action: A) -> SmallVec<[Effect<A>; 4]> {
            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            effects
        }

        async fn run_effects(&self, effects: SmallVec<[Effect<A>; 4]>) {
            let mut pending: VecDeque<A> = VecDeque::new();
            let mut batch = effects;

            loop {
                for effect in batch {
                    pending.extend(execute_effect(effect).await);
                }

                let Some(action) = pending.pop_front() else {
                    break;
                };

                if self.shutdown.load(Ordering::Acquire) {
                    tracing::warn!(
                        dropped = pending.len() + 1,
                        "Dropping feedback actions: store is shutting down"
                    );
                    break;
                }

                tracing::trace!("Effect produced an action, feeding back into reducer");
                batch = {
                    let mut state = self.state.write().await;
                    self.reduce_locked(&mut state, action)
                };
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_effects_keep_declaration_order() {
        let effect = Effect::merge(vec![
            Effect::future(async {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Some(1u8)
            }),
            Effect::None,
            Effect::future(async { Some(2u8) }),
        ]);

        let actions = tokio_test::block_on(execute_effect(effect));
        assert_eq!(actions, vec![1, 2]);
    }

    #[test]
    fn sequential_effects_collect_in_order() {
        let effect = Effect::chain(vec![
            Effect::future(async { Some("first") }),
            Effect::future(async { None }),
            Effect::future(async { Some("second") }),
        ]);

        let actions = tokio_test::block_on(execute_effect(effect));
        assert_eq!(actions, vec!["first", "second"]);
    }
}
