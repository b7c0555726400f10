//! Async wrapper around [`Collector`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every collector operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], so store I/O never stalls the event loop.
//!
//! # Example
//!
//! ```no_run
//! use mycollector_core::{Action, AsyncCollector, Collector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let builder = Collector::builder().user_id("alice");
//!     let collector = AsyncCollector::build(builder).await.unwrap();
//!     collector.load().await.unwrap();
//!
//!     collector.dispatch(Action::TogglePin("set-1".into())).await.unwrap();
//!     collector.save().await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{CollectorError, Result};
use crate::reducer::{Action, CollectionsState};
use crate::{Collector, CollectorBuilder};

/// Async wrapper around [`Collector`].
///
/// Cloning is cheap; clones share the same collector behind a [`Mutex`], so
/// actions from any task are applied one at a time.
#[derive(Clone)]
pub struct AsyncCollector {
    inner: Arc<Mutex<Collector>>,
}

fn join_error(e: tokio::task::JoinError) -> CollectorError {
    CollectorError::InvalidArgument(format!("Task join error: {e}"))
}

impl AsyncCollector {
    pub fn new(collector: Collector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(collector)),
        }
    }

    /// Build the collector on the blocking pool; the default file store
    /// creates its data directory.
    pub async fn build(builder: CollectorBuilder) -> Result<Self> {
        tokio::task::spawn_blocking(move || builder.build().map(Self::new))
            .await
            .map_err(join_error)?
    }

    /// Run a sync collector operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Collector) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let collector = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = collector
                .lock()
                .map_err(|_| CollectorError::InvalidArgument("Collector lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(join_error)?
    }

    pub async fn load(&self) -> Result<()> {
        self.run(|c| c.load()).await
    }

    pub async fn dispatch(&self, action: Action) -> Result<()> {
        self.run(move |c| {
            c.dispatch(action);
            Ok(())
        })
        .await
    }

    pub async fn save(&self) -> Result<bool> {
        self.run(|c| c.save()).await
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> Result<CollectionsState> {
        self.run(|c| Ok(c.state().clone())).await
    }
}
