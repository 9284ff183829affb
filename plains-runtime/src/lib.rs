//! Tokio runtime shared by the `plains` binary, with one cancellation token
//! that every long-lived task watches.
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct PlainsRuntime {
    runtime: Runtime,
    cancel: CancellationToken,
}

#[derive(Clone)]
pub struct PlainsHandle {
    inner: Handle,
    cancel: CancellationToken,
}

impl PlainsRuntime {
    /// Build a multi-thread runtime. `worker_threads` of `None` lets tokio
    /// pick; `Some(0)` is treated as one.
    ///
    /// ```
    /// use plains_runtime::PlainsRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = PlainsRuntime::build("doctest-runtime", Some(1))
    ///     .expect("runtime builds");
    /// assert_eq!(runtime.block_on(async { 2 + 2 }), 4);
    /// runtime.shutdown(Duration::from_millis(10));
    /// ```
    pub fn build(thread_name: &str, worker_threads: Option<usize>) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.enable_all().thread_name(thread_name);
        if let Some(workers) = worker_threads {
            builder.worker_threads(workers.max(1));
        }
        let runtime = builder
            .build()
            .with_context(|| format!("building tokio runtime `{thread_name}`"))?;
        Ok(Self {
            runtime,
            cancel: CancellationToken::new(),
        })
    }

    pub fn handle(&self) -> PlainsHandle {
        PlainsHandle {
            inner: self.runtime.handle().clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Cancel the shared token, then give in-flight tasks `graceful` to finish.
    ///
    /// ```
    /// use plains_runtime::PlainsRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = PlainsRuntime::build("shutdown-example", Some(1)).unwrap();
    /// let token = runtime.handle().cancellation();
    /// runtime.shutdown(Duration::from_millis(5));
    /// assert!(token.is_cancelled());
    /// ```
    pub fn shutdown(self, graceful: Duration) {
        tracing::debug!(graceful_ms = graceful.as_millis() as u64, "runtime.shutdown");
        self.cancel.cancel();
        self.runtime.shutdown_timeout(graceful);
    }
}

impl PlainsHandle {
    pub fn spawn<F, T>(&self, fut: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.inner.spawn(fut)
    }

    /// Spawn `fut`, dropping it when the shared token is cancelled. The task
    /// resolves to `None` in that case.
    ///
    /// ```
    /// use plains_runtime::PlainsRuntime;
    /// use std::time::Duration;
    ///
    /// let runtime = PlainsRuntime::build("cancellable-example", Some(1)).unwrap();
    /// let handle = runtime.handle();
    /// handle.cancellation().cancel();
    /// let task = handle.spawn_cancellable(async {
    ///     tokio::time::sleep(Duration::from_secs(60)).await;
    ///     7
    /// });
    /// assert_eq!(runtime.block_on(task).unwrap(), None);
    /// ```
    pub fn spawn_cancellable<F, T>(&self, fut: F) -> JoinHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.inner.spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                out = fut => Some(out),
            }
        })
    }

    /// The shared token. Cancelling it stops every task watching it.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// A token cancelled with the shared one, but cancellable on its own.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_task_runs_to_completion() {
        let runtime = PlainsRuntime::build("test-spawn", Some(1)).unwrap();
        let task = runtime.handle().spawn(async { 21 * 2 });
        assert_eq!(runtime.block_on(task).unwrap(), 42);
        runtime.shutdown(Duration::from_millis(10));
    }

    #[test]
    fn child_cancel_does_not_reach_parent() {
        let runtime = PlainsRuntime::build("test-child", Some(1)).unwrap();
        let handle = runtime.handle();
        let child = handle.child_token();
        child.cancel();
        assert!(!handle.cancellation().is_cancelled());

        let child = handle.child_token();
        handle.cancellation().cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn uncancelled_task_yields_its_value() {
        let runtime = PlainsRuntime::build("test-cancellable", Some(1)).unwrap();
        let task = runtime.handle().spawn_cancellable(async { "done" });
        assert_eq!(runtime.block_on(task).unwrap(), Some("done"));
    }
}
