//! # Test Completion Module / 测试完成模块
//!
//! Callback-ability for the end of a suite run. The completion succeeds when
//! every test passed and no hook failed, and fails otherwise.
//!
//! 为套件运行结束提供回调能力。当所有测试通过且没有钩子失败时完成成功，否则失败。

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::core::models::SuiteSummary;
use crate::error::{SuiteFailed, UnitError};

type Handler = Box<dyn FnOnce(&SuiteSummary) + Send>;

struct CompletionState {
    summary: watch::Sender<Option<Arc<SuiteSummary>>>,
    handlers: Mutex<Vec<Handler>>,
}

/// Handle on a running (or finished) suite.
/// 正在运行（或已完成）的套件的句柄。
#[derive(Clone)]
pub struct TestCompletion {
    state: Arc<CompletionState>,
    cancel: CancellationToken,
}

impl TestCompletion {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        let (summary, _) = watch::channel(None);
        Self {
            state: Arc::new(CompletionState {
                summary,
                handlers: Mutex::new(Vec::new()),
            }),
            cancel,
        }
    }

    /// Publishes the summary and runs the registered handlers.
    pub(crate) fn complete(&self, summary: SuiteSummary) {
        let summary = Arc::new(summary);
        let handlers = {
            let mut handlers = self
                .state
                .handlers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.state.summary.send_replace(Some(Arc::clone(&summary)));
            std::mem::take(&mut *handlers)
        };
        for handler in handlers {
            handler(&summary);
        }
    }

    /// The summary, once the suite finished.
    pub fn summary(&self) -> Option<Arc<SuiteSummary>> {
        self.state.summary.borrow().clone()
    }

    pub fn is_completed(&self) -> bool {
        self.state.summary.borrow().is_some()
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self.summary(), Some(s) if s.is_success())
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.summary(), Some(s) if !s.is_success())
    }

    /// Registers a callback invoked once with the summary. It runs right away
    /// when the suite already finished.
    /// 注册一个在完成时以摘要调用一次的回调。若套件已完成则立即执行。
    pub fn handler<F>(&self, f: F)
    where
        F: FnOnce(&SuiteSummary) + Send + 'static,
    {
        let mut handlers = self
            .state
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let done = self.state.summary.borrow().clone();
        match done {
            Some(summary) => {
                drop(handlers);
                f(&summary);
            }
            None => handlers.push(Box::new(f)),
        }
    }

    /// Notifies `sender` of the outcome of the suite.
    pub fn resolve(&self, sender: oneshot::Sender<Result<(), SuiteFailed>>) {
        self.handler(move |summary| {
            // The receiver may have gone away; nobody is left to tell.
            let _ = sender.send(outcome(summary));
        });
    }

    /// Waits for the suite to finish.
    pub async fn wait(&self) -> Arc<SuiteSummary> {
        let mut rx = self.state.summary.subscribe();
        if let Ok(summary) = rx.wait_for(Option::is_some).await {
            if let Some(summary) = summary.clone() {
                return summary;
            }
        }
        // The sender lives in `self.state`, so the channel never closes first.
        std::future::pending().await
    }

    /// Waits for the suite to finish and fails if it did not succeed.
    pub async fn wait_success(&self) -> Result<Arc<SuiteSummary>, SuiteFailed> {
        let summary = self.wait().await;
        outcome(&summary)?;
        Ok(summary)
    }

    pub async fn wait_timeout(&self, timeout: Duration) -> Result<Arc<SuiteSummary>, UnitError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| UnitError::Timeout(timeout))
    }

    /// Blocks the current thread until the suite finishes. Must not be called
    /// from a thread driving the suite's runtime.
    pub fn blocking_wait(&self) -> Arc<SuiteSummary> {
        futures::executor::block_on(self.wait())
    }

    /// Requests cancellation: the pending step fails and no further test
    /// case starts.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for TestCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCompletion")
            .field("completed", &self.is_completed())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

fn outcome(summary: &SuiteSummary) -> Result<(), SuiteFailed> {
    if summary.is_success() {
        Ok(())
    } else {
        Err(SuiteFailed {
            suite: summary.name.clone(),
            run: summary.run(),
            failures: summary.failures(),
            errors: summary.errors(),
        })
    }
}
