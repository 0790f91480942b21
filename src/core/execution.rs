//! # Test Execution Engine Module / 测试执行引擎模块
//!
//! This module sequences a suite run: `before`, then for every test case
//! `before_each`, the test body and `after_each`, then `after`. Each callback
//! invocation is a step which finishes when its callback returned and all of
//! its `Async` tokens completed, on the first failure, on timeout or on
//! cancellation.
//!
//! 此模块负责编排套件运行：先 `before`，然后对每个测试用例依次执行 `before_each`、
//! 测试体和 `after_each`，最后 `after`。每次回调调用都是一个步骤，当回调返回且其所有
//! `Async` 令牌完成、出现第一个失败、超时或取消时结束。

use chrono::Utc;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::context::{lock_data, new_shared_data, SharedData, StepState, TestContext};
use crate::core::models::{Failure, FailureKind, SuiteSummary, TestResult};
use crate::core::suite::{Callback, StepResult, SuiteDefinition, TestCase};
use crate::reporting::{ReportDispatcher, ReportEvent};

/// Everything a run needs besides the suite itself.
pub(crate) struct RunContext {
    pub(crate) timeout: Duration,
    pub(crate) cancel: CancellationToken,
    /// Never cancelled: `after_each` and `after` release resources even when
    /// the run is cancelled.
    pub(crate) cleanup: CancellationToken,
    pub(crate) dispatcher: ReportDispatcher,
}

/// Invokes a callback, turning panics into errors.
///
/// A blocking callback runs inside this future's poll, so neither the step
/// timeout nor cancellation can interrupt it before it returns.
async fn invoke(callback: &Callback, ctx: &TestContext) -> StepResult {
    let outcome = match callback {
        Callback::Blocking(f) => std::panic::catch_unwind(AssertUnwindSafe(|| f(ctx))),
        Callback::Future(f) => AssertUnwindSafe(f(ctx.clone())).catch_unwind().await,
    };
    outcome.unwrap_or_else(|payload| Err(anyhow::anyhow!(Failure::from_panic(&*payload).message)))
}

/// Runs one step and returns its failure, if any.
/// 运行一个步骤并返回其失败（如有）。
pub(crate) async fn run_step(
    callback: &Callback,
    data: SharedData,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Option<Failure> {
    let step = StepState::new();
    let ctx = TestContext::new(Arc::clone(&step), data);

    let work = async {
        // A failure recorded elsewhere (e.g. a spawned task) ends the step
        // even while the callback's future is still pending.
        tokio::select! {
            res = invoke(callback, &ctx) => {
                if let Err(e) = res {
                    step.fail(Failure::from_error(&e));
                }
            }
            _ = step.wait_failed() => {}
        }
        step.wait_settled().await;
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            step.fail(Failure::cancelled());
        }
        res = tokio::time::timeout(timeout, work) => {
            if res.is_err() {
                step.fail(Failure::timeout(timeout));
            }
        }
    }

    step.finish()
}

/// Runs a whole suite, reporting as it goes, and returns the summary.
/// 运行整个套件，边运行边报告，并返回摘要。
pub(crate) async fn run_suite(suite: Arc<SuiteDefinition>, mut run: RunContext) -> SuiteSummary {
    let started = Instant::now();
    let mut results = Vec::new();
    let mut suite_errors = Vec::new();

    debug!(suite = %suite.name, cases = suite.cases.len(), "starting test suite");
    run.dispatcher.dispatch(&ReportEvent::BeginSuite {
        name: suite.name.clone(),
    });

    let suite_data = new_shared_data(Map::new());

    let before_failure = match &suite.before {
        Some(before) => run_step(before, Arc::clone(&suite_data), run.timeout, &run.cancel).await,
        None => None,
    };

    match before_failure {
        Some(failure) => {
            debug!(suite = %suite.name, "before hook failed, skipping test cases");
            run.dispatcher.dispatch(&ReportEvent::Error {
                failure: failure.clone(),
            });
            suite_errors.push(failure);
        }
        None => {
            'cases: for case in &suite.cases {
                for _ in 0..case.repeat {
                    if run.cancel.is_cancelled() {
                        break 'cases;
                    }
                    let seed = lock_data(&suite_data).clone();
                    let result = run_case(&suite, case, seed, &mut run).await;
                    results.push(result);
                }
            }

            if let Some(after) = &suite.after {
                if let Some(failure) =
                    run_step(after, Arc::clone(&suite_data), run.timeout, &run.cleanup).await
                {
                    run.dispatcher.dispatch(&ReportEvent::Error {
                        failure: failure.clone(),
                    });
                    suite_errors.push(failure);
                }
            }
        }
    }

    let cancelled = run.cancel.is_cancelled();
    let already_reported = suite_errors.iter().any(|f| f.kind == FailureKind::Cancelled)
        || results
            .iter()
            .any(|r| matches!(&r.failure, Some(f) if f.kind == FailureKind::Cancelled));
    if cancelled && !already_reported {
        let failure = Failure::cancelled();
        run.dispatcher.dispatch(&ReportEvent::Error {
            failure: failure.clone(),
        });
        suite_errors.push(failure);
    }

    let summary = SuiteSummary {
        name: suite.name.clone(),
        results,
        suite_errors,
        duration: started.elapsed(),
        cancelled,
    };
    debug!(
        suite = %summary.name,
        run = summary.run(),
        failures = summary.failures(),
        errors = summary.errors(),
        "test suite finished"
    );
    run.dispatcher.dispatch(&ReportEvent::EndSuite {
        summary: summary.clone(),
    });
    summary
}

/// Runs `before_each`, the case body and `after_each` for one execution of a
/// test case.
async fn run_case(
    suite: &SuiteDefinition,
    case: &TestCase,
    seed: Map<String, Value>,
    run: &mut RunContext,
) -> TestResult {
    run.dispatcher.dispatch(&ReportEvent::BeginTest {
        name: case.name.clone(),
    });

    let begin_time = Utc::now();
    let started = Instant::now();
    let data = new_shared_data(seed);

    let mut failure = match &suite.before_each {
        Some(hook) => run_step(hook, Arc::clone(&data), run.timeout, &run.cancel).await,
        None => None,
    };

    if failure.is_none() {
        failure = run_step(&case.callback, Arc::clone(&data), run.timeout, &run.cancel).await;
        if let Some(hook) = &suite.after_each {
            let after_failure = run_step(hook, Arc::clone(&data), run.timeout, &run.cleanup).await;
            failure = failure.or(after_failure);
        }
    }

    let result = TestResult {
        name: case.name.clone(),
        begin_time,
        duration: started.elapsed(),
        failure,
    };
    debug!(test = %result.name, passed = result.succeeded(), "test case finished");
    run.dispatcher.dispatch(&ReportEvent::EndTest {
        result: result.clone(),
    });
    result
}
