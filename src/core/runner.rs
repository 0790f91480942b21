//! # Suite Launcher Module / 套件启动模块
//!
//! Decides where a suite runs. With a Tokio runtime at hand the suite is
//! spawned on it and the returned [`TestCompletion`] resolves later. Without
//! one the suite runs to completion on a private current-thread runtime
//! before `launch` returns.
//!
//! 决定套件在哪里运行。若存在 Tokio 运行时，套件会被派发到该运行时上，
//! 返回的 [`TestCompletion`] 稍后完成。否则套件会在私有的单线程运行时上运行完毕后才返回。

use std::sync::Arc;
use tokio::runtime::{Builder, Handle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::completion::TestCompletion;
use crate::core::config::TestOptions;
use crate::core::execution::{run_suite, RunContext};
use crate::core::suite::SuiteDefinition;
use crate::error::UnitError;
use crate::reporting::{reporter_for, ReportDispatcher, Reporter};

/// Where the suite is driven.
#[derive(Debug)]
enum Placement {
    Spawn(Handle),
    Thread,
    Block,
}

fn placement(use_event_loop: Option<bool>, handle: Option<Handle>) -> Result<Placement, UnitError> {
    if let Some(handle) = handle {
        return Ok(Placement::Spawn(handle));
    }
    match (use_event_loop, Handle::try_current()) {
        (Some(false), Ok(_)) => Ok(Placement::Thread),
        (Some(false), Err(_)) => Ok(Placement::Block),
        (_, Ok(current)) => Ok(Placement::Spawn(current)),
        (Some(true), Err(_)) => Err(UnitError::NoEventLoop),
        (None, Err(_)) => Ok(Placement::Block),
    }
}

fn private_runtime() -> Result<tokio::runtime::Runtime, UnitError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(UnitError::Runtime)
}

/// Starts a suite run.
///
/// Reporter targets are validated before anything runs, so a bad target
/// fails the launch instead of the suite.
pub(crate) fn launch(
    definition: Arc<SuiteDefinition>,
    options: TestOptions,
    extra: Vec<Box<dyn Reporter>>,
    handle: Option<Handle>,
) -> Result<TestCompletion, UnitError> {
    let mut reporters: Vec<Box<dyn Reporter>> = options
        .validate()?
        .into_iter()
        .map(|(target, format)| reporter_for(target, format, &options.language))
        .collect();
    reporters.extend(extra);

    let placement = placement(options.use_event_loop, handle)?;
    debug!(suite = %definition.name, ?placement, timeout_ms = options.timeout_ms, "launching test suite");

    let cancel = CancellationToken::new();
    let completion = TestCompletion::new(cancel.clone());
    let run = RunContext {
        timeout: options.timeout(),
        cancel,
        cleanup: CancellationToken::new(),
        dispatcher: ReportDispatcher::new(reporters),
    };

    match placement {
        Placement::Spawn(handle) => {
            let done = completion.clone();
            handle.spawn(async move {
                let summary = run_suite(definition, run).await;
                done.complete(summary);
            });
        }
        Placement::Thread => {
            let runtime = private_runtime()?;
            let done = completion.clone();
            std::thread::Builder::new()
                .name(format!("async-unit-{}", definition.name))
                .spawn(move || {
                    let summary = runtime.block_on(run_suite(definition, run));
                    done.complete(summary);
                })
                .map_err(UnitError::Runtime)?;
        }
        Placement::Block => {
            let summary = private_runtime()?.block_on(run_suite(definition, run));
            completion.complete(summary);
        }
    }

    Ok(completion)
}
