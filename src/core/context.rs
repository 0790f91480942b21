//! # Test Context Module / 测试上下文模块
//!
//! The context handed to every hook and test callback. It is the assertion
//! surface, the factory for [`Async`] completion tokens and the holder of the
//! data shared between `before` and the test cases.
//!
//! 传递给每个钩子和测试回调的上下文。它提供断言接口、[`Async`] 完成令牌的工厂，
//! 并保存 `before` 与测试用例之间共享的数据。

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, Notify};

use crate::core::models::Failure;
use crate::error::AssertionError;

/// Data map shared by the steps of a run.
pub(crate) type SharedData = Arc<Mutex<Map<String, Value>>>;

pub(crate) fn new_shared_data(initial: Map<String, Value>) -> SharedData {
    Arc::new(Mutex::new(initial))
}

pub(crate) fn lock_data(data: &SharedData) -> MutexGuard<'_, Map<String, Value>> {
    data.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracks one step: the outstanding `Async` tokens and the first failure.
/// 跟踪一个步骤：未完成的 `Async` 令牌以及第一个失败。
pub(crate) struct StepState {
    pending: AtomicUsize,
    failure: Mutex<Option<Failure>>,
    finished: AtomicBool,
    notify: Notify,
}

impl StepState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicUsize::new(0),
            failure: Mutex::new(None),
            finished: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    fn register_async(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn async_done(&self) {
        if self.finished.load(Ordering::SeqCst) {
            return;
        }
        self.pending.fetch_sub(1, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Records `failure` unless the step already failed or finished.
    /// Returns whether it was recorded.
    pub(crate) fn fail(&self, failure: Failure) -> bool {
        if self.finished.load(Ordering::SeqCst) {
            return false;
        }
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(failure);
        drop(slot);
        self.notify.notify_one();
        true
    }

    pub(crate) fn has_failed(&self) -> bool {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn settled(&self) -> bool {
        self.has_failed() || self.pending.load(Ordering::SeqCst) == 0
    }

    /// Resolves once every async is completed or a failure was recorded.
    pub(crate) async fn wait_settled(&self) {
        loop {
            if self.settled() {
                return;
            }
            // notify_one stores a permit, so a wake-up between the check and
            // the await is not lost.
            self.notify.notified().await;
        }
    }

    /// Resolves once a failure was recorded.
    pub(crate) async fn wait_failed(&self) {
        while !self.has_failed() {
            self.notify.notified().await;
        }
    }

    /// Freezes the step and returns its outcome.
    pub(crate) fn finish(&self) -> Option<Failure> {
        self.finished.store(true, Ordering::SeqCst);
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A completion token. The step that created it does not finish until the
/// token is completed, a failure is recorded, or the step times out.
///
/// 完成令牌。创建它的步骤在令牌完成、记录到失败或步骤超时之前不会结束。
///
/// Tokens are cheap to clone; clones share the same count.
#[derive(Clone)]
pub struct Async {
    inner: Arc<AsyncInner>,
}

struct AsyncInner {
    remaining: AtomicUsize,
    strict: bool,
    step: Arc<StepState>,
    done: watch::Sender<bool>,
}

impl Async {
    pub(crate) fn new(step: Arc<StepState>, count: usize, strict: bool) -> Self {
        if count > 0 {
            step.register_async();
        }
        let (done, _) = watch::channel(count == 0);
        Self {
            inner: Arc::new(AsyncInner {
                remaining: AtomicUsize::new(count),
                strict,
                step,
                done,
            }),
        }
    }

    /// Remaining count-downs before completion.
    pub fn count(&self) -> usize {
        self.inner.remaining.load(Ordering::SeqCst)
    }

    /// Decrements the count; the token completes when it reaches zero.
    pub fn count_down(&self) {
        let prev = self
            .inner
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        match prev {
            Ok(1) => self.on_completed(),
            Ok(_) => {}
            Err(_) => self.overrun(),
        }
    }

    /// Completes the token regardless of its remaining count.
    pub fn complete(&self) {
        if self.inner.remaining.swap(0, Ordering::SeqCst) > 0 {
            self.on_completed();
        } else {
            self.overrun();
        }
    }

    pub fn is_completed(&self) -> bool {
        self.count() == 0
    }

    /// Whether the step owning this token has failed.
    pub fn is_failed(&self) -> bool {
        self.inner.step.has_failed()
    }

    /// Resolves once the token is completed.
    pub async fn wait(&self) {
        let mut rx = self.inner.done.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|done| *done).await;
    }

    fn on_completed(&self) {
        self.inner.done.send_replace(true);
        self.inner.step.async_done();
    }

    fn overrun(&self) {
        if self.inner.strict {
            self.inner
                .step
                .fail(Failure::error("Async completed more times than its count"));
        }
    }
}

impl Debug for Async {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Async")
            .field("remaining", &self.count())
            .field("strict", &self.inner.strict)
            .finish_non_exhaustive()
    }
}

/// The test context passed to hooks and test cases.
/// 传递给钩子和测试用例的测试上下文。
#[derive(Clone)]
pub struct TestContext {
    step: Arc<StepState>,
    data: SharedData,
}

impl TestContext {
    pub(crate) fn new(step: Arc<StepState>, data: SharedData) -> Self {
        Self { step, data }
    }

    /// Creates a token that must be completed once.
    /// 创建一个需要完成一次的令牌。
    pub fn new_async(&self) -> Async {
        self.new_async_count(1)
    }

    /// Creates a token that completes after `count` calls to
    /// [`Async::count_down`]. A count of zero is already completed.
    pub fn new_async_count(&self, count: usize) -> Async {
        Async::new(Arc::clone(&self.step), count, false)
    }

    /// Like [`TestContext::new_async_count`], but counting down or completing
    /// an already completed token fails the step.
    pub fn new_strict_async(&self, count: usize) -> Async {
        Async::new(Arc::clone(&self.step), count, true)
    }

    fn check(
        &self,
        ok: bool,
        message: Option<String>,
        detail: impl FnOnce() -> String,
    ) -> Result<(), AssertionError> {
        if ok {
            return Ok(());
        }
        let text = match message {
            Some(m) => format!("{m}: {}", detail()),
            None => detail(),
        };
        Err(self.record(text))
    }

    fn record(&self, text: String) -> AssertionError {
        self.step.fail(Failure::assertion(text.clone()));
        AssertionError::new(text)
    }

    pub fn assert_equals<E, A>(&self, expected: E, actual: A) -> Result<(), AssertionError>
    where
        E: PartialEq<A> + Debug,
        A: Debug,
    {
        self.check(expected == actual, None, || {
            format!("expected <{expected:?}> but was <{actual:?}>")
        })
    }

    pub fn assert_equals_msg<E, A>(
        &self,
        expected: E,
        actual: A,
        message: impl Into<String>,
    ) -> Result<(), AssertionError>
    where
        E: PartialEq<A> + Debug,
        A: Debug,
    {
        self.check(expected == actual, Some(message.into()), || {
            format!("expected <{expected:?}> but was <{actual:?}>")
        })
    }

    pub fn assert_not_equals<E, A>(&self, first: E, second: A) -> Result<(), AssertionError>
    where
        E: PartialEq<A> + Debug,
        A: Debug,
    {
        self.check(first != second, None, || {
            format!("expected values to differ but both were <{second:?}>")
        })
    }

    pub fn assert_not_equals_msg<E, A>(
        &self,
        first: E,
        second: A,
        message: impl Into<String>,
    ) -> Result<(), AssertionError>
    where
        E: PartialEq<A> + Debug,
        A: Debug,
    {
        self.check(first != second, Some(message.into()), || {
            format!("expected values to differ but both were <{second:?}>")
        })
    }

    pub fn assert_true(&self, condition: bool) -> Result<(), AssertionError> {
        self.check(condition, None, || "expected true".to_string())
    }

    pub fn assert_true_msg(
        &self,
        condition: bool,
        message: impl Into<String>,
    ) -> Result<(), AssertionError> {
        self.check(condition, Some(message.into()), || "expected true".to_string())
    }

    pub fn assert_false(&self, condition: bool) -> Result<(), AssertionError> {
        self.check(!condition, None, || "expected false".to_string())
    }

    pub fn assert_false_msg(
        &self,
        condition: bool,
        message: impl Into<String>,
    ) -> Result<(), AssertionError> {
        self.check(!condition, Some(message.into()), || {
            "expected false".to_string()
        })
    }

    /// Asserts `actual` is within `delta` of `expected`. NaN never matches.
    pub fn assert_in_range(
        &self,
        expected: f64,
        actual: f64,
        delta: f64,
    ) -> Result<(), AssertionError> {
        self.assert_in_range_opt(expected, actual, delta, None)
    }

    pub fn assert_in_range_msg(
        &self,
        expected: f64,
        actual: f64,
        delta: f64,
        message: impl Into<String>,
    ) -> Result<(), AssertionError> {
        self.assert_in_range_opt(expected, actual, delta, Some(message.into()))
    }

    fn assert_in_range_opt(
        &self,
        expected: f64,
        actual: f64,
        delta: f64,
        message: Option<String>,
    ) -> Result<(), AssertionError> {
        let ok = (expected - actual).abs() <= delta;
        self.check(ok, message, || {
            format!("expected <{actual}> to be within <{delta}> of <{expected}>")
        })
    }

    /// Fails the step unconditionally.
    pub fn fail(&self, message: impl Into<String>) -> Result<(), AssertionError> {
        let message = message.into();
        self.check(false, None, move || message)
    }

    /// Unwraps an `Ok`, failing the step on `Err`.
    pub fn assert_success<T, E: Display>(&self, result: Result<T, E>) -> Result<T, AssertionError> {
        result.map_err(|e| self.record(format!("unexpected failure: {e}")))
    }

    /// Unwraps an `Err`, failing the step on `Ok`.
    pub fn assert_failure<T: Debug, E>(&self, result: Result<T, E>) -> Result<E, AssertionError> {
        match result {
            Err(e) => Ok(e),
            Ok(value) => Err(self.record(format!("expected a failure but got <{value:?}>"))),
        }
    }

    /// Stores a value in the shared data map, returning the previous one.
    /// 在共享数据映射中存储一个值，并返回之前的值。
    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        lock_data(&self.data).insert(key.into(), value.into())
    }

    /// Reads a value, converting it to `T`. Missing keys and values of
    /// another shape yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = lock_data(&self.data).get(key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        lock_data(&self.data).get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        lock_data(&self.data).remove(key)
    }
}

impl Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("failed", &self.step.has_failed())
            .finish_non_exhaustive()
    }
}
