//! # Test Suite Module / 测试套件模块
//!
//! A test suite is a named collection of test cases plus the `before`,
//! `after`, `before_each` and `after_each` hooks. A test case is a named
//! callback receiving a [`TestContext`]. Callbacks come in two shapes: a plain
//! closure, or a closure returning a future.
//!
//! 测试套件是一组具名测试用例以及 `before`、`after`、`before_each`、`after_each` 钩子。
//! 测试用例是接收 [`TestContext`] 的具名回调。回调有两种形式：普通闭包，或返回 future 的闭包。

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::core::completion::TestCompletion;
use crate::core::config::TestOptions;
use crate::core::context::TestContext;
use crate::core::runner;
use crate::error::UnitError;
use crate::reporting::Reporter;

/// What a callback returns. Returning an [`crate::AssertionError`] counts as
/// a failure, any other error as an error.
pub type StepResult = anyhow::Result<()>;

type BlockingFn = dyn Fn(&TestContext) -> StepResult + Send + Sync;
type FutureFn = dyn Fn(TestContext) -> BoxFuture<'static, StepResult> + Send + Sync;

/// A hook or test body.
#[derive(Clone)]
pub(crate) enum Callback {
    /// Runs to completion when invoked; asynchronous work goes through `Async`.
    Blocking(Arc<BlockingFn>),
    /// Returns a future that is driven on the suite's runtime.
    Future(Arc<FutureFn>),
}

impl Callback {
    fn blocking<F>(f: F) -> Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        Callback::Blocking(Arc::new(f))
    }

    fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        Callback::Future(Arc::new(move |ctx| -> BoxFuture<'static, StepResult> {
            Box::pin(f(ctx))
        }))
    }
}

/// A named unit of work.
/// 具名的工作单元。
#[derive(Clone)]
pub struct TestCase {
    pub(crate) name: String,
    pub(crate) repeat: u32,
    pub(crate) callback: Callback,
}

impl TestCase {
    /// Creates a test case from a description and a callback. The callback is
    /// invoked with a fresh context each time the case runs.
    /// 根据描述和回调创建测试用例。每次运行用例时都会以新的上下文调用回调。
    pub fn create<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            repeat: 1,
            callback: Callback::blocking(callback),
        }
    }

    /// Creates a test case whose body is a future.
    pub fn create_async<F, Fut>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            repeat: 1,
            callback: Callback::future(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a runner executing this case on its own.
    pub fn runner(&self) -> TestCaseRunner {
        TestCaseRunner {
            case: self.clone(),
            options: TestOptions::default(),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

/// Runs a single [`TestCase`] as a suite of one, named after the case.
pub struct TestCaseRunner {
    case: TestCase,
    options: TestOptions,
}

impl TestCaseRunner {
    pub fn with_options(mut self, options: TestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> Result<TestCompletion, UnitError> {
        let mut suite = TestSuite::create(self.case.name.clone());
        suite.cases.push(self.case.clone());
        suite.run_with(self.options.clone())
    }
}

/// The immutable definition a run works from.
pub(crate) struct SuiteDefinition {
    pub(crate) name: String,
    pub(crate) before: Option<Callback>,
    pub(crate) after: Option<Callback>,
    pub(crate) before_each: Option<Callback>,
    pub(crate) after_each: Option<Callback>,
    pub(crate) cases: Vec<TestCase>,
}

/// A named, ordered collection of test cases with lifecycle hooks.
/// 具名、有序的测试用例集合，带有生命周期钩子。
///
/// ```no_run
/// use async_unit::TestSuite;
///
/// let mut suite = TestSuite::create("the_test_suite");
/// suite.test("my_test", |ctx| {
///     ctx.assert_equals(4, 2 + 2)?;
///     Ok(())
/// });
/// suite.run().unwrap();
/// ```
#[derive(Clone)]
pub struct TestSuite {
    name: String,
    before: Option<Callback>,
    after: Option<Callback>,
    before_each: Option<Callback>,
    after_each: Option<Callback>,
    cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
            before_each: None,
            after_each: None,
            cases: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the registered test cases, in execution order.
    pub fn test_names(&self) -> Vec<&str> {
        self.cases.iter().map(|c| c.name.as_str()).collect()
    }

    /// Runs once before any test case. When it fails, no test case runs and
    /// `after` is skipped.
    pub fn before<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        self.before = Some(Callback::blocking(callback));
        self
    }

    pub fn before_async<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.before = Some(Callback::future(callback));
        self
    }

    /// Runs after every test case, unless `before` failed.
    pub fn after<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        self.after = Some(Callback::blocking(callback));
        self
    }

    pub fn after_async<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.after = Some(Callback::future(callback));
        self
    }

    /// Runs before each test case. When it fails the case body and
    /// `after_each` are skipped and the case is reported failed.
    pub fn before_each<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        self.before_each = Some(Callback::blocking(callback));
        self
    }

    pub fn before_each_async<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.before_each = Some(Callback::future(callback));
        self
    }

    /// Runs after each test case body, even a failed one.
    pub fn after_each<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        self.after_each = Some(Callback::blocking(callback));
        self
    }

    pub fn after_each_async<F, Fut>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.after_each = Some(Callback::future(callback));
        self
    }

    /// Registers a test case with a plain closure body.
    ///
    /// The closure runs on a runtime thread and must return promptly: the
    /// step timeout can only fire once it has returned, and a closure
    /// that never returns stalls the run. Start asynchronous work through
    /// [`TestContext::new_async`], or use [`TestSuite::test_async`] for
    /// long-running bodies.
    /// 使用普通闭包注册测试用例。闭包必须尽快返回；长时间运行的测试体请使用
    /// [`TestSuite::test_async`]。
    pub fn test<F>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        self.cases.push(TestCase::create(name, callback));
        self
    }

    pub fn test_async<F, Fut>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StepResult> + Send + 'static,
    {
        self.cases.push(TestCase::create_async(name, callback));
        self
    }

    /// Registers a case executed `repeat` times, each run reported on its own.
    /// A `repeat` of zero registers nothing.
    pub fn test_repeated<F>(&mut self, name: impl Into<String>, repeat: u32, callback: F) -> &mut Self
    where
        F: Fn(&TestContext) -> StepResult + Send + Sync + 'static,
    {
        if repeat == 0 {
            return self;
        }
        let mut case = TestCase::create(name, callback);
        case.repeat = repeat;
        self.cases.push(case);
        self
    }

    /// Adds an already built test case.
    pub fn add_case(&mut self, case: TestCase) -> &mut Self {
        self.cases.push(case);
        self
    }

    /// Runs the suite with default options.
    pub fn run(&self) -> Result<TestCompletion, UnitError> {
        self.run_with(TestOptions::default())
    }

    pub fn run_with(&self, options: TestOptions) -> Result<TestCompletion, UnitError> {
        self.run_with_reporters(options, Vec::new())
    }

    /// Runs the suite, notifying `extra` reporters in addition to the ones
    /// configured in `options`.
    pub fn run_with_reporters(
        &self,
        options: TestOptions,
        extra: Vec<Box<dyn Reporter>>,
    ) -> Result<TestCompletion, UnitError> {
        runner::launch(self.definition(), options, extra, None)
    }

    /// Runs the suite on the given runtime.
    pub fn run_on(&self, handle: &Handle, options: TestOptions) -> Result<TestCompletion, UnitError> {
        runner::launch(self.definition(), options, Vec::new(), Some(handle.clone()))
    }

    fn definition(&self) -> Arc<SuiteDefinition> {
        Arc::new(SuiteDefinition {
            name: self.name.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            before_each: self.before_each.clone(),
            after_each: self.after_each.clone(),
            cases: self.cases.clone(),
        })
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .finish_non_exhaustive()
    }
}
