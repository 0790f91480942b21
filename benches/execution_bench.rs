use async_unit::{ReportFormat, ReportOptions, TestOptions, TestSuite};
use criterion::{criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;

fn trivial_suite(cases: usize) -> TestSuite {
    let mut suite = TestSuite::create("bench_suite");
    suite.before_each(|ctx| {
        ctx.put("n", 1);
        Ok(())
    });
    for i in 0..cases {
        suite.test(format!("case_{i}"), |ctx| {
            let done = ctx.new_async();
            done.complete();
            ctx.assert_equals(Some(1), ctx.get::<i32>("n"))?;
            Ok(())
        });
    }
    suite
}

fn bench_run_suite(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let suite = trivial_suite(100);
    let options = TestOptions::default().with_reporter(ReportOptions::new("log", ReportFormat::Simple));

    c.bench_function("run_suite_100_cases", |b| {
        b.to_async(&rt).iter(|| async {
            let completion = suite.run_with(options.clone()).unwrap();
            completion.wait().await;
        });
    });

    c.bench_function("run_suite_blocking_100_cases", |b| {
        b.iter(|| {
            let completion = suite.run_with(options.clone()).unwrap();
            completion.blocking_wait();
        });
    });
}

criterion_group!(benches, bench_run_suite);
criterion_main!(benches);
