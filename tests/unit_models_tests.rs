//! # Models Module Unit Tests / Models 模块单元测试
//!
//! Tests for failures, test results and suite summaries, in particular the
//! split between failures and errors.
//!
//! 失败、测试结果与套件摘要的测试，重点是失败与错误的划分。

use async_unit::models::{Failure, FailureKind, SuiteSummary, TestResult};
use async_unit::AssertionError;
use chrono::Utc;
use std::time::Duration;

fn result(name: &str, failure: Option<Failure>) -> TestResult {
    TestResult {
        name: name.to_string(),
        begin_time: Utc::now(),
        duration: Duration::from_millis(12),
        failure,
    }
}

fn summary(results: Vec<TestResult>, suite_errors: Vec<Failure>) -> SuiteSummary {
    SuiteSummary {
        name: "suite".to_string(),
        results,
        suite_errors,
        duration: Duration::from_millis(40),
        cancelled: false,
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_from_error_classifies_assertions() {
        let err = anyhow::Error::new(AssertionError::new("expected <1> but was <2>"));
        let failure = Failure::from_error(&err);
        assert_eq!(failure.kind, FailureKind::Assertion);
        assert_eq!(failure.message, "expected <1> but was <2>");
        assert!(!failure.is_error());
    }

    #[test]
    fn test_from_error_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("while connecting");
        let failure = Failure::from_error(&err);
        assert_eq!(failure.kind, FailureKind::Error);
        assert_eq!(failure.message, "while connecting: connection refused");
        assert!(failure.is_error());
    }

    #[test]
    fn test_from_panic_payloads() {
        let static_str: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(Failure::from_panic(&*static_str).message, "panicked: boom");

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(Failure::from_panic(&*owned).message, "panicked: bang");

        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(Failure::from_panic(&*other).kind, FailureKind::Error);
    }

    #[test]
    fn test_timeout_and_cancel_are_errors() {
        let timeout = Failure::timeout(Duration::from_millis(250));
        assert_eq!(timeout.message, "Timed out after 250 ms");
        assert!(timeout.is_error());
        assert!(Failure::cancelled().is_error());
    }
}

#[cfg(test)]
mod result_tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(result("a", None).get_status_class(), "status-Passed");
        assert_eq!(
            result("b", Some(Failure::assertion("x"))).get_status_class(),
            "status-Failed"
        );
        assert_eq!(
            result("c", Some(Failure::timeout(Duration::from_secs(1)))).get_status_class(),
            "status-Timeout"
        );
        assert_eq!(result("d", Some(Failure::cancelled())).get_status_class(), "status-Error");
    }

    #[test]
    fn test_result_predicates() {
        let passed = result("a", None);
        assert!(passed.succeeded());
        assert!(!passed.failed());
        assert!(!passed.is_error());

        let timed_out = result("b", Some(Failure::timeout(Duration::from_secs(1))));
        assert!(timed_out.failed());
        assert!(timed_out.is_timeout());
        assert!(timed_out.is_error());
        assert!(!timed_out.is_assertion_failure());
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;

    #[test]
    fn test_counts() {
        let summary = summary(
            vec![
                result("ok", None),
                result("assert", Some(Failure::assertion("nope"))),
                result("error", Some(Failure::error("io"))),
                result("slow", Some(Failure::timeout(Duration::from_secs(1)))),
            ],
            vec![Failure::error("after failed")],
        );

        assert_eq!(summary.run(), 4);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failures(), 1);
        assert_eq!(summary.errors(), 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_empty_suite_succeeds() {
        let summary = summary(Vec::new(), Vec::new());
        assert_eq!(summary.run(), 0);
        assert!(summary.is_success());
    }

    #[test]
    fn test_summary_serializes_durations_as_millis() {
        let summary = summary(vec![result("ok", None)], Vec::new());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["duration"], 40);
        assert_eq!(json["results"][0]["duration"], 12);

        let back: SuiteSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
