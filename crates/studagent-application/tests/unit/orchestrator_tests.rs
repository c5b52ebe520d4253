//! Fallback loop tests

use std::time::Duration;

use studagent_application::ports::services::GenerationService;
use studagent_application::resilience::BreakerConfig;
use studagent_application::services::{LlmOrchestrator, RoutedProvider};
use studagent_domain::{
    Capability, CircuitState, Error, GenerationConstraints, ProviderDescriptor, ProviderErrorKind,
};

use crate::support::{Reply, ScriptedProvider, routed};

fn breaker() -> BreakerConfig {
    BreakerConfig {
        failure_threshold: 1,
        ..BreakerConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_falls_back_past_open_and_failing_providers() {
    let a = ScriptedProvider::failing("a");
    let b = ScriptedProvider::failing("b");
    let c = ScriptedProvider::ok("c", "hello");
    let orchestrator = LlmOrchestrator::new(
        vec![
            routed("c", 3, c.clone()),
            routed("a", 1, a.clone()),
            routed("b", 2, b.clone()),
        ],
        breaker(),
    )
    .unwrap();

    // Trip A before the call under test
    orchestrator
        .breakers()
        .get("a")
        .try_acquire()
        .unwrap()
        .record_failure();

    let output = orchestrator
        .execute(Capability::Summarize, "p", &GenerationConstraints::new())
        .await
        .unwrap();

    assert_eq!(output.provider, "c");
    assert_eq!(output.text, "hello");
    assert_eq!(a.calls(), 0);
    assert_eq!(b.calls(), 1);
    assert_eq!(c.calls(), 1);
    assert_eq!(orchestrator.breakers().get("b").snapshot().total_failures, 1);
    assert_eq!(orchestrator.breakers().get("c").snapshot().total_successes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_reports_every_provider() {
    let a = ScriptedProvider::failing("a");
    let b = ScriptedProvider::new("b", Reply::Fail(ProviderErrorKind::RateLimited));
    let orchestrator = LlmOrchestrator::new(
        vec![routed("a", 1, a.clone()), routed("b", 2, b.clone())],
        BreakerConfig::default(),
    )
    .unwrap();

    let err = orchestrator
        .execute(Capability::GenerateQuiz, "p", &GenerationConstraints::new())
        .await
        .unwrap_err();

    match err {
        Error::AllProvidersExhausted {
            capability,
            attempted,
            skipped,
        } => {
            assert_eq!(capability, Capability::GenerateQuiz);
            assert_eq!(attempted, vec!["a", "b"]);
            assert!(skipped.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_capable_provider_is_exhaustion() {
    let a = ScriptedProvider::ok("a", "x");
    let descriptor =
        ProviderDescriptor::new("a", "scripted", "m", 1).with_capabilities([Capability::Summarize]);
    let orchestrator =
        LlmOrchestrator::new(vec![RoutedProvider::new(descriptor, a.clone())], breaker()).unwrap();

    let err = orchestrator
        .execute(Capability::ExplainMatch, "p", &GenerationConstraints::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AllProvidersExhausted { .. }));
    assert_eq!(a.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_preferred_providers_restrict_and_reorder() {
    let a = ScriptedProvider::ok("a", "from a");
    let b = ScriptedProvider::ok("b", "from b");
    let orchestrator = LlmOrchestrator::new(
        vec![routed("a", 1, a.clone()), routed("b", 2, b.clone())],
        breaker(),
    )
    .unwrap();

    let constraints = GenerationConstraints::new().with_preferred_providers(["b", "unknown"]);
    let output = orchestrator
        .execute(Capability::Summarize, "p", &constraints)
        .await
        .unwrap();
    assert_eq!(output.provider, "b");
    assert_eq!(a.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failure() {
    let slow = ScriptedProvider::new("slow", Reply::Hang);
    let fast = ScriptedProvider::ok("fast", "ok");
    let descriptor = ProviderDescriptor::new("slow", "scripted", "m", 1).with_timeout_ms(50);
    let orchestrator = LlmOrchestrator::new(
        vec![
            RoutedProvider::new(descriptor, slow.clone()),
            routed("fast", 2, fast.clone()),
        ],
        breaker(),
    )
    .unwrap();

    let output = orchestrator
        .execute(Capability::Summarize, "p", &GenerationConstraints::new())
        .await
        .unwrap();
    assert_eq!(output.provider, "fast");
    assert_eq!(
        orchestrator.breakers().get("slow").state(),
        CircuitState::Open
    );
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_rate_budget_skips_without_breaker_failure() {
    let a = ScriptedProvider::ok("a", "from a");
    let b = ScriptedProvider::ok("b", "from b");
    let limited = ProviderDescriptor::new("a", "scripted", "m", 1).with_rate_limit(1);
    let orchestrator = LlmOrchestrator::new(
        vec![
            RoutedProvider::new(limited, a.clone()),
            routed("b", 2, b.clone()),
        ],
        breaker(),
    )
    .unwrap();
    let constraints = GenerationConstraints::new();

    let first = orchestrator
        .execute(Capability::Summarize, "p", &constraints)
        .await
        .unwrap();
    let second = orchestrator
        .execute(Capability::Summarize, "p", &constraints)
        .await
        .unwrap();
    assert_eq!(first.provider, "a");
    assert_eq!(second.provider, "b");
    assert_eq!(orchestrator.breakers().get("a").snapshot().total_failures, 0);

    tokio::time::advance(Duration::from_secs(60)).await;
    let third = orchestrator
        .execute(Capability::Summarize, "p", &constraints)
        .await
        .unwrap();
    assert_eq!(third.provider, "a");
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_cooldown() {
    let a = ScriptedProvider::failing("a").then(Reply::Fail(ProviderErrorKind::Timeout));
    let orchestrator =
        LlmOrchestrator::new(vec![routed("a", 1, a.clone())], breaker()).unwrap();
    let constraints = GenerationConstraints::new();

    assert!(orchestrator.execute(Capability::Summarize, "p", &constraints).await.is_err());
    assert!(orchestrator.execute(Capability::Summarize, "p", &constraints).await.is_err());
    assert_eq!(a.calls(), 1, "open circuit must not call the provider");

    tokio::time::advance(BreakerConfig::default().base_cooldown).await;
    assert!(orchestrator.execute(Capability::Summarize, "p", &constraints).await.is_err());
    assert_eq!(a.calls(), 2);
    assert_eq!(
        orchestrator.breakers().get("a").snapshot().current_cooldown_ms,
        u64::try_from(BreakerConfig::default().base_cooldown.as_millis() * 2).unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_caller_skips_half_open_provider_with_trial_in_flight() {
    let a = ScriptedProvider::new("a", Reply::Hang);
    let b = ScriptedProvider::ok("b", "from b");
    let orchestrator = LlmOrchestrator::new(
        vec![routed("a", 1, a.clone()), routed("b", 2, b.clone())],
        breaker(),
    )
    .unwrap();
    orchestrator
        .breakers()
        .get("a")
        .try_acquire()
        .unwrap()
        .record_failure();
    tokio::time::advance(BreakerConfig::default().base_cooldown).await;
    assert_eq!(orchestrator.breakers().get("a").state(), CircuitState::HalfOpen);

    let constraints = GenerationConstraints::new();
    let (trial, concurrent) = tokio::join!(
        orchestrator.execute(Capability::Summarize, "p", &constraints),
        orchestrator.execute(Capability::Summarize, "p", &constraints),
    );

    // The second caller finds the trial in flight and goes straight to B
    assert_eq!(concurrent.unwrap().provider, "b");
    // The trial times out and falls back too
    assert_eq!(trial.unwrap().provider, "b");
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 2);
    let snapshot = orchestrator.breakers().get("a").snapshot();
    assert_eq!(snapshot.total_rejections, 1);
    assert_eq!(snapshot.state, CircuitState::Open);
}

#[test]
fn test_duplicate_names_are_rejected() {
    let err = LlmOrchestrator::new(
        vec![
            routed("a", 1, ScriptedProvider::ok("a", "x")),
            routed("a", 2, ScriptedProvider::ok("a", "y")),
        ],
        breaker(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Duplicate provider name"));
}

#[test]
fn test_candidates_follow_priority_then_name() {
    let orchestrator = LlmOrchestrator::new(
        vec![
            routed("zeta", 1, ScriptedProvider::ok("zeta", "x")),
            routed("alpha", 1, ScriptedProvider::ok("alpha", "x")),
            routed("first", 0, ScriptedProvider::ok("first", "x")),
        ],
        breaker(),
    )
    .unwrap();
    let names: Vec<_> = orchestrator
        .candidates(Capability::Summarize, &[])
        .into_iter()
        .map(|p| p.descriptor.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "alpha", "zeta"]);
}
