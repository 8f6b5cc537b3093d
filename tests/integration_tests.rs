//! End-to-end tests over the public API.

use conveyor::{compose, ErrorCode, Pipeline, PipelineBuilder, StageSpec, StageTimingObserver};

#[test]
fn test_two_stage_composition() {
    let pipeline = compose![|x: i64| x + 1, |x: i64| x * 2].unwrap();
    assert_eq!(pipeline.invoke([3]).unwrap(), Some(8));
}

#[test]
fn test_mixed_arity_fan_in() {
    // Stage 1 folds three seeds into one, stage 2 finishes.
    let pipeline = compose![
        (|args: Vec<i64>| args.iter().sum::<i64>(), 3usize),
        |total: i64| total * 10,
    ]
    .unwrap();
    assert_eq!(pipeline.invoke([1, 2, 3]).unwrap(), Some(60));
}

#[test]
fn test_queue_ordering_front_to_back() {
    // Seed [a, b, c]; arity-2 stage takes [a, b], its result queues behind
    // c, so the next arity-2 stage sees [c, r1].
    let pipeline = compose![
        |a: String, b: String| format!("({a}{b})"),
        |c: String, r1: String| format!("[{c}{r1}]"),
    ]
    .unwrap();
    let out = pipeline
        .invoke(["a".into(), "b".into(), "c".into()])
        .unwrap();
    assert_eq!(out, Some("[c(ab)]".to_string()));
}

#[test]
fn test_producer_stage_feeds_later_consumer() {
    let pipeline = compose![|| 100i64, |seed: i64, produced: i64| seed + produced].unwrap();
    assert_eq!(pipeline.invoke([7]).unwrap(), Some(107));
}

#[test]
fn test_bound_receiver_shared_downstream() {
    let pipeline = compose![
        (|this: Option<&i64>, x: i64| this.copied().unwrap() + x, 1000i64),
        |this: Option<&i64>, x: i64| this.copied().unwrap() - x,
    ]
    .unwrap();
    // 1000 + 1 = 1001, then 1000 - 1001 = -1.
    assert_eq!(pipeline.invoke([1]).unwrap(), Some(-1));
}

#[test]
fn test_insufficient_values_reports_position() {
    let pipeline = compose![|x: i64| x, |a: i64, b: i64| a + b].unwrap();
    let err = pipeline.invoke([1]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientValues);
    assert_eq!(err.stage, 2);
    assert_eq!(err.total, 2);
    assert_eq!(
        err.to_string(),
        "[insufficient_values] stage 2 of 2: needs 2 value(s), but only 1 remain in the queue"
    );
}

#[test]
fn test_surplus_values_rejected() {
    let pipeline = compose![|x: i64| x].unwrap();
    let err = pipeline.invoke([1, 2]).unwrap_err();
    assert!(err.is_surplus());
    assert_eq!(err.code, ErrorCode::SurplusValues);
}

#[test]
fn test_empty_pipeline_is_identity_on_one() {
    let pipeline: Pipeline<&str> = compose![].unwrap();
    assert_eq!(pipeline.invoke([]).unwrap(), None);
    assert_eq!(pipeline.invoke(["only"]).unwrap(), Some("only"));
    assert!(pipeline.invoke(["a", "b"]).unwrap_err().is_surplus());
}

#[test]
fn test_invalid_explicit_arity_fails_at_build() {
    let err = compose![(|args: Vec<i64>| args[0], 0usize)].unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidArity);
    assert_eq!(err.path, "/stages/0/arity");
    assert!(err.hint.is_some());
}

#[test]
fn test_spec_record_with_overrides() {
    let pipeline = compose![
        StageSpec::taking(2, |args: Vec<i64>| args[0] * args[1]).context(3i64),
        |this: Option<&i64>, x: i64| this.copied().unwrap() + x,
    ]
    .unwrap();
    // 4 * 5 = 20, then 3 + 20 = 23.
    assert_eq!(pipeline.invoke([4, 5]).unwrap(), Some(23));
}

#[test]
fn test_check_projects_invocation_outcome() {
    let pipeline = compose![|a: i64, b: i64| a + b, |c: i64| c].unwrap();

    assert!(pipeline.check(2).is_valid());
    assert!(pipeline.check(0).has_errors());

    let report = pipeline.check(0);
    let json = report.to_json_string().unwrap();
    assert!(json.contains("insufficient_values"));
}

#[test]
fn test_observed_invocation_reports_per_stage() {
    let pipeline = compose![|x: i64| x + 1, |x: i64| x + 1, |x: i64| x + 1].unwrap();
    let mut observer = StageTimingObserver::new();
    let out = pipeline.invoke_observed([0], &mut observer).unwrap();
    assert_eq!(out, Some(3));
    assert_eq!(observer.reports().len(), 3);
    for (position, report) in observer.reports() {
        assert!(*position >= 1 && *position <= 3);
        assert_eq!(report.consumed(), 1);
    }
}

#[test]
fn test_builder_and_macro_agree() {
    let built = PipelineBuilder::new()
        .stage(|x: i64| x * 2)
        .stage(|x: i64| x + 1)
        .build()
        .unwrap();
    let composed = compose![|x: i64| x * 2, |x: i64| x + 1].unwrap();
    assert_eq!(built.invoke([10]).unwrap(), composed.invoke([10]).unwrap());
}

#[test]
fn test_pipeline_shared_across_threads() {
    let pipeline = std::sync::Arc::new(compose![|x: u64| x * x].unwrap());
    let handles: Vec<_> = (1..=8u64)
        .map(|n| {
            let p = pipeline.clone();
            std::thread::spawn(move || p.invoke([n]).unwrap().unwrap())
        })
        .collect();
    let mut results: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    results.sort_unstable();
    assert_eq!(results, vec![1, 4, 9, 16, 25, 36, 49, 64]);
}

#[test]
fn test_nested_pipelines() {
    let inner = compose![|x: i64| x + 1].unwrap();
    let pipeline = compose![move |x: i64| inner.invoke([x]).unwrap().unwrap(), |x: i64| x * 2]
        .unwrap();
    assert_eq!(pipeline.invoke([4]).unwrap(), Some(10));
}
