//! End-to-end grading scenarios.
//!
//! Each test starts from a drawing program and ends at a verdict, through
//! the same pipeline the grader runs: record → text → extract → replay →
//! snapshot → diff.

use std::f64::consts::FRAC_PI_2;

use lock_tests::fixtures::{lock_policy, square, star};
use turtle_harness::config::{GradingConfig, GradingPolicy};
use turtle_harness::runner::{grade, grade_output, render_reference, GradeError, SubmissionOutcome};
use turtle_kernel::carrier::command_log::{Operation, PenState};
use turtle_kernel::carrier::log_writer::log_to_text;
use turtle_kernel::geometry::vector::Vec2;
use turtle_kernel::raster::diff::{compare, DiffThresholds, Outcome};
use turtle_kernel::raster::sample::RasterSample;
use turtle_kernel::turtle::{TurtleError, VirtualTurtle};

// ---------------------------------------------------------------------------
// Turtle scenarios
// ---------------------------------------------------------------------------

#[test]
fn forward_turn_forward_records_pre_operation_snapshots() {
    let mut t = VirtualTurtle::new();
    t.forward(100.0).unwrap();
    t.turn(90.0).unwrap();
    t.forward(100.0).unwrap();

    let log = t.log();
    assert_eq!(log.len(), 3);
    let last = log.last().unwrap();
    assert_eq!(last.operation, Operation::Forward { distance: 100.0 });
    let before = last.snapshot;
    assert!(before.position.distance(Vec2::new(100.0, 0.0)) < 1e-9);
    assert!((before.heading + FRAC_PI_2).abs() < 1e-12);
    assert_eq!(before.pen, PenState::Down);

    assert!(t.position().distance(Vec2::new(100.0, -100.0)) < 1e-9);
}

#[test]
fn clone_is_isolated_from_original() {
    let mut original = VirtualTurtle::new();
    original.fd(10.0).unwrap();
    let snapshot_before = original.log().clone();

    let mut copy = original.clone();
    copy.rt(45.0).unwrap();
    copy.fd(5.0).unwrap();
    copy.pu();

    assert_eq!(original.log(), &snapshot_before);
    assert_eq!(copy.log().len(), 4);
    assert!(original.is_down());
}

#[test]
fn undo_restores_previous_state() {
    let mut t = VirtualTurtle::new();
    t.fd(30.0).unwrap();
    let before = t.snapshot();
    t.rt(60.0).unwrap();
    t.fd(30.0).unwrap();

    t.undo();
    t.undo();
    assert_eq!(t.snapshot(), before);
    assert_eq!(t.log().len(), 1);
}

#[test]
fn non_finite_input_is_rejected_without_logging() {
    let mut t = VirtualTurtle::new();
    t.fd(1.0).unwrap();
    let err = t.fd(f64::NAN).unwrap_err();
    assert!(matches!(err, TurtleError::NonFiniteInput { .. }));
    assert_eq!(t.log().len(), 1);
}

// ---------------------------------------------------------------------------
// Differ scenarios
// ---------------------------------------------------------------------------

fn strong_differences(n: usize) -> (RasterSample, RasterSample) {
    let reference = RasterSample::blank(100, 100).unwrap();
    let candidate =
        RasterSample::from_fn(100, 100, |x, y| if y * 100 + x < n { 200 } else { 0 }).unwrap();
    (candidate, reference)
}

#[test]
fn thirty_differences_match_sixty_do_not() {
    let thresholds = DiffThresholds::default();
    let (c, r) = strong_differences(30);
    let v = compare(&c, &r, &thresholds).unwrap();
    assert_eq!((v.outcome, v.mismatch_count), (Outcome::Match, 30));

    let (c, r) = strong_differences(60);
    let v = compare(&c, &r, &thresholds).unwrap();
    assert_eq!((v.outcome, v.mismatch_count), (Outcome::Mismatch, 60));
}

#[test]
fn mismatched_dimensions_produce_no_verdict() {
    let a = RasterSample::blank(100, 100).unwrap();
    let b = RasterSample::blank(100, 50).unwrap();
    assert!(compare(&a, &b, &DiffThresholds::default()).is_err());
}

// ---------------------------------------------------------------------------
// Pipeline scenarios
// ---------------------------------------------------------------------------

#[test]
fn same_program_different_vocabulary_matches() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();

    let mut t = VirtualTurtle::new();
    for _ in 0..4 {
        t.forward(25.0).unwrap();
        t.forward(25.0).unwrap();
        t.left(-90.0).unwrap();
    }
    let output = format!("drawing...\n{}", log_to_text(t.log()).unwrap());
    let report = grade_output(&output, &reference, &policy).unwrap();
    assert_eq!(report.outcome(), Outcome::Match);
}

#[test]
fn output_without_trailing_newline_still_grades() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();
    let output = format!("Done{}", log_to_text(&square(50.0)).unwrap());
    let report = grade_output(&output, &reference, &policy).unwrap();
    assert_eq!(report.outcome(), Outcome::Match);
    assert_eq!(report.verdict.mismatch_count, 0);
}

#[test]
fn small_offset_within_tolerance_matches_large_offset_does_not() {
    let policy = lock_policy();
    let reference = render_reference(&square(50.0), &policy).unwrap();

    // Same square nudged a fraction of a pixel: only antialiasing changes.
    let mut nudged = VirtualTurtle::new();
    nudged.pu();
    nudged.goto(0.1, 0.0).unwrap();
    nudged.pd();
    for _ in 0..4 {
        nudged.fd(50.0).unwrap();
        nudged.rt(90.0).unwrap();
    }
    let near = grade(
        &SubmissionOutcome::Completed(nudged.into_log()),
        &reference,
        &policy,
    )
    .unwrap();
    assert!(
        near.is_match(),
        "mismatch_count={}",
        near.verdict.mismatch_count
    );

    let far = grade(
        &SubmissionOutcome::Completed(star(100.0)),
        &reference,
        &policy,
    )
    .unwrap();
    assert_eq!(far.outcome(), Outcome::Mismatch);
}

#[test]
fn configured_tolerance_changes_the_verdict() {
    let base = lock_policy();
    let reference = render_reference(&square(50.0), &base).unwrap();
    let candidate = square(48.0);

    let strict = grade(
        &SubmissionOutcome::Completed(candidate.clone()),
        &reference,
        &base,
    )
    .unwrap();
    assert_eq!(strict.outcome(), Outcome::Mismatch);

    let lenient_config = GradingConfig {
        tolerance: Some(strict.verdict.mismatch_count),
        canvas_width: Some(base.canvas_width),
        canvas_height: Some(base.canvas_height),
        ..GradingConfig::default()
    };
    let lenient: GradingPolicy = lenient_config.resolve().unwrap();
    let report = grade(
        &SubmissionOutcome::Completed(candidate),
        &reference,
        &lenient,
    )
    .unwrap();
    assert_eq!(report.outcome(), Outcome::Match);
    assert_eq!(report.verdict.mismatch_count, strict.verdict.mismatch_count);
}

#[test]
fn crashed_submission_yields_single_diagnostic() {
    let policy = lock_policy();
    let reference = RasterSample::blank(policy.canvas_width, policy.canvas_height).unwrap();
    let err = grade(
        &SubmissionOutcome::Failed {
            detail: "exit status 1".into(),
        },
        &reference,
        &policy,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "submission failed: exit status 1");
}

#[test]
fn unsupported_tag_in_output_is_rejected_with_line() {
    let policy = lock_policy();
    let reference = RasterSample::blank(policy.canvas_width, policy.canvas_height).unwrap();
    let output = "banner\n#KSI_META_OUTPUT_0a859a#\n0 0 0 d fd 10\n10 0 0 d dot 4\n";
    match grade_output(output, &reference, &policy).unwrap_err() {
        GradeError::Parse(e) => assert_eq!(e.to_string(), "line 4: unsupported operation \"dot\""),
        other => panic!("expected Parse, got {other:?}"),
    }
}
