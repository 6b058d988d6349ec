use std::sync::Arc;

use autoslide_protocols::VisionProvider;

use super::*;
use crate::model::CalibrationProfile;
use crate::testing::{FakeSurface, ScriptedProvider, SurfaceEvent};
use super::AttemptState::*;

fn targets() -> PuzzleTargets {
    PuzzleTargets::new(".window", ".handle", ".piece", ".success")
}

fn adapter(provider: &Arc<ScriptedProvider>) -> OracleAdapter {
    OracleAdapter::new(provider.clone(), CalibrationProfile::builtin(provider.id()))
}

async fn run(surface: &FakeSurface, provider: &Arc<ScriptedProvider>) -> AttemptReport {
    let oracle = adapter(provider);
    let targets = targets();
    let config = SolverConfig::default();
    AlignmentController::new(surface, &oracle, &targets, &config)
        .run()
        .await
}

fn approx(values: Vec<f64>) -> Vec<i64> {
    values.into_iter().map(|v| v.round() as i64).collect()
}

#[tokio::test(start_paused = true)]
async fn test_corrects_after_missed_first_slide() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "-", "1"]));
    let surface = FakeSurface::new().solved_at(100.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.result, AttemptResult::Success(Offset::clamped(100, 260)));
    assert_eq!(report.initial, Some(Offset::clamped(105, 260)));
    assert_eq!(report.direction, Some(Direction::Negative));
    assert_eq!(report.best_fit, Some(1));
    assert_eq!(
        report.states,
        vec![
            Idle,
            InitialEstimate,
            InitialDrag,
            VerifyInitial,
            DirectionEstimate,
            Scanning,
            BestFitSelection,
            FinalDrag,
            VerifyFinal,
            Success
        ]
    );
    assert_eq!(provider.calls(), 3);
    assert_eq!(approx(surface.release_positions()), vec![105, 0, 100]);

    let scan_offsets: Vec<f64> = surface
        .events()
        .into_iter()
        .filter_map(|e| match e {
            SurfaceEvent::SetOffset(sel, px) if sel == ".handle" && px > 0.0 => Some(px),
            _ => None,
        })
        .collect();
    assert_eq!(scan_offsets, vec![105.0, 100.0, 95.0]);
}

#[tokio::test(start_paused = true)]
async fn test_direction_asked_with_post_drag_observation() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "-", "1"]));
    let surface = FakeSurface::new().solved_at(100.0);

    run(&surface, &provider).await;

    let requests = provider.requests();
    assert_eq!(requests[0].image_count(), 1);
    assert_eq!(requests[1].image_count(), 1);
    assert_eq!(requests[2].image_count(), 3);
    assert_eq!(
        requests[1].system.as_deref(),
        Some(crate::oracle::prompts::DIRECTION)
    );
}

#[tokio::test(start_paused = true)]
async fn test_first_slide_success_skips_correction() {
    let provider = Arc::new(ScriptedProvider::answering("openai", &["105"]));
    let surface = FakeSurface::new().solved_at(105.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.result, AttemptResult::Success(Offset::clamped(105, 260)));
    assert_eq!(
        report.states,
        vec![Idle, InitialEstimate, InitialDrag, VerifyInitial, Success]
    );
    assert_eq!(provider.calls(), 1);
    assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Poll)), 1);
}

#[tokio::test(start_paused = true)]
async fn test_low_offset_infers_positive_without_oracle() {
    let provider = Arc::new(ScriptedProvider::answering("openai", &["40", "2"]));
    let surface = FakeSurface::new().solved_at(50.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.direction, Some(Direction::Positive));
    assert_eq!(report.result, AttemptResult::Success(Offset::clamped(50, 260)));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_high_offset_infers_negative_without_oracle() {
    let provider = Arc::new(ScriptedProvider::answering("openai", &["400", "0"]));
    let surface = FakeSurface::new();

    let report = run(&surface, &provider).await;

    assert_eq!(report.initial, Some(Offset::clamped(260, 260)));
    assert_eq!(report.direction, Some(Direction::Negative));
    assert_eq!(provider.calls(), 2);
    assert_eq!(report.result, AttemptResult::Failure(Some(Offset::clamped(260, 260))));
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_distance_aborts_before_drag() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["no text detected"]));
    let surface = FakeSurface::new().solved_at(100.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.result, AttemptResult::Failure(None));
    assert_eq!(report.states, vec![Idle, InitialEstimate, Failed]);
    assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Press(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_best_fit_never_drags_again() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "-", "7"]));
    let surface = FakeSurface::new().solved_at(100.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.state(), Failed);
    assert!(!report.visited(FinalDrag));
    assert_eq!(report.best_fit, None);
    assert_eq!(report.result, AttemptResult::Failure(Some(Offset::clamped(105, 260))));
    assert_eq!(approx(surface.release_positions()), vec![105, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_negative_best_fit_never_drags_again() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "-", "-1"]));
    let surface = FakeSurface::new().solved_at(100.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.state(), Failed);
    assert!(!report.visited(FinalDrag));
    assert_eq!(report.best_fit, None);
    assert_eq!(approx(surface.release_positions()), vec![105, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_best_fit_fails_attempt() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "+", "none"]));
    let surface = FakeSurface::new();

    let report = run(&surface, &provider).await;

    assert_eq!(report.state(), Failed);
    assert!(!report.visited(FinalDrag));
}

#[tokio::test(start_paused = true)]
async fn test_missed_final_slide_fails_after_full_verification() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134", "-", "1"]));
    let surface = FakeSurface::new().solved_at(90.0);

    let report = run(&surface, &provider).await;

    assert_eq!(report.result, AttemptResult::Failure(Some(Offset::clamped(100, 260))));
    assert!(report.visited(VerifyFinal));
    assert_eq!(report.state(), Failed);
    assert_eq!(surface.count(|e| matches!(e, SurfaceEvent::Poll)), 12);
}

#[tokio::test(start_paused = true)]
async fn test_verification_budget_is_bounded() {
    let provider = Arc::new(ScriptedProvider::answering("openai", &["105"]));
    let surface = FakeSurface::new();
    let oracle = adapter(&provider);
    let targets = targets();
    let config = SolverConfig::default();
    let controller = AlignmentController::new(&surface, &oracle, &targets, &config);

    let start = tokio::time::Instant::now();
    assert!(!controller.verify().await);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000));
    assert!(elapsed < Duration::from_millis(3100));
}

#[tokio::test(start_paused = true)]
async fn test_surface_error_fails_attempt() {
    let provider = Arc::new(ScriptedProvider::answering("gemini", &["134"]));
    let surface = FakeSurface::new().failing_screenshots_after(1);

    let report = run(&surface, &provider).await;

    assert_eq!(report.state(), Failed);
    assert!(report.visited(InitialDrag));
    assert!(report.state().is_terminal());
    assert_eq!(report.result, AttemptResult::Failure(Some(Offset::clamped(105, 260))));
}

#[test]
fn test_targets_from_config() {
    let targets = PuzzleTargets::from_config(&PuzzleConfig::default());
    assert_eq!(targets.handle.as_str(), ".geetest_slider_button");
    assert_eq!(targets.success.text.as_deref(), Some("Verification Success"));
}
