use crewforge_config::{ConfigError, OutfitStrategy, PlannerConfig, TuningConfig};
use crewforge_core::Footprint;
use crewforge_test::{three_skill_catalog, SnapshotBuilder};

use super::*;
use crate::Planner;

fn history(cycles: &[(f64, f64, f64, f64)]) -> PerformanceHistory {
    let mut history = PerformanceHistory::new();
    for &(initial, before, after, equipped) in cycles {
        history.record(CycleRecord::new(initial, before, after, equipped));
    }
    history
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn test_trend_is_least_squares_slope() {
    assert_eq!(trend(&[20.0, 22.0, 24.0]), 2.0);
    assert_eq!(trend(&[5.0, 5.0]), 0.0);
    assert_eq!(trend(&[7.0]), 0.0);
}

#[test]
fn test_summary_stats() {
    let history = history(&[(40.0, 35.0, 30.0, 28.0), (41.0, 36.0, 31.0, 25.0)]);

    let summary = history.summary_stats().unwrap();

    assert_eq!(summary.total_cycles, 2);
    assert_eq!(summary.avg_initial, 40.5);
    assert_eq!(summary.avg_final, 26.5);
    assert_eq!(summary.best_final, 25.0);
    assert_eq!(summary.worst_final, 28.0);
    assert!(summary.first_recorded <= summary.last_recorded);
}

#[test]
fn test_empty_history_has_no_stats() {
    let history = PerformanceHistory::new();

    assert!(history.summary_stats().is_none());
    assert!(history.latest_improvement().is_none());
}

#[test]
fn test_history_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let saved = history(&[(40.0, 35.0, 30.0, 28.0)]);

    saved.save(&path).unwrap();
    let loaded = PerformanceHistory::load(&path).unwrap();

    assert_eq!(loaded, saved);
}

#[test]
fn test_missing_history_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    let loaded = PerformanceHistory::load(dir.path().join("absent.json")).unwrap();

    assert!(loaded.is_empty());
}

#[test]
fn test_malformed_history_is_an_error() {
    let err = PerformanceHistory::from_json_str("{\"cycles\": 3}").unwrap_err();

    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_cycle_record_from_outcome() {
    let snapshot = SnapshotBuilder::new()
        .worker(1, 10, 1, 1)
        .station("Geothermal", 1, Footprint::Single, &[1])
        .build();
    let config = PlannerConfig::default().with_catalog(three_skill_catalog(1));
    let outcome = Planner::new(config).plan(&snapshot).unwrap();

    let record = CycleRecord::from_outcome(&outcome).unwrap();

    assert_eq!(record.initial, 10.0);
    assert_eq!(record.with_equipment, 10.0);
}

#[test]
fn test_cycle_record_needs_every_average() {
    // Nobody staffs the station at first, so the initial table has no mean.
    let snapshot = SnapshotBuilder::new()
        .worker(1, 10, 1, 1)
        .station("Geothermal", 1, Footprint::Single, &[])
        .build();
    let config = PlannerConfig::default().with_catalog(three_skill_catalog(1));
    let outcome = Planner::new(config).plan(&snapshot).unwrap();

    assert!(CycleRecord::from_outcome(&outcome).is_none());
}

#[test]
fn test_single_cycle_is_not_enough() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(40.0, 35.0, 30.0, 28.0)]);
    let config = PlannerConfig::default();

    assert!(tuner.analyze(&history).is_none());
    assert!(tuner.suggest(&history, &config).is_none());
    assert_eq!(tuner.apply(&history, &config), config);
}

#[test]
fn test_regression_widens_search() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(30.0, 32.0, 31.0, 33.0), (30.0, 32.0, 31.0, 33.0)]);
    let config = PlannerConfig::default();

    let report = tuner.suggest(&history, &config).unwrap();

    assert!(!report.analysis.beats_initial);
    assert!(!report.analysis.beats_before_balancing);
    assert_eq!(report.issues.len(), 2);
    let adjustments = &report.adjustments;
    assert!(approx(adjustments.swap_aggressiveness, 1.2));
    assert!(approx(adjustments.balance_threshold, 4.0));
    assert_eq!(adjustments.max_passes, Some(15));
    assert_eq!(adjustments.outfit_strategy, Some(OutfitStrategy::Hybrid));
    assert_eq!(adjustments.min_skill_threshold, Some(1));
}

#[test]
fn test_adjustments_are_clamped() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(30.0, 32.0, 31.0, 33.0), (30.0, 32.0, 31.0, 33.0)]);
    let config = PlannerConfig::default()
        .with_swap_aggressiveness(1.9)
        .with_balance_threshold(2.1)
        .with_max_passes(19)
        .with_min_skill_threshold(8)
        .with_outfit_strategy(OutfitStrategy::BigRoomsFirst);

    let adjustments = tuner.suggest(&history, &config).unwrap().adjustments;

    assert_eq!(adjustments.swap_aggressiveness, Some(2.0));
    assert_eq!(adjustments.balance_threshold, Some(2.0));
    assert_eq!(adjustments.max_passes, Some(20));
    assert_eq!(adjustments.min_skill_threshold, Some(8));
    assert_eq!(adjustments.outfit_strategy, None);
}

#[test]
fn test_degrading_trend_overrides_aggressiveness() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(30.0, 35.0, 34.0, 31.0), (30.0, 35.0, 34.0, 33.0)]);
    let config = PlannerConfig::default();

    let report = tuner.suggest(&history, &config).unwrap();

    assert_eq!(report.analysis.final_trend, 2.0);
    assert!(report
        .issues
        .contains(&TuningIssue::Degrading { slope: 2.0 }));
    assert!(approx(report.adjustments.swap_aggressiveness, 1.3));
}

#[test]
fn test_small_win_tightens_threshold() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(40.0, 39.0, 38.5, 38.0), (40.0, 39.0, 38.5, 38.0)]);
    let config = PlannerConfig::default();

    let report = tuner.suggest(&history, &config).unwrap();

    assert_eq!(report.issues.len(), 1);
    assert!(matches!(report.issues[0], TuningIssue::RoomToImprove { .. }));
    assert!(approx(report.adjustments.balance_threshold, 4.5));
    assert_eq!(report.adjustments.swap_aggressiveness, None);
}

#[test]
fn test_healthy_history_changes_nothing() {
    let tuner = AdaptiveTuner::default();
    let history = history(&[(40.0, 35.0, 30.0, 24.0), (40.0, 35.0, 30.0, 24.0)]);
    let config = PlannerConfig::default();

    let report = tuner.suggest(&history, &config).unwrap();

    assert!(report.issues.is_empty());
    assert!(report.adjustments.is_empty());
    assert!(report.analysis.target_met);
    assert_eq!(tuner.apply(&history, &config), config);
}

#[test]
fn test_only_recent_window_is_analyzed() {
    let tuner = AdaptiveTuner::new(TuningConfig {
        learning_window: 2,
        ..TuningConfig::default()
    });
    let history = history(&[
        (30.0, 32.0, 31.0, 90.0),
        (40.0, 35.0, 30.0, 24.0),
        (40.0, 35.0, 30.0, 24.0),
    ]);

    let analysis = tuner.analyze(&history).unwrap();

    assert_eq!(analysis.cycles, 2);
    assert_eq!(analysis.final_avg, 24.0);
    assert!(analysis.beats_initial);
}

#[test]
fn test_apply_writes_adjusted_values() {
    let adjustments = Adjustments {
        max_passes: Some(15),
        outfit_strategy: Some(OutfitStrategy::Hybrid),
        ..Adjustments::default()
    };
    let config = PlannerConfig::default();

    let adjusted = adjustments.apply(&config);

    assert_eq!(adjusted.max_passes, 15);
    assert_eq!(adjusted.outfit_strategy, OutfitStrategy::Hybrid);
    assert_eq!(adjusted.balance_threshold, config.balance_threshold);
}
