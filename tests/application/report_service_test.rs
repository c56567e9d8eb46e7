use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use chrono::NaiveDate;
use velohub_audio::application::ports::{AnalysisResultRepository, EvaluationRepository};
use velohub_audio::application::services::ReportError;
use velohub_audio::domain::EvaluationId;

use crate::common::{harness, make_evaluation, make_result, Harness};

async fn seed_score(harness: &Harness, agent: &str, consensus: f64) -> EvaluationId {
    let evaluation = make_evaluation(agent);
    harness.evaluations.create(&evaluation).await.unwrap();
    harness
        .results
        .upsert(&make_result(evaluation.id, consensus))
        .await
        .unwrap();
    evaluation.id
}

#[tokio::test]
async fn given_scores_for_one_agent_when_averaging_then_ignores_other_agents() {
    let harness = harness();
    for score in [80.0, 60.0, 100.0] {
        seed_score(&harness, "Ana", score).await;
    }
    seed_score(&harness, "Beto", 10.0).await;

    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(80.0));
    assert_eq!(average.sample_count, 3);
}

#[tokio::test]
async fn given_no_matching_results_when_averaging_then_returns_null_average() {
    let harness = harness();
    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, None);
    assert_eq!(average.sample_count, 0);
}

#[tokio::test]
async fn given_uneven_scores_when_averaging_then_rounds_to_two_decimals() {
    let harness = harness();
    for score in [70.0, 75.0, 73.0] {
        seed_score(&harness, "Ana", score).await;
    }

    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(72.67));
}

#[tokio::test]
async fn given_score_passes_when_averaging_then_consensus_wins_over_model_and_rescore() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();

    let mut result = make_result(evaluation.id, 0.0);
    result.consensus_score = Some(90.0);
    result.secondary_score.score = Some(50.0);
    result.primary_score.score = Some(10.0);
    harness.results.upsert(&result).await.unwrap();

    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(90.0));

    result.consensus_score = None;
    harness.results.upsert(&result).await.unwrap();
    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(50.0));

    result.secondary_score.score = None;
    harness.results.upsert(&result).await.unwrap();
    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(10.0));

    // With no pass producing a number the result carries no score at all.
    result.primary_score.score = None;
    harness.results.upsert(&result).await.unwrap();
    let average = harness
        .state
        .report_service
        .agent_average("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(average.average, None);
    assert_eq!(average.sample_count, 0);
}

#[tokio::test]
async fn given_date_range_when_averaging_then_bounds_are_inclusive_by_day() {
    let harness = harness();

    let mut inside = make_evaluation("Ana");
    inside.created_at = Utc.with_ymd_and_hms(2025, 1, 15, 23, 30, 0).unwrap();
    harness.evaluations.create(&inside).await.unwrap();
    harness
        .results
        .upsert(&make_result(inside.id, 80.0))
        .await
        .unwrap();

    let mut outside = make_evaluation("Ana");
    outside.created_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 1).unwrap();
    harness.evaluations.create(&outside).await.unwrap();
    harness
        .results
        .upsert(&make_result(outside.id, 20.0))
        .await
        .unwrap();

    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let average = harness
        .state
        .report_service
        .agent_average("Ana", Some(start), Some(end))
        .await
        .unwrap();
    assert_eq!(average.average, Some(80.0));
    assert_eq!(average.sample_count, 1);

    // Bounds apply independently.
    let average = harness
        .state
        .report_service
        .agent_average("Ana", Some(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()), None)
        .await
        .unwrap();
    assert_eq!(average.average, Some(20.0));
}

#[tokio::test]
async fn given_month_and_year_filters_when_listing_then_matches_calendar_names() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();

    let mut january = make_result(evaluation.id, 80.0);
    january.created_at = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
    harness.results.upsert(&january).await.unwrap();

    let listed = harness
        .state
        .report_service
        .list_by_agent("Ana", Some("Janeiro"), Some(2025))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let listed = harness
        .state
        .report_service
        .list_by_agent("Ana", Some("Fevereiro"), Some(2025))
        .await
        .unwrap();
    assert!(listed.is_empty());

    let listed = harness
        .state
        .report_service
        .list_by_agent("Ana", Some("Janeiro"), Some(2024))
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn given_many_results_when_listing_then_newest_come_first() {
    let harness = harness();

    let older = make_evaluation("Ana");
    harness.evaluations.create(&older).await.unwrap();
    let mut older_result = make_result(older.id, 50.0);
    older_result.created_at = Utc::now() - ChronoDuration::hours(2);
    harness.results.upsert(&older_result).await.unwrap();

    let newer = make_evaluation("Ana");
    harness.evaluations.create(&newer).await.unwrap();
    harness
        .results
        .upsert(&make_result(newer.id, 60.0))
        .await
        .unwrap();

    let listed = harness
        .state
        .report_service
        .list_by_agent("Ana", None, None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].evaluation_id, newer.id);
    assert_eq!(listed[1].evaluation_id, older.id);
}

#[tokio::test]
async fn given_unknown_evaluation_when_fetching_status_then_fails_not_found() {
    let harness = harness();
    let err = harness
        .state
        .report_service
        .status(EvaluationId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::EvaluationNotFound(_)));
}

#[tokio::test]
async fn given_existing_result_when_editing_analysis_then_text_is_replaced() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    harness
        .results
        .upsert(&make_result(evaluation.id, 80.0))
        .await
        .unwrap();

    let updated = harness
        .state
        .report_service
        .edit_analysis(evaluation.id, "Texto revisado pela operação.")
        .await
        .unwrap();
    assert_eq!(updated.analysis, "Texto revisado pela operação.");

    let err = harness
        .state
        .report_service
        .edit_analysis(EvaluationId::new(), "x")
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::ResultNotReady(_)));
}
