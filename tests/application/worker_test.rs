use std::sync::Arc;
use std::time::Duration;

use velohub_audio::application::ports::{
    AnalysisResultRepository, AudioEvent, AudioEventQueue, EvaluationRepository,
    TranscriptionError,
};

use crate::common::{
    harness, make_evaluation, spawn_worker, FixedScorer, Harness, RecordingNotifier,
    ScriptedTranscriber, TEST_BUCKET,
};

async fn wait_until_treated(harness: &Harness, evaluation_id: velohub_audio::domain::EvaluationId) {
    for _ in 0..500 {
        let evaluation = harness
            .evaluations
            .get_by_id(evaluation_id)
            .await
            .unwrap()
            .unwrap();
        if evaluation.audio_treated {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("evaluation never reached treated");
}

fn sent_evaluation(agent: &str, object_key: &str) -> velohub_audio::domain::Evaluation {
    let mut evaluation = make_evaluation(agent);
    evaluation.audio_file_name = Some(object_key.to_string());
    evaluation.audio_sent = true;
    evaluation
}

#[tokio::test]
async fn given_duplicate_deliveries_when_processing_then_exactly_one_result_exists() {
    let mut harness = harness();
    let evaluation = sent_evaluation("Ana", "audio/1-call.mp3");
    harness.evaluations.create(&evaluation).await.unwrap();

    let worker = spawn_worker(
        &mut harness,
        Arc::new(ScriptedTranscriber::ok()),
        Arc::new(FixedScorer { score: Some(85.0) }),
        Arc::new(RecordingNotifier::new()),
    );

    let event = AudioEvent {
        object_key: "audio/1-call.mp3".to_string(),
        bucket: TEST_BUCKET.to_string(),
    };
    harness.queue.publish(&event).await.unwrap();
    harness.queue.publish(&event).await.unwrap();

    wait_until_treated(&harness, evaluation.id).await;
    harness.queue.shutdown();
    worker.await.unwrap();

    let rows = harness
        .results
        .list_with_evaluations(None, i64::MAX)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let stored = harness
        .evaluations
        .get_by_id(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.audio_treated);
    assert!(stored.audio_sent);
}

#[tokio::test]
async fn given_already_treated_evaluation_when_message_arrives_then_processing_is_skipped() {
    let mut harness = harness();
    let mut evaluation = sent_evaluation("Ana", "audio/1-call.mp3");
    evaluation.audio_treated = true;
    harness.evaluations.create(&evaluation).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::new());
    let worker = spawn_worker(
        &mut harness,
        Arc::new(ScriptedTranscriber::ok()),
        Arc::new(FixedScorer { score: Some(85.0) }),
        Arc::clone(&notifier) as _,
    );

    harness
        .queue
        .publish(&AudioEvent {
            object_key: "audio/1-call.mp3".to_string(),
            bucket: TEST_BUCKET.to_string(),
        })
        .await
        .unwrap();

    harness.queue.shutdown();
    worker.await.unwrap();

    let rows = harness
        .results
        .list_with_evaluations(None, i64::MAX)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert!(notifier.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_no_linked_evaluation_when_processing_then_message_is_dead_lettered() {
    let mut harness = harness();

    let worker = spawn_worker(
        &mut harness,
        Arc::new(ScriptedTranscriber::ok()),
        Arc::new(FixedScorer { score: Some(85.0) }),
        Arc::new(RecordingNotifier::new()),
    );

    harness
        .queue
        .publish(&AudioEvent {
            object_key: "audio/999-orphan.mp3".to_string(),
            bucket: TEST_BUCKET.to_string(),
        })
        .await
        .unwrap();

    let dead_letter = tokio::time::timeout(Duration::from_secs(5), harness.dead_letters.recv())
        .await
        .expect("dead letter never arrived")
        .unwrap();
    assert_eq!(dead_letter.delivery_attempt, 3);
    let payload: serde_json::Value = serde_json::from_slice(&dead_letter.payload).unwrap();
    assert_eq!(payload["name"], "audio/999-orphan.mp3");

    harness.queue.shutdown();
    worker.await.unwrap();

    let rows = harness
        .results
        .list_with_evaluations(None, i64::MAX)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn given_transient_transcription_failures_when_processing_then_call_retry_recovers() {
    let mut harness = harness();
    let evaluation = sent_evaluation("Ana", "audio/1-call.mp3");
    harness.evaluations.create(&evaluation).await.unwrap();

    let transcriber = ScriptedTranscriber::with_responses(vec![
        Err(TranscriptionError::ApiRequestFailed("503".to_string())),
        Err(TranscriptionError::ApiRequestFailed("503".to_string())),
    ]);
    let worker = spawn_worker(
        &mut harness,
        Arc::new(transcriber),
        Arc::new(FixedScorer { score: Some(85.0) }),
        Arc::new(RecordingNotifier::new()),
    );

    harness
        .queue
        .publish(&AudioEvent {
            object_key: "audio/1-call.mp3".to_string(),
            bucket: TEST_BUCKET.to_string(),
        })
        .await
        .unwrap();

    wait_until_treated(&harness, evaluation.id).await;
    harness.queue.shutdown();
    worker.await.unwrap();

    let result = harness
        .results
        .get_by_evaluation(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.secondary_score.score, Some(85.0));
    // Primary re-scores the model-assessed criteria deterministically.
    assert_eq!(result.primary_score.score, Some(100.0));
    assert_eq!(result.consensus_score, Some(92.5));
}

#[tokio::test]
async fn given_failing_notifier_when_processing_then_completion_still_succeeds() {
    let mut harness = harness();
    let evaluation = sent_evaluation("Ana", "audio/1-call.mp3");
    harness.evaluations.create(&evaluation).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::failing());
    let worker = spawn_worker(
        &mut harness,
        Arc::new(ScriptedTranscriber::ok()),
        Arc::new(FixedScorer { score: Some(85.0) }),
        Arc::clone(&notifier) as _,
    );

    harness
        .queue
        .publish(&AudioEvent {
            object_key: "audio/1-call.mp3".to_string(),
            bucket: TEST_BUCKET.to_string(),
        })
        .await
        .unwrap();

    wait_until_treated(&harness, evaluation.id).await;
    harness.queue.shutdown();
    worker.await.unwrap();

    assert_eq!(notifier.calls.lock().unwrap().len(), 1);
    assert!(harness
        .results
        .get_by_evaluation(evaluation.id)
        .await
        .unwrap()
        .is_some());
}
