use velohub_audio::application::ports::{EvaluationRepository, QueueMessage, QueueSubscriber};
use velohub_audio::application::services::UploadError;
use velohub_audio::domain::{AudioState, ObjectKey};

use crate::common::{harness, make_evaluation};

#[tokio::test]
async fn given_fresh_evaluation_when_requesting_upload_url_then_state_becomes_upload_pending() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();

    let grant = harness
        .state
        .upload_service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", Some(1024))
        .await
        .unwrap();

    assert!(grant.object_key.starts_with("audio/"));
    assert_eq!(grant.expires_in_seconds, 900);
    assert!(grant.upload_url.contains(&grant.object_key));

    let stored = harness
        .evaluations
        .get_by_id(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.audio_file_name.as_deref(), Some(grant.object_key.as_str()));
    assert!(!stored.audio_sent);
    assert_eq!(stored.audio_state(), AudioState::UploadPending);
    assert!(stored.audio_created_at.is_some());
}

#[tokio::test]
async fn given_upload_pending_when_requesting_again_then_new_url_is_issued() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    let service = &harness.state.upload_service;

    let first = service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();
    let second = service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();

    let stored = harness
        .evaluations
        .get_by_id(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.audio_file_name.as_deref(), Some(second.object_key.as_str()));
    // The first grant is superseded; confirming it must now fail.
    if first.object_key != second.object_key {
        let err = service
            .confirm_upload(evaluation.id, &first.object_key)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::FileNameMismatch { .. }));
    }
}

#[tokio::test]
async fn given_sent_state_when_requesting_upload_url_then_fails_with_conflict() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    let service = &harness.state.upload_service;

    let grant = service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();
    service
        .confirm_upload(evaluation.id, &grant.object_key)
        .await
        .unwrap();

    let err = service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::UploadInFlight(_)));
}

#[tokio::test]
async fn given_treated_state_when_requesting_upload_url_then_new_cycle_starts() {
    let harness = harness();
    let mut evaluation = make_evaluation("Ana");
    evaluation.audio_file_name = Some("audio/1-old.mp3".to_string());
    evaluation.audio_sent = true;
    evaluation.audio_treated = true;
    harness.evaluations.create(&evaluation).await.unwrap();

    harness
        .state
        .upload_service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();

    let stored = harness
        .evaluations
        .get_by_id(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.audio_state(), AudioState::UploadPending);
    assert!(!stored.audio_sent);
    assert!(!stored.audio_treated);
}

#[tokio::test]
async fn given_no_upload_pending_when_confirming_then_fails_with_validation() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();

    let err = harness
        .state
        .upload_service
        .confirm_upload(evaluation.id, "audio/1-call.mp3")
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::NoUploadPending(_)));
}

#[tokio::test]
async fn given_confirmed_upload_when_confirming_again_then_fails_with_conflict() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    let service = &harness.state.upload_service;

    let grant = service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();
    service
        .confirm_upload(evaluation.id, &grant.object_key)
        .await
        .unwrap();

    let err = service
        .confirm_upload(evaluation.id, &grant.object_key)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::AlreadyConfirmed(_)));
}

#[tokio::test]
async fn given_upload_pending_when_reprocessing_then_fails_unconfirmed() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    let service = &harness.state.upload_service;

    service
        .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
        .await
        .unwrap();

    let err = service.reprocess(evaluation.id).await.unwrap_err();
    assert!(matches!(err, UploadError::UploadNotConfirmed(_)));
}

#[tokio::test]
async fn given_missing_object_when_reprocessing_then_fails_not_found() {
    let harness = harness();
    let mut evaluation = make_evaluation("Ana");
    evaluation.audio_file_name = Some("audio/1-call.mp3".to_string());
    evaluation.audio_sent = true;
    harness.evaluations.create(&evaluation).await.unwrap();

    let err = harness
        .state
        .upload_service
        .reprocess(evaluation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::ObjectMissing(_)));
}

#[tokio::test]
async fn given_stuck_sent_evaluation_when_reprocessing_then_delivers_event_to_subscriber() {
    let mut harness = harness();
    let mut evaluation = make_evaluation("Ana");
    evaluation.audio_file_name = Some("audio/1-call.mp3".to_string());
    evaluation.audio_sent = true;
    harness.evaluations.create(&evaluation).await.unwrap();
    harness
        .store
        .put(&ObjectKey::from_raw("audio/1-call.mp3"), vec![0u8; 16])
        .await
        .unwrap();

    let message_id = harness
        .state
        .upload_service
        .reprocess(evaluation.id)
        .await
        .unwrap();

    let mut subscriber = harness.subscriber.take().unwrap();
    let message = subscriber.next().await.unwrap();
    assert_eq!(message.id(), message_id);
    let payload: serde_json::Value = serde_json::from_slice(message.payload()).unwrap();
    assert_eq!(payload["name"], "audio/1-call.mp3");
    message.ack().await;

    let stored = harness
        .evaluations
        .get_by_id(evaluation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.audio_sent);
    assert!(!stored.audio_treated);
}

#[tokio::test]
async fn given_random_transition_sequences_when_applied_then_treated_implies_sent() {
    let harness = harness();
    let evaluation = make_evaluation("Ana");
    harness.evaluations.create(&evaluation).await.unwrap();
    let service = &harness.state.upload_service;

    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..300 {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let current = harness
            .evaluations
            .get_by_id(evaluation.id)
            .await
            .unwrap()
            .unwrap();

        match (seed >> 33) % 5 {
            0 => {
                let _ = service
                    .request_upload_url(evaluation.id, "call.mp3", "audio/mpeg", None)
                    .await;
            }
            1 => {
                if let Some(name) = current.audio_file_name.clone() {
                    let _ = service.confirm_upload(evaluation.id, &name).await;
                }
            }
            2 => {
                let _ = service
                    .confirm_upload(evaluation.id, "audio/0-wrong.mp3")
                    .await;
            }
            3 => {
                // Worker completion is only reachable for an evaluation
                // linked to an object.
                if current.audio_file_name.is_some() {
                    let _ = harness.evaluations.mark_audio_treated(evaluation.id).await;
                }
            }
            _ => {
                let _ = service.reprocess(evaluation.id).await;
            }
        }

        let after = harness
            .evaluations
            .get_by_id(evaluation.id)
            .await
            .unwrap()
            .unwrap();
        assert!(
            !after.audio_treated || after.audio_sent,
            "treated without sent after a transition"
        );
        if after.audio_sent || after.audio_treated {
            assert!(after.audio_file_name.is_some());
        }
    }
}
