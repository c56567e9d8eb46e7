use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use velohub_audio::application::ports::{
    AnalysisResultRepository, AudioEventQueue, AudioObjectStore, CallScore, CallScorer,
    CallScorerError, CompletionNotifier, EvaluationRepository, NotifyError, Transcriber,
    Transcript, TranscriptionError,
};
use velohub_audio::application::services::{
    AnalysisWorker, ReportService, UploadService, WorkerConfig,
};
use velohub_audio::domain::{
    AnalysisId, AnalysisResult, Evaluation, EvaluationId, QualityCriteria, ScoringPass,
    WordTimestamp,
};
use velohub_audio::infrastructure::persistence::{
    in_memory_repositories, InMemoryAnalysisResultRepository, InMemoryEvaluationRepository,
};
use velohub_audio::infrastructure::queue::{ChannelAudioQueue, ChannelSubscriber, DeadLetterSink};
use velohub_audio::infrastructure::storage::InMemoryAudioStore;
use velohub_audio::presentation::{AppState, create_router};

pub const TEST_BUCKET: &str = "qualidade_audio_envio";

pub struct Harness {
    pub evaluations: Arc<InMemoryEvaluationRepository>,
    pub results: Arc<InMemoryAnalysisResultRepository>,
    pub store: Arc<InMemoryAudioStore>,
    pub queue: Arc<ChannelAudioQueue>,
    pub subscriber: Option<ChannelSubscriber>,
    pub dead_letters: DeadLetterSink,
    pub state: AppState,
}

pub fn harness() -> Harness {
    let (evaluations, results) = in_memory_repositories();
    let store = Arc::new(InMemoryAudioStore::new(TEST_BUCKET));
    let (queue, subscriber, dead_letters) = ChannelAudioQueue::new(3);
    let queue = Arc::new(queue);

    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&evaluations) as Arc<dyn EvaluationRepository>,
        Arc::clone(&store) as Arc<dyn AudioObjectStore>,
        Arc::clone(&queue) as Arc<dyn AudioEventQueue>,
        TEST_BUCKET.to_string(),
        Duration::from_secs(900),
    ));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&evaluations) as Arc<dyn EvaluationRepository>,
        Arc::clone(&results) as Arc<dyn AnalysisResultRepository>,
    ));
    let state = AppState::new(upload_service, report_service);

    Harness {
        evaluations,
        results,
        store,
        queue,
        subscriber: Some(subscriber),
        dead_letters,
        state,
    }
}

pub fn router(harness: &Harness) -> axum::Router {
    create_router(harness.state.clone())
}

pub fn worker_config() -> WorkerConfig {
    WorkerConfig {
        base_delay: Duration::from_millis(1),
        ..WorkerConfig::default()
    }
}

pub fn spawn_worker(
    harness: &mut Harness,
    transcriber: Arc<dyn Transcriber>,
    scorer: Arc<dyn CallScorer>,
    notifier: Arc<dyn CompletionNotifier>,
) -> JoinHandle<()> {
    let subscriber = harness
        .subscriber
        .take()
        .expect("worker already spawned for this harness");
    let worker = AnalysisWorker::new(
        subscriber,
        Arc::clone(&harness.evaluations) as Arc<dyn EvaluationRepository>,
        Arc::clone(&harness.results) as Arc<dyn AnalysisResultRepository>,
        transcriber,
        scorer,
        notifier,
        worker_config(),
    );
    tokio::spawn(worker.run())
}

pub fn make_evaluation(agent_name: &str) -> Evaluation {
    Evaluation::new(
        agent_name.to_string(),
        "Avaliadora".to_string(),
        "Janeiro".to_string(),
        2025,
        Utc::now(),
        QualityCriteria {
            adequate_greeting: true,
            active_listening: true,
            clarity_objectivity: true,
            issue_resolution: true,
            subject_mastery: true,
            empathy_cordiality: true,
            directed_to_survey: true,
            incorrect_procedure: false,
            abrupt_closure: false,
        },
        String::new(),
    )
}

pub fn make_result(evaluation_id: EvaluationId, consensus: f64) -> AnalysisResult {
    let pass = ScoringPass {
        criteria: QualityCriteria::default(),
        score: Some(consensus),
        confidence: 90.0,
        critical_words: Vec::new(),
        rationale: Vec::new(),
    };
    let now = Utc::now();
    AnalysisResult {
        id: AnalysisId::new(),
        evaluation_id,
        object_key: format!("audio/{}-call.mp3", now.timestamp_millis()),
        object_uri: format!("gs://{}/audio/call.mp3", TEST_BUCKET),
        transcript: "Bom dia".to_string(),
        transcription_confidence: 0.9,
        word_timestamps: Vec::new(),
        emotion: None,
        nuance: None,
        primary_score: pass.clone(),
        secondary_score: pass,
        consensus_score: Some(consensus),
        analysis: String::new(),
        processing_secs: 1.0,
        created_at: now,
        updated_at: now,
    }
}

pub struct ScriptedTranscriber {
    responses: Mutex<VecDeque<Result<Transcript, TranscriptionError>>>,
}

impl ScriptedTranscriber {
    pub fn ok() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_responses(
        responses: Vec<Result<Transcript, TranscriptionError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn default_transcript() -> Transcript {
        Transcript {
            text: "Bom dia, em que posso ajudar?".to_string(),
            words: vec![WordTimestamp {
                word: "Bom".to_string(),
                start_secs: 0.0,
                end_secs: 0.4,
            }],
            confidence: 0.92,
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(
        &self,
        _object_uri: &str,
        _language_code: &str,
    ) -> Result<Transcript, TranscriptionError> {
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .unwrap_or_else(|| Ok(Self::default_transcript()))
    }
}

pub struct FixedScorer {
    pub score: Option<f64>,
}

#[async_trait]
impl CallScorer for FixedScorer {
    async fn score(
        &self,
        _transcript: &str,
        _words: &[WordTimestamp],
    ) -> Result<CallScore, CallScorerError> {
        Ok(CallScore {
            criteria: QualityCriteria {
                adequate_greeting: true,
                active_listening: true,
                clarity_objectivity: true,
                issue_resolution: true,
                subject_mastery: true,
                empathy_cordiality: true,
                directed_to_survey: true,
                incorrect_procedure: false,
                abrupt_closure: false,
            },
            score: self.score,
            confidence: 88.0,
            critical_words: vec!["cancelamento".to_string()],
            rationale: vec!["saudação adequada: +10".to_string()],
            analysis: "Atendimento cordial e resolutivo.".to_string(),
            emotion: None,
            nuance: None,
        })
    }
}

pub struct RecordingNotifier {
    pub calls: Mutex<Vec<Uuid>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl CompletionNotifier for RecordingNotifier {
    async fn notify_completed(&self, evaluation_id: EvaluationId) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(evaluation_id.as_uuid());
        if self.fail {
            return Err(NotifyError::RequestFailed("unreachable".to_string()));
        }
        Ok(())
    }
}
