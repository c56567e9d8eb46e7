use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;

use crate::application::ports::{
    AnalysisResultRepository, AudioEvent, CallScore, CallScorer, CallScorerError,
    CompletionNotifier, EvaluationRepository, QueueMessage, QueueSubscriber, RepositoryError,
    Transcriber, Transcript, TranscriptionError,
};
use crate::application::services::with_retry;
use crate::domain::{
    consensus_of, AnalysisId, AnalysisResult, Evaluation, EvaluationId, ObjectKey, ScoringPass,
};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Message-level failures tolerated before the message is dead-lettered.
    pub max_retries: u32,
    /// Per-call attempts for the transcription and scoring requests.
    pub max_call_attempts: u32,
    pub base_delay: Duration,
    pub language_code: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_call_attempts: 3,
            base_delay: Duration::from_millis(1000),
            language_code: "pt-BR".to_string(),
        }
    }
}

/// Bounded, TTL-evicting failure counter keyed by message id. Owned by the
/// worker task; never shared across tasks.
pub struct RetryTracker {
    entries: HashMap<String, (u32, Instant)>,
    ttl: Duration,
    capacity: usize,
}

impl RetryTracker {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    pub fn record_failure(&mut self, message_id: &str) -> u32 {
        self.evict();
        let entry = self
            .entries
            .entry(message_id.to_string())
            .or_insert((0, Instant::now()));
        entry.0 += 1;
        entry.1 = Instant::now();
        entry.0
    }

    pub fn clear(&mut self, message_id: &str) {
        self.entries.remove(message_id);
    }

    fn evict(&mut self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, touched)| touched.elapsed() < ttl);
        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, (_, touched))| *touched)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => self.entries.remove(&id),
                None => break,
            };
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ProcessOutcome {
    Completed(EvaluationId),
    AlreadyTreated(EvaluationId),
}

/// Queue consumer: drives `SENT → TREATED` for each finalized audio object.
/// Delivery is at-least-once and may be concurrent across instances, so the
/// pipeline is guarded by the treated flag and the result upsert key.
pub struct AnalysisWorker<S> {
    subscriber: S,
    evaluations: Arc<dyn EvaluationRepository>,
    results: Arc<dyn AnalysisResultRepository>,
    transcriber: Arc<dyn Transcriber>,
    scorer: Arc<dyn CallScorer>,
    notifier: Arc<dyn CompletionNotifier>,
    retries: RetryTracker,
    config: WorkerConfig,
}

impl<S> AnalysisWorker<S>
where
    S: QueueSubscriber,
{
    pub fn new(
        subscriber: S,
        evaluations: Arc<dyn EvaluationRepository>,
        results: Arc<dyn AnalysisResultRepository>,
        transcriber: Arc<dyn Transcriber>,
        scorer: Arc<dyn CallScorer>,
        notifier: Arc<dyn CompletionNotifier>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            subscriber,
            evaluations,
            results,
            transcriber,
            scorer,
            notifier,
            retries: RetryTracker::new(Duration::from_secs(30 * 60), 1024),
            config,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Analysis worker started");
        while let Some(message) = self.subscriber.next().await {
            let span = tracing::info_span!(
                "audio_job",
                message_id = %message.id(),
                delivery_attempt = message.delivery_attempt(),
            );
            self.handle_message(message).instrument(span).await;
        }
        tracing::info!("Analysis worker stopped: subscription closed");
    }

    async fn handle_message(&mut self, message: Box<dyn QueueMessage>) {
        let message_id = message.id().to_string();
        match self.process(message.payload()).await {
            Ok(ProcessOutcome::Completed(evaluation_id)) => {
                self.retries.clear(&message_id);
                tracing::info!(evaluation_id = %evaluation_id, "Audio analysis completed");
                message.ack().await;
            }
            Ok(ProcessOutcome::AlreadyTreated(evaluation_id)) => {
                self.retries.clear(&message_id);
                tracing::info!(
                    evaluation_id = %evaluation_id,
                    "Duplicate delivery for treated evaluation, skipping"
                );
                message.ack().await;
            }
            Err(e) => {
                let retry_count = self.retries.record_failure(&message_id);
                if retry_count >= self.config.max_retries {
                    tracing::error!(
                        error = %e,
                        retry_count,
                        "Retries exhausted, message goes to the dead-letter sink"
                    );
                    self.retries.clear(&message_id);
                    message.nack().await;
                } else {
                    let delay = self.config.base_delay * 2u32.pow(retry_count - 1);
                    tracing::warn!(
                        error = %e,
                        retry_count,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Processing failed, nacking for redelivery"
                    );
                    tokio::time::sleep(delay).await;
                    message.nack().await;
                }
            }
        }
    }

    async fn process(&self, payload: &[u8]) -> Result<ProcessOutcome, WorkerError> {
        let event: AudioEvent =
            serde_json::from_slice(payload).map_err(|e| WorkerError::Payload(e.to_string()))?;

        // A message with no owning evaluation is a data-integrity failure,
        // never an occasion to fabricate a record.
        let evaluation = self
            .evaluations
            .find_by_audio_file_name(&event.object_key)
            .await?
            .ok_or_else(|| WorkerError::EvaluationNotFound(event.object_key.clone()))?;

        if evaluation.audio_treated {
            return Ok(ProcessOutcome::AlreadyTreated(evaluation.id));
        }

        let object_uri = ObjectKey::from_raw(event.object_key.as_str()).uri(&event.bucket);
        let started = Instant::now();

        tracing::info!(object_uri = %object_uri, "Starting transcription");
        let transcript = with_retry(
            || {
                self.transcriber
                    .transcribe(&object_uri, &self.config.language_code)
            },
            self.config.max_call_attempts,
            self.config.base_delay,
        )
        .await?;
        if transcript.text.trim().is_empty() {
            return Err(WorkerError::Transcription(
                TranscriptionError::EmptyTranscript,
            ));
        }
        tracing::info!(chars = transcript.text.len(), "Transcription completed");

        let score = with_retry(
            || self.scorer.score(&transcript.text, &transcript.words),
            self.config.max_call_attempts,
            self.config.base_delay,
        )
        .await?;
        tracing::info!(model_score = ?score.score, "Scoring completed");

        let result = build_result(
            &evaluation,
            &event,
            &object_uri,
            transcript,
            score,
            started.elapsed(),
        );
        self.results.upsert(&result).await?;
        self.evaluations.mark_audio_treated(evaluation.id).await?;

        if let Err(e) = self.notifier.notify_completed(evaluation.id).await {
            tracing::warn!(error = %e, "Completion notification failed (non-fatal)");
        }

        Ok(ProcessOutcome::Completed(evaluation.id))
    }
}

/// Merge transcription and scoring outputs into the stored result. The
/// primary pass re-scores the model-assessed criteria deterministically;
/// the secondary pass carries the model's own score and artifacts.
fn build_result(
    evaluation: &Evaluation,
    event: &AudioEvent,
    object_uri: &str,
    transcript: Transcript,
    score: CallScore,
    elapsed: Duration,
) -> AnalysisResult {
    let primary = ScoringPass {
        criteria: score.criteria,
        score: Some(score.criteria.weighted_score()),
        confidence: score.confidence,
        critical_words: Vec::new(),
        rationale: Vec::new(),
    };
    let secondary = ScoringPass {
        criteria: score.criteria,
        score: score.score,
        confidence: score.confidence,
        critical_words: score.critical_words,
        rationale: score.rationale,
    };
    let consensus_score = consensus_of(&primary, &secondary);

    let now = chrono::Utc::now();
    AnalysisResult {
        id: AnalysisId::new(),
        evaluation_id: evaluation.id,
        object_key: event.object_key.clone(),
        object_uri: object_uri.to_string(),
        transcript: transcript.text,
        transcription_confidence: transcript.confidence,
        word_timestamps: transcript.words,
        emotion: score.emotion,
        nuance: score.nuance,
        primary_score: primary,
        secondary_score: secondary,
        consensus_score,
        analysis: score.analysis,
        processing_secs: elapsed.as_secs_f64(),
        created_at: now,
        updated_at: now,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("invalid message payload: {0}")]
    Payload(String),
    #[error("no evaluation linked to object {0}")]
    EvaluationNotFound(String),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("scoring: {0}")]
    Scoring(#[from] CallScorerError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
