mod analysis_repository;
mod audio_object_store;
mod call_scorer;
mod completion_notifier;
mod evaluation_repository;
mod queue;
mod repository_error;
mod transcriber;

pub use analysis_repository::AnalysisResultRepository;
pub use audio_object_store::{AudioObjectStore, AudioStoreError};
pub use call_scorer::{CallScore, CallScorer, CallScorerError};
pub use completion_notifier::{CompletionNotifier, NotifyError};
pub use evaluation_repository::EvaluationRepository;
pub use queue::{AudioEvent, AudioEventQueue, QueueError, QueueMessage, QueueSubscriber};
pub use repository_error::RepositoryError;
pub use transcriber::{Transcriber, Transcript, TranscriptionError};
