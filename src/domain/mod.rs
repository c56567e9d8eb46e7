mod analysis_result;
mod audio_status;
mod evaluation;
mod evaluation_id;
mod object_key;
mod upload_policy;

pub use analysis_result::{
    consensus_of, AnalysisId, AnalysisResult, Emotion, Nuance, ScoringPass, WordTimestamp,
};
pub use audio_status::{AudioState, AudioStatus};
pub use evaluation::{Evaluation, QualityCriteria};
pub use evaluation_id::EvaluationId;
pub use object_key::ObjectKey;
pub use upload_policy::{validate_upload, FileClass, UploadPolicyError};
