use async_trait::async_trait;

use crate::domain::{AnalysisResult, Evaluation, EvaluationId};

use super::RepositoryError;

/// Persistence seam for analysis results. At most one result exists per
/// evaluation; `upsert` overwrites on conflict rather than appending.
#[async_trait]
pub trait AnalysisResultRepository: Send + Sync {
    async fn upsert(&self, result: &AnalysisResult) -> Result<(), RepositoryError>;

    async fn get_by_evaluation(
        &self,
        evaluation_id: EvaluationId,
    ) -> Result<Option<AnalysisResult>, RepositoryError>;

    /// Results joined to their owning evaluation, newest first, optionally
    /// restricted to one agent.
    async fn list_with_evaluations(
        &self,
        agent_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<(AnalysisResult, Evaluation)>, RepositoryError>;

    /// Manual correction of the free-text analysis. Returns the updated
    /// result, or `None` when no result exists for the evaluation.
    async fn update_analysis_text(
        &self,
        evaluation_id: EvaluationId,
        analysis: &str,
    ) -> Result<Option<AnalysisResult>, RepositoryError>;
}
