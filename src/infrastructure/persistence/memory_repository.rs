use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::{
    AnalysisResultRepository, EvaluationRepository, RepositoryError,
};
use crate::domain::{AnalysisResult, Evaluation, EvaluationId};

type EvaluationMap = Arc<RwLock<HashMap<Uuid, Evaluation>>>;

/// In-memory repositories sharing one evaluation map, for local runs and
/// tests. Mirrors the Postgres pair's behavior, including upsert-by-
/// evaluation semantics.
pub fn in_memory_repositories() -> (
    Arc<InMemoryEvaluationRepository>,
    Arc<InMemoryAnalysisResultRepository>,
) {
    let evaluations: EvaluationMap = Arc::new(RwLock::new(HashMap::new()));
    let evaluation_repository = Arc::new(InMemoryEvaluationRepository {
        evaluations: Arc::clone(&evaluations),
    });
    let analysis_repository = Arc::new(InMemoryAnalysisResultRepository {
        results: Arc::new(RwLock::new(HashMap::new())),
        evaluations,
    });
    (evaluation_repository, analysis_repository)
}

pub struct InMemoryEvaluationRepository {
    evaluations: EvaluationMap,
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn create(&self, evaluation: &Evaluation) -> Result<(), RepositoryError> {
        let mut evaluations = self.evaluations.write().unwrap();
        evaluations.insert(evaluation.id.as_uuid(), evaluation.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let evaluations = self.evaluations.read().unwrap();
        Ok(evaluations.get(&id.as_uuid()).cloned())
    }

    async fn find_by_audio_file_name(
        &self,
        file_name: &str,
    ) -> Result<Option<Evaluation>, RepositoryError> {
        let evaluations = self.evaluations.read().unwrap();
        Ok(evaluations
            .values()
            .find(|e| e.audio_file_name.as_deref() == Some(file_name))
            .cloned())
    }

    async fn set_upload_pending(
        &self,
        id: EvaluationId,
        file_name: &str,
    ) -> Result<(), RepositoryError> {
        let mut evaluations = self.evaluations.write().unwrap();
        let evaluation = evaluations
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(format!("evaluation {}", id)))?;
        let now = Utc::now();
        evaluation.audio_file_name = Some(file_name.to_string());
        evaluation.audio_sent = false;
        evaluation.audio_treated = false;
        evaluation.audio_created_at = Some(now);
        evaluation.audio_updated_at = Some(now);
        evaluation.updated_at = now;
        Ok(())
    }

    async fn mark_audio_sent(&self, id: EvaluationId) -> Result<(), RepositoryError> {
        let mut evaluations = self.evaluations.write().unwrap();
        let evaluation = evaluations
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(format!("evaluation {}", id)))?;
        let now = Utc::now();
        evaluation.audio_sent = true;
        evaluation.audio_updated_at = Some(now);
        evaluation.updated_at = now;
        Ok(())
    }

    async fn mark_audio_treated(&self, id: EvaluationId) -> Result<(), RepositoryError> {
        let mut evaluations = self.evaluations.write().unwrap();
        let evaluation = evaluations
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(format!("evaluation {}", id)))?;
        let now = Utc::now();
        evaluation.audio_sent = true;
        evaluation.audio_treated = true;
        evaluation.audio_updated_at = Some(now);
        evaluation.updated_at = now;
        Ok(())
    }
}

pub struct InMemoryAnalysisResultRepository {
    results: Arc<RwLock<HashMap<Uuid, AnalysisResult>>>,
    evaluations: EvaluationMap,
}

#[async_trait]
impl AnalysisResultRepository for InMemoryAnalysisResultRepository {
    async fn upsert(&self, result: &AnalysisResult) -> Result<(), RepositoryError> {
        let mut results = self.results.write().unwrap();
        let entry = results
            .entry(result.evaluation_id.as_uuid())
            .or_insert_with(|| result.clone());
        // Keep the original row identity on re-analysis, like the SQL upsert.
        let id = entry.id;
        let created_at = entry.created_at;
        *entry = result.clone();
        entry.id = id;
        entry.created_at = created_at;
        Ok(())
    }

    async fn get_by_evaluation(
        &self,
        evaluation_id: EvaluationId,
    ) -> Result<Option<AnalysisResult>, RepositoryError> {
        let results = self.results.read().unwrap();
        Ok(results.get(&evaluation_id.as_uuid()).cloned())
    }

    async fn list_with_evaluations(
        &self,
        agent_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<(AnalysisResult, Evaluation)>, RepositoryError> {
        let results = self.results.read().unwrap();
        let evaluations = self.evaluations.read().unwrap();

        let mut rows: Vec<(AnalysisResult, Evaluation)> = results
            .values()
            .filter_map(|result| {
                evaluations
                    .get(&result.evaluation_id.as_uuid())
                    .map(|evaluation| (result.clone(), evaluation.clone()))
            })
            .filter(|(_, evaluation)| match agent_name {
                Some(name) => evaluation.agent_name == name,
                None => true,
            })
            .collect();
        rows.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn update_analysis_text(
        &self,
        evaluation_id: EvaluationId,
        analysis: &str,
    ) -> Result<Option<AnalysisResult>, RepositoryError> {
        let mut results = self.results.write().unwrap();
        match results.get_mut(&evaluation_id.as_uuid()) {
            Some(result) => {
                result.analysis = analysis.to_string();
                result.updated_at = Utc::now();
                Ok(Some(result.clone()))
            }
            None => Ok(None),
        }
    }
}
