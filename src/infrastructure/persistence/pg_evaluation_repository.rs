use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{EvaluationRepository, RepositoryError};
use crate::domain::{Evaluation, EvaluationId};

use super::row_mapping::evaluation_from_row;

const EVALUATION_COLUMNS: &str = "id, agent_name, evaluator_name, month, year, call_date, \
     adequate_greeting, active_listening, clarity_objectivity, issue_resolution, \
     subject_mastery, empathy_cordiality, directed_to_survey, incorrect_procedure, \
     abrupt_closure, notes, total_score, audio_file_name, audio_sent, audio_treated, \
     audio_created_at, audio_updated_at, created_at, updated_at";

pub struct PgEvaluationRepository {
    pool: PgPool,
}

impl PgEvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationRepository for PgEvaluationRepository {
    #[instrument(skip(self, evaluation), fields(evaluation_id = %evaluation.id))]
    async fn create(&self, evaluation: &Evaluation) -> Result<(), RepositoryError> {
        let query = format!(
            "INSERT INTO evaluations ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
              $18, $19, $20, $21, $22, $23, $24)",
            EVALUATION_COLUMNS
        );
        sqlx::query(&query)
            .bind(evaluation.id.as_uuid())
            .bind(&evaluation.agent_name)
            .bind(&evaluation.evaluator_name)
            .bind(&evaluation.month)
            .bind(evaluation.year)
            .bind(evaluation.call_date)
            .bind(evaluation.criteria.adequate_greeting)
            .bind(evaluation.criteria.active_listening)
            .bind(evaluation.criteria.clarity_objectivity)
            .bind(evaluation.criteria.issue_resolution)
            .bind(evaluation.criteria.subject_mastery)
            .bind(evaluation.criteria.empathy_cordiality)
            .bind(evaluation.criteria.directed_to_survey)
            .bind(evaluation.criteria.incorrect_procedure)
            .bind(evaluation.criteria.abrupt_closure)
            .bind(&evaluation.notes)
            .bind(evaluation.total_score)
            .bind(&evaluation.audio_file_name)
            .bind(evaluation.audio_sent)
            .bind(evaluation.audio_treated)
            .bind(evaluation.audio_created_at)
            .bind(evaluation.audio_updated_at)
            .bind(evaluation.created_at)
            .bind(evaluation.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(evaluation_id = %id))]
    async fn get_by_id(&self, id: EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM evaluations WHERE id = $1",
            EVALUATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| evaluation_from_row(&r, "")).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_audio_file_name(
        &self,
        file_name: &str,
    ) -> Result<Option<Evaluation>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM evaluations WHERE audio_file_name = $1",
            EVALUATION_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| evaluation_from_row(&r, "")).transpose()
    }

    #[instrument(skip(self), fields(evaluation_id = %id))]
    async fn set_upload_pending(
        &self,
        id: EvaluationId,
        file_name: &str,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE evaluations \
             SET audio_file_name = $1, audio_sent = FALSE, audio_treated = FALSE, \
                 audio_created_at = $2, audio_updated_at = $2, updated_at = $2 \
             WHERE id = $3",
        )
        .bind(file_name)
        .bind(now)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("evaluation {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(evaluation_id = %id))]
    async fn mark_audio_sent(&self, id: EvaluationId) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE evaluations \
             SET audio_sent = TRUE, audio_updated_at = $1, updated_at = $1 \
             WHERE id = $2",
        )
        .bind(now)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("evaluation {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(evaluation_id = %id))]
    async fn mark_audio_treated(&self, id: EvaluationId) -> Result<(), RepositoryError> {
        let now = Utc::now();
        // Completion proves the object arrived, so `sent` is asserted along
        // with `treated`; (sent=false, treated=true) stays unreachable.
        let result = sqlx::query(
            "UPDATE evaluations \
             SET audio_sent = TRUE, audio_treated = TRUE, audio_updated_at = $1, updated_at = $1 \
             WHERE id = $2",
        )
        .bind(now)
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("evaluation {}", id)));
        }
        Ok(())
    }
}
