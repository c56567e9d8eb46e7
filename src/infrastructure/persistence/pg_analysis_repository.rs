use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{AnalysisResultRepository, RepositoryError};
use crate::domain::{AnalysisResult, Evaluation, EvaluationId};

use super::row_mapping::{analysis_from_row, evaluation_from_row, to_json};

const ANALYSIS_COLUMNS: &str = "id, evaluation_id, object_key, object_uri, transcript, \
     transcription_confidence, word_timestamps, emotion, nuance, primary_score, \
     secondary_score, consensus_score, analysis, processing_secs, created_at, updated_at";

const JOINED_COLUMNS: &str = "r.id, r.evaluation_id, r.object_key, r.object_uri, r.transcript, \
     r.transcription_confidence, r.word_timestamps, r.emotion, r.nuance, r.primary_score, \
     r.secondary_score, r.consensus_score, r.analysis, r.processing_secs, r.created_at, \
     r.updated_at, \
     e.id AS e_id, e.agent_name AS e_agent_name, e.evaluator_name AS e_evaluator_name, \
     e.month AS e_month, e.year AS e_year, e.call_date AS e_call_date, \
     e.adequate_greeting AS e_adequate_greeting, e.active_listening AS e_active_listening, \
     e.clarity_objectivity AS e_clarity_objectivity, e.issue_resolution AS e_issue_resolution, \
     e.subject_mastery AS e_subject_mastery, e.empathy_cordiality AS e_empathy_cordiality, \
     e.directed_to_survey AS e_directed_to_survey, \
     e.incorrect_procedure AS e_incorrect_procedure, e.abrupt_closure AS e_abrupt_closure, \
     e.notes AS e_notes, e.total_score AS e_total_score, \
     e.audio_file_name AS e_audio_file_name, e.audio_sent AS e_audio_sent, \
     e.audio_treated AS e_audio_treated, e.audio_created_at AS e_audio_created_at, \
     e.audio_updated_at AS e_audio_updated_at, e.created_at AS e_created_at, \
     e.updated_at AS e_updated_at";

pub struct PgAnalysisResultRepository {
    pool: PgPool,
}

impl PgAnalysisResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisResultRepository for PgAnalysisResultRepository {
    #[instrument(skip(self, result), fields(evaluation_id = %result.evaluation_id))]
    async fn upsert(&self, result: &AnalysisResult) -> Result<(), RepositoryError> {
        let query = format!(
            "INSERT INTO analysis_results ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (evaluation_id) DO UPDATE SET \
                 object_key = EXCLUDED.object_key, \
                 object_uri = EXCLUDED.object_uri, \
                 transcript = EXCLUDED.transcript, \
                 transcription_confidence = EXCLUDED.transcription_confidence, \
                 word_timestamps = EXCLUDED.word_timestamps, \
                 emotion = EXCLUDED.emotion, \
                 nuance = EXCLUDED.nuance, \
                 primary_score = EXCLUDED.primary_score, \
                 secondary_score = EXCLUDED.secondary_score, \
                 consensus_score = EXCLUDED.consensus_score, \
                 analysis = EXCLUDED.analysis, \
                 processing_secs = EXCLUDED.processing_secs, \
                 updated_at = EXCLUDED.updated_at",
            ANALYSIS_COLUMNS
        );
        sqlx::query(&query)
            .bind(result.id.as_uuid())
            .bind(result.evaluation_id.as_uuid())
            .bind(&result.object_key)
            .bind(&result.object_uri)
            .bind(&result.transcript)
            .bind(result.transcription_confidence)
            .bind(to_json(&result.word_timestamps)?)
            .bind(result.emotion.as_ref().map(to_json).transpose()?)
            .bind(result.nuance.as_ref().map(to_json).transpose()?)
            .bind(to_json(&result.primary_score)?)
            .bind(to_json(&result.secondary_score)?)
            .bind(result.consensus_score)
            .bind(&result.analysis)
            .bind(result.processing_secs)
            .bind(result.created_at)
            .bind(result.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(evaluation_id = %evaluation_id))]
    async fn get_by_evaluation(
        &self,
        evaluation_id: EvaluationId,
    ) -> Result<Option<AnalysisResult>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM analysis_results WHERE evaluation_id = $1",
            ANALYSIS_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(evaluation_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| analysis_from_row(&r)).transpose()
    }

    #[instrument(skip(self))]
    async fn list_with_evaluations(
        &self,
        agent_name: Option<&str>,
        limit: i64,
    ) -> Result<Vec<(AnalysisResult, Evaluation)>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM analysis_results r \
             JOIN evaluations e ON e.id = r.evaluation_id \
             WHERE $1::text IS NULL OR e.agent_name = $1 \
             ORDER BY r.created_at DESC \
             LIMIT $2",
            JOINED_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(agent_name)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let result = analysis_from_row(row)?;
                let evaluation = evaluation_from_row(row, "e_")?;
                Ok((result, evaluation))
            })
            .collect()
    }

    #[instrument(skip(self, analysis), fields(evaluation_id = %evaluation_id))]
    async fn update_analysis_text(
        &self,
        evaluation_id: EvaluationId,
        analysis: &str,
    ) -> Result<Option<AnalysisResult>, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE analysis_results SET analysis = $1, updated_at = $2 WHERE evaluation_id = $3",
        )
        .bind(analysis)
        .bind(now)
        .bind(evaluation_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_evaluation(evaluation_id).await
    }
}
