use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::RepositoryError;
use crate::domain::{
    AnalysisId, AnalysisResult, Emotion, Evaluation, EvaluationId, Nuance, QualityCriteria,
    ScoringPass, WordTimestamp,
};

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::QueryFailed(format!("column {}: {}", column, e)))
}

/// Map an evaluation row. `prefix` supports joined queries that alias the
/// evaluation columns (e.g. `e_agent_name`).
pub fn evaluation_from_row(row: &PgRow, prefix: &str) -> Result<Evaluation, RepositoryError> {
    let col = |name: &str| format!("{}{}", prefix, name);

    Ok(Evaluation {
        id: EvaluationId::from_uuid(get::<Uuid>(row, &col("id"))?),
        agent_name: get(row, &col("agent_name"))?,
        evaluator_name: get(row, &col("evaluator_name"))?,
        month: get(row, &col("month"))?,
        year: get(row, &col("year"))?,
        call_date: get(row, &col("call_date"))?,
        criteria: QualityCriteria {
            adequate_greeting: get(row, &col("adequate_greeting"))?,
            active_listening: get(row, &col("active_listening"))?,
            clarity_objectivity: get(row, &col("clarity_objectivity"))?,
            issue_resolution: get(row, &col("issue_resolution"))?,
            subject_mastery: get(row, &col("subject_mastery"))?,
            empathy_cordiality: get(row, &col("empathy_cordiality"))?,
            directed_to_survey: get(row, &col("directed_to_survey"))?,
            incorrect_procedure: get(row, &col("incorrect_procedure"))?,
            abrupt_closure: get(row, &col("abrupt_closure"))?,
        },
        notes: get(row, &col("notes"))?,
        total_score: get(row, &col("total_score"))?,
        audio_file_name: get(row, &col("audio_file_name"))?,
        audio_sent: get(row, &col("audio_sent"))?,
        audio_treated: get(row, &col("audio_treated"))?,
        audio_created_at: get(row, &col("audio_created_at"))?,
        audio_updated_at: get(row, &col("audio_updated_at"))?,
        created_at: get(row, &col("created_at"))?,
        updated_at: get(row, &col("updated_at"))?,
    })
}

pub fn analysis_from_row(row: &PgRow) -> Result<AnalysisResult, RepositoryError> {
    let word_timestamps: Vec<WordTimestamp> =
        from_json(get::<serde_json::Value>(row, "word_timestamps")?)?;
    let emotion: Option<Emotion> = get::<Option<serde_json::Value>>(row, "emotion")?
        .map(from_json)
        .transpose()?;
    let nuance: Option<Nuance> = get::<Option<serde_json::Value>>(row, "nuance")?
        .map(from_json)
        .transpose()?;
    let primary_score: ScoringPass = from_json(get::<serde_json::Value>(row, "primary_score")?)?;
    let secondary_score: ScoringPass =
        from_json(get::<serde_json::Value>(row, "secondary_score")?)?;

    Ok(AnalysisResult {
        id: AnalysisId::from_uuid(get::<Uuid>(row, "id")?),
        evaluation_id: EvaluationId::from_uuid(get::<Uuid>(row, "evaluation_id")?),
        object_key: get(row, "object_key")?,
        object_uri: get(row, "object_uri")?,
        transcript: get(row, "transcript")?,
        transcription_confidence: get(row, "transcription_confidence")?,
        word_timestamps,
        emotion,
        nuance,
        primary_score,
        secondary_score,
        consensus_score: get(row, "consensus_score")?,
        analysis: get(row, "analysis")?,
        processing_secs: get(row, "processing_secs")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, RepositoryError> {
    serde_json::from_value(value).map_err(|e| RepositoryError::SerializationFailed(e.to_string()))
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(value).map_err(|e| RepositoryError::SerializationFailed(e.to_string()))
}
