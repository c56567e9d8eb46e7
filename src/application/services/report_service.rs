use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::application::ports::{
    AnalysisResultRepository, EvaluationRepository, RepositoryError,
};
use crate::domain::{AnalysisResult, AudioStatus, Evaluation, EvaluationId};

/// Calendar month names as the console displays them.
pub const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub fn month_name(date: &DateTime<Utc>) -> &'static str {
    MONTHS_PT[date.month0() as usize]
}

const LIST_LIMIT: i64 = 100;

#[derive(Debug, Clone)]
pub struct AudioStatusView {
    pub evaluation_id: EvaluationId,
    pub status: AudioStatus,
    pub audio_file_name: Option<String>,
    pub sent: bool,
    pub treated: bool,
    pub audio_created_at: Option<DateTime<Utc>>,
    pub audio_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentAverage {
    pub average: Option<f64>,
    pub sample_count: usize,
}

/// Read side: status/result projections and per-agent aggregation.
pub struct ReportService {
    evaluations: Arc<dyn EvaluationRepository>,
    results: Arc<dyn AnalysisResultRepository>,
}

impl ReportService {
    pub fn new(
        evaluations: Arc<dyn EvaluationRepository>,
        results: Arc<dyn AnalysisResultRepository>,
    ) -> Self {
        Self {
            evaluations,
            results,
        }
    }

    pub async fn status(&self, id: EvaluationId) -> Result<AudioStatusView, ReportError> {
        let evaluation = self
            .evaluations
            .get_by_id(id)
            .await?
            .ok_or(ReportError::EvaluationNotFound(id))?;

        Ok(AudioStatusView {
            evaluation_id: evaluation.id,
            status: evaluation.audio_status(),
            audio_file_name: evaluation.audio_file_name.clone(),
            sent: evaluation.audio_sent,
            treated: evaluation.audio_treated,
            audio_created_at: evaluation.audio_created_at,
            audio_updated_at: evaluation.audio_updated_at,
        })
    }

    pub async fn evaluation(&self, id: EvaluationId) -> Result<Evaluation, ReportError> {
        self.evaluations
            .get_by_id(id)
            .await?
            .ok_or(ReportError::EvaluationNotFound(id))
    }

    pub async fn result(&self, id: EvaluationId) -> Result<AnalysisResult, ReportError> {
        self.results
            .get_by_evaluation(id)
            .await?
            .ok_or(ReportError::ResultNotReady(id))
    }

    pub async fn edit_analysis(
        &self,
        id: EvaluationId,
        analysis: &str,
    ) -> Result<AnalysisResult, ReportError> {
        self.results
            .update_analysis_text(id, analysis)
            .await?
            .ok_or(ReportError::ResultNotReady(id))
    }

    /// Average effective score for one agent, optionally restricted to
    /// evaluations created within `[date_start 00:00:00, date_end 23:59:59]`
    /// (both bounds inclusive and independently optional).
    pub async fn agent_average(
        &self,
        agent_name: &str,
        date_start: Option<NaiveDate>,
        date_end: Option<NaiveDate>,
    ) -> Result<AgentAverage, ReportError> {
        let rows = self
            .results
            .list_with_evaluations(Some(agent_name), i64::MAX)
            .await?;

        let scores: Vec<f64> = rows
            .iter()
            .filter(|(_, evaluation)| {
                within_range(evaluation.created_at, date_start, date_end)
            })
            .filter_map(|(result, _)| result.effective_score())
            .collect();

        if scores.is_empty() {
            return Ok(AgentAverage {
                average: None,
                sample_count: 0,
            });
        }

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Ok(AgentAverage {
            average: Some((mean * 100.0).round() / 100.0),
            sample_count: scores.len(),
        })
    }

    /// Analyses for one agent, newest first, capped at 100. `month` matches
    /// the calendar name of the analysis creation date.
    pub async fn list_by_agent(
        &self,
        agent_name: &str,
        month: Option<&str>,
        year: Option<i32>,
    ) -> Result<Vec<AnalysisResult>, ReportError> {
        let rows = self
            .results
            .list_with_evaluations(Some(agent_name), LIST_LIMIT)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(result, _)| result)
            .filter(|result| match year {
                Some(y) => result.created_at.year() == y,
                None => true,
            })
            .filter(|result| match month {
                Some(m) => month_name(&result.created_at) == m,
                None => true,
            })
            .collect())
    }
}

fn within_range(
    created_at: DateTime<Utc>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
) -> bool {
    let date = created_at.date_naive();
    let after_start = date_start.is_none_or(|start| date >= start);
    let before_end = date_end.is_none_or(|end| date <= end);
    after_start && before_end
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("evaluation not found: {0}")]
    EvaluationNotFound(EvaluationId),
    #[error("analysis not found for evaluation {0}: still processing or absent")]
    ResultNotReady(EvaluationId),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}
