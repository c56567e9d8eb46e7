use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AudioState, AudioStatus, EvaluationId};

/// The nine boolean quality criteria scored for every call. Wire names keep
/// the console's existing pt-BR keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCriteria {
    #[serde(rename = "saudacaoAdequada", default)]
    pub adequate_greeting: bool,
    #[serde(rename = "escutaAtiva", default)]
    pub active_listening: bool,
    #[serde(rename = "clarezaObjetividade", default)]
    pub clarity_objectivity: bool,
    #[serde(rename = "resolucaoQuestao", default)]
    pub issue_resolution: bool,
    #[serde(rename = "dominioAssunto", default)]
    pub subject_mastery: bool,
    #[serde(rename = "empatiaCordialidade", default)]
    pub empathy_cordiality: bool,
    #[serde(rename = "direcionouPesquisa", default)]
    pub directed_to_survey: bool,
    #[serde(rename = "procedimentoIncorreto", default)]
    pub incorrect_procedure: bool,
    #[serde(rename = "encerramentoBrusco", default)]
    pub abrupt_closure: bool,
}

impl QualityCriteria {
    /// Deterministic 0-100 score. Weights follow the rubric sent to the
    /// scoring model: positive criteria sum to 100, the two negative
    /// criteria subtract heavily, and the result is clamped.
    pub fn weighted_score(&self) -> f64 {
        let mut score: f64 = 0.0;
        if self.adequate_greeting {
            score += 10.0;
        }
        if self.active_listening {
            score += 25.0;
        }
        if self.clarity_objectivity {
            score += 15.0;
        }
        if self.issue_resolution {
            score += 25.0;
        }
        if self.subject_mastery {
            score += 10.0;
        }
        if self.empathy_cordiality {
            score += 10.0;
        }
        if self.directed_to_survey {
            score += 5.0;
        }
        if self.incorrect_procedure {
            score -= 60.0;
        }
        if self.abrupt_closure {
            score -= 100.0;
        }
        score.clamp(0.0, 100.0)
    }
}

/// A human-authored quality scorecard for one recorded call, carrying the
/// mutable audio-status fields owned by the processing state machine.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub agent_name: String,
    pub evaluator_name: String,
    pub month: String,
    pub year: i32,
    pub call_date: DateTime<Utc>,
    pub criteria: QualityCriteria,
    pub notes: String,
    pub total_score: i32,
    pub audio_file_name: Option<String>,
    pub audio_sent: bool,
    pub audio_treated: bool,
    pub audio_created_at: Option<DateTime<Utc>>,
    pub audio_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evaluation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent_name: String,
        evaluator_name: String,
        month: String,
        year: i32,
        call_date: DateTime<Utc>,
        criteria: QualityCriteria,
        notes: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EvaluationId::new(),
            agent_name,
            evaluator_name,
            month,
            year,
            call_date,
            criteria,
            notes,
            total_score: criteria.weighted_score() as i32,
            audio_file_name: None,
            audio_sent: false,
            audio_treated: false,
            audio_created_at: None,
            audio_updated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn audio_state(&self) -> AudioState {
        AudioState::derive(
            self.audio_file_name.as_deref(),
            self.audio_sent,
            self.audio_treated,
        )
    }

    pub fn audio_status(&self) -> AudioStatus {
        AudioStatus::from_flags(self.audio_sent, self.audio_treated)
    }
}
