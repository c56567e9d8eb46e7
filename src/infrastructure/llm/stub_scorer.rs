use async_trait::async_trait;

use crate::application::ports::{CallScore, CallScorer, CallScorerError};
use crate::domain::{QualityCriteria, WordTimestamp};

/// Canned scorer for local runs without model credentials.
pub struct StubScorer;

#[async_trait]
impl CallScorer for StubScorer {
    async fn score(
        &self,
        _transcript: &str,
        _words: &[WordTimestamp],
    ) -> Result<CallScore, CallScorerError> {
        let criteria = QualityCriteria {
            adequate_greeting: true,
            active_listening: true,
            clarity_objectivity: true,
            issue_resolution: true,
            subject_mastery: true,
            empathy_cordiality: true,
            directed_to_survey: false,
            incorrect_procedure: false,
            abrupt_closure: false,
        };
        Ok(CallScore {
            criteria,
            score: Some(criteria.weighted_score()),
            confidence: 100.0,
            critical_words: Vec::new(),
            rationale: vec!["stub scoring".to_string()],
            analysis: "Análise gerada pelo provedor stub.".to_string(),
            emotion: None,
            nuance: None,
        })
    }
}
