use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CallScore, CallScorer, CallScorerError};
use crate::domain::{Emotion, Nuance, QualityCriteria, WordTimestamp};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Scores a transcript with a generative model and parses the first JSON
/// object found in the free-text reply.
pub struct GeminiScorer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    request_timeout: Duration,
}

impl GeminiScorer {
    pub fn new(
        endpoint: Option<&str>,
        api_key: &str,
        model: &str,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint
                .unwrap_or(DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            request_timeout,
        }
    }
}

#[async_trait]
impl CallScorer for GeminiScorer {
    async fn score(
        &self,
        transcript: &str,
        _words: &[WordTimestamp],
    ) -> Result<CallScore, CallScorerError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(transcript),
                }],
            }],
        };

        tracing::debug!(model = %self.model, chars = transcript.len(), "Requesting call scoring");

        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallScorerError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CallScorerError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| CallScorerError::ApiRequestFailed(format!("parse response: {}", e)))?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        parse_score_reply(text)
    }
}

/// Parse the model's free-text reply. The raw payload is logged on parse
/// failures so malformed replies can be diagnosed after the fact.
pub(crate) fn parse_score_reply(text: &str) -> Result<CallScore, CallScorerError> {
    let json = match extract_json_object(text) {
        Some(json) => json,
        None => {
            tracing::error!(raw = %text, "Model reply contains no JSON object");
            return Err(CallScorerError::Parse(text.to_string()));
        }
    };

    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(raw = %text, error = %e, "Model reply JSON is invalid");
            return Err(CallScorerError::Parse(text.to_string()));
        }
    };

    let criteria_value = value
        .get("criteriosGPT")
        .cloned()
        .ok_or_else(|| CallScorerError::MalformedCriteria("criteriosGPT missing".to_string()))?;
    let criteria: QualityCriteria = serde_json::from_value(criteria_value)
        .map_err(|e| CallScorerError::MalformedCriteria(e.to_string()))?;

    let emotion = value
        .get("emotion")
        .and_then(|v| serde_json::from_value::<Emotion>(v.clone()).ok());
    let nuance = value
        .get("nuance")
        .and_then(|v| serde_json::from_value::<Nuance>(v.clone()).ok());

    Ok(CallScore {
        criteria,
        score: value.get("pontuacaoGPT").and_then(|v| v.as_f64()),
        confidence: value
            .get("confianca")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0),
        critical_words: string_list(value.get("palavrasCriticas")),
        rationale: string_list(value.get("calculoDetalhado")),
        analysis: value
            .get("analiseGPT")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        emotion,
        nuance,
    })
}

/// First `{` through last `}`, the same slice rule the console has always
/// applied to model replies.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn build_prompt(transcript: &str) -> String {
    format!(
        r#"Analise a seguinte transcrição de uma ligação de atendimento e forneça:

1. ANÁLISE DE EMOÇÃO E NUANCE: tom de voz, nível de empatia, clareza na comunicação, profissionalismo, pontos de tensão.

2. AVALIAÇÃO DOS CRITÉRIOS DE QUALIDADE (true ou false para cada um):
   - saudacaoAdequada: O colaborador cumprimentou adequadamente?
   - escutaAtiva: Demonstrou escuta ativa e fez perguntas relevantes?
   - clarezaObjetividade: Foi claro e objetivo na comunicação?
   - resolucaoQuestao: Resolveu a questão seguindo procedimentos?
   - dominioAssunto: Demonstrou conhecimento sobre o assunto?
   - empatiaCordialidade: Demonstrou empatia e cordialidade?
   - direcionouPesquisa: Direcionou para pesquisa de satisfação?
   - procedimentoIncorreto: Repassou informação incorreta? (true = negativo)
   - encerramentoBrusco: Encerrou o contato de forma brusca? (true = negativo)

3. PONTUAÇÃO de 0-100 baseada nos critérios: positivos +10 a +25 pontos cada, negativos -60 a -100 pontos cada.

4. PALAVRAS-CHAVE CRÍTICAS: palavras ou frases que indicam problemas.

TRANSCRIÇÃO:
{transcript}

Retorne um JSON com a estrutura:
{{
  "analiseGPT": "Análise completa detalhada",
  "criteriosGPT": {{
    "saudacaoAdequada": boolean,
    "escutaAtiva": boolean,
    "clarezaObjetividade": boolean,
    "resolucaoQuestao": boolean,
    "dominioAssunto": boolean,
    "empatiaCordialidade": boolean,
    "direcionouPesquisa": boolean,
    "procedimentoIncorreto": boolean,
    "encerramentoBrusco": boolean
  }},
  "pontuacaoGPT": number,
  "confianca": number,
  "palavrasCriticas": ["palavra1", "palavra2"],
  "calculoDetalhado": ["explicação1", "explicação2"],
  "emotion": {{"tom": "positivo|neutro|negativo", "empatia": number, "profissionalismo": number}},
  "nuance": {{"clareza": number, "tensao": number}}
}}"#
    )
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}
