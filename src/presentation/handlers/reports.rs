use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::presentation::state::AppState;

use super::error::ApiError;
use super::result::AnalysisResultResponse;

#[derive(Deserialize)]
pub struct AgentAverageQuery {
    #[serde(rename = "dateStart")]
    pub date_start: Option<String>,
    #[serde(rename = "dateEnd")]
    pub date_end: Option<String>,
}

#[derive(Serialize)]
pub struct AgentAverageResponse {
    pub average: Option<f64>,
    #[serde(rename = "sampleCount")]
    pub sample_count: usize,
}

#[tracing::instrument(skip(state, query))]
pub async fn agent_average_handler(
    State(state): State<AppState>,
    Path(agent_name): Path<String>,
    Query(query): Query<AgentAverageQuery>,
) -> Result<Json<AgentAverageResponse>, ApiError> {
    let date_start = parse_date(query.date_start.as_deref(), "dateStart")?;
    let date_end = parse_date(query.date_end.as_deref(), "dateEnd")?;

    let average = state
        .report_service
        .agent_average(&agent_name, date_start, date_end)
        .await?;

    Ok(Json(AgentAverageResponse {
        average: average.average,
        sample_count: average.sample_count,
    }))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                ApiError::BadRequest(format!("{} must be a YYYY-MM-DD date, got {}", field, raw))
            }),
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "agentName")]
    pub agent_name: Option<String>,
    pub month: Option<String>,
    pub year: Option<i32>,
}

#[tracing::instrument(skip(state, query))]
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisResultResponse>>, ApiError> {
    let agent_name = query
        .agent_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("agentName is required".to_string()))?;

    let results = state
        .report_service
        .list_by_agent(agent_name, query.month.as_deref(), query.year)
        .await?;

    Ok(Json(results.into_iter().map(Into::into).collect()))
}
