//! HTTP API for the dashboard
//!
//! `GET /api/compare` runs the pipeline and returns a response tagged by
//! `status`; every pipeline outcome, including the failure outcomes, is a
//! 200 with its user-facing message, since they are expected terminal states
//! rather than server errors. Only unparseable date parameters are rejected,
//! and those fold into the same passive prompt the pipeline produces for a
//! malformed range.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compare::{ComparisonResult, ComparisonRow};
use crate::config::DefaultsConfig;
use crate::models::DateRange;
use crate::pipeline::{City, CompareInput, Pipeline, RunOutcome};

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub defaults: DefaultsConfig,
}

/// Create the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/compare", get(get_compare))
        .route("/defaults", get(get_defaults))
        .with_state(state)
}

/// Query parameters for `GET /api/compare`
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    #[serde(default)]
    pub city_a: String,
    #[serde(default)]
    pub city_b: String,
    /// ISO date, `YYYY-MM-DD`
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Response for `GET /api/compare`, tagged by terminal outcome
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompareResponse {
    Ready {
        message: String,
        #[serde(flatten)]
        comparison: ComparisonDto,
    },
    Prompt {
        message: String,
    },
    LocationError {
        message: String,
        /// `"a"` or `"b"`
        city: String,
    },
    NoData {
        message: String,
        timed_out: bool,
    },
    AlignmentError {
        message: String,
    },
}

/// Chart-and-table payload for a ready comparison
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonDto {
    pub city_a: String,
    pub city_b: String,
    pub mean_a: f64,
    pub mean_b: f64,
    pub rows: Vec<RowDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RowDto {
    pub date: String,
    pub temp_a: f64,
    pub temp_b: f64,
}

/// Response for `GET /api/defaults`
#[derive(Debug, Serialize, Deserialize)]
pub struct DefaultsResponse {
    pub city_a: String,
    pub city_b: String,
    pub start: String,
    pub end: String,
    /// Latest selectable date (today)
    pub max_date: String,
}

async fn get_compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Json<CompareResponse> {
    info!(
        "Compare request: '{}' vs '{}' ({:?}..{:?})",
        query.city_a, query.city_b, query.start, query.end
    );

    let (start, end) = match (parse_date(&query.start), parse_date(&query.end)) {
        (Ok(start), Ok(end)) => (start, end),
        // Unparseable dates are half-typed input, handled like a missing range
        _ => return Json(prompt_response()),
    };

    let input = CompareInput {
        city_a: query.city_a,
        city_b: query.city_b,
        start,
        end,
    };

    let outcome = state.pipeline.run(&input).await;
    Json(to_response(outcome))
}

async fn get_defaults(State(state): State<AppState>) -> Json<DefaultsResponse> {
    let range = DateRange::last_days(i64::from(state.defaults.range_days));
    Json(DefaultsResponse {
        city_a: state.defaults.city_a.clone(),
        city_b: state.defaults.city_b.clone(),
        start: range.start.format("%Y-%m-%d").to_string(),
        end: range.end.format("%Y-%m-%d").to_string(),
        max_date: range.end.format("%Y-%m-%d").to_string(),
    })
}

fn parse_date(value: &Option<String>) -> Result<Option<NaiveDate>, chrono::ParseError> {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
}

fn prompt_response() -> CompareResponse {
    CompareResponse::Prompt {
        message: RunOutcome::Prompt.user_message(),
    }
}

fn to_response(outcome: RunOutcome) -> CompareResponse {
    let message = outcome.user_message();
    match outcome {
        RunOutcome::Prompt => CompareResponse::Prompt { message },
        RunOutcome::LocationError { city, .. } => CompareResponse::LocationError {
            message,
            city: match city {
                City::A => "a".to_string(),
                City::B => "b".to_string(),
            },
        },
        RunOutcome::NoData { timed_out } => CompareResponse::NoData { message, timed_out },
        RunOutcome::AlignmentError { .. } => CompareResponse::AlignmentError { message },
        RunOutcome::Ready(result) => CompareResponse::Ready {
            message,
            comparison: to_dto(result),
        },
    }
}

fn to_dto(result: ComparisonResult) -> ComparisonDto {
    ComparisonDto {
        city_a: result.city_a,
        city_b: result.city_b,
        mean_a: result.mean_a,
        mean_b: result.mean_b,
        rows: result.rows.iter().map(to_row_dto).collect(),
    }
}

fn to_row_dto(row: &ComparisonRow) -> RowDto {
    RowDto {
        date: row.date.format("%Y-%m-%d").to_string(),
        temp_a: row.temp_a,
        temp_b: row.temp_b,
    }
}
