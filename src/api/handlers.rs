use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{
        header::{ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};

use crate::bridge::ask_with_timeout;
use crate::AppState;

use super::error::ApiError;
use super::models::{AskQuery, AskResponse, ErrorResponse};

/// GET / and GET /ask: question and session id come from the query string.
pub async fn ask_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AskQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    answer(&state, query).await
}

/// POST /ask with a JSON body.
pub async fn ask_json(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AskQuery>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(query) = body?;
    answer(&state, query).await
}

async fn answer(state: &AppState, query: AskQuery) -> Result<Response, ApiError> {
    let question = query.question.as_deref().unwrap_or_default().trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest(
            "Parameter \"question\" must be a non-empty string".to_string(),
        ));
    }
    let session_id = query.session_id();

    tracing::info!(
        question_len = question.len(),
        has_session = session_id.is_some(),
        "forwarding question to knowledge base"
    );

    let answer = ask_with_timeout(
        state.generator.as_ref(),
        question,
        session_id,
        state.timeout_ms,
    )
    .await
    .inspect_err(|err| tracing::error!(error = %err, "retrieve and generate failed"))?;

    tracing::info!(
        session_id = %answer.session_id,
        citations = answer.citations,
        "answer generated"
    );

    let body = AskResponse {
        question: question.to_string(),
        answer: answer.text.trim().to_string(),
        session_id: answer.session_id,
    };

    Ok((
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
        ],
        Json(body),
    )
        .into_response())
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}
