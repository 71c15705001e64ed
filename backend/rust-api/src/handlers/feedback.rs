use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::extractors::AppJson;
use crate::middlewares::auth::JwtClaims;
use crate::models::feedback::{
    AdaptiveHintsRequest, AnswerFeedbackRequest, HintLevel, RateFeedbackRequest,
};
use crate::services::{feedback_service::FeedbackService, AppState};

fn service(state: &AppState) -> FeedbackService {
    FeedbackService::new(
        state.mongo.clone(),
        state.redis.clone(),
        state.generator.clone(),
    )
}

pub async fn answer_feedback(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<AnswerFeedbackRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    tracing::info!(
        "Feedback request: user={}, challenge={}",
        claims.sub,
        req.challenge_id
    );

    match service(&state).answer_feedback(&claims.sub, &req).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(e) => {
            tracing::error!("Failed to produce feedback: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn adaptive_hints(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(req): AppJson<AdaptiveHintsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    match service(&state).adaptive_hints(&claims.sub, &req).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(e) => {
            tracing::error!("Failed to produce hints: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn single_hint(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(level): Path<String>,
    AppJson(req): AppJson<AdaptiveHintsRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let level = parse_hint_level(&level).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown hint level: {}", level),
        )
    })?;

    match service(&state).single_hint(&claims.sub, level, &req).await {
        Ok(response) => Ok((StatusCode::OK, Json(response))),
        Err(e) => {
            tracing::error!("Failed to produce hint: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn rate_feedback(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Path(feedback_id): Path<String>,
    AppJson(req): AppJson<RateFeedbackRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match service(&state)
        .rate_feedback(&claims.sub, &feedback_id, req.was_helpful)
        .await
    {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Feedback not found".to_string())),
        Err(e) => {
            tracing::error!("Failed to rate feedback: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn parse_hint_level(s: &str) -> Option<HintLevel> {
    match s {
        "grammar_tip" => Some(HintLevel::GrammarTip),
        "example" => Some(HintLevel::Example),
        "partial_answer" => Some(HintLevel::PartialAnswer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_level_parsing_matches_wire_names() {
        assert_eq!(parse_hint_level("grammar_tip"), Some(HintLevel::GrammarTip));
        assert_eq!(parse_hint_level("example"), Some(HintLevel::Example));
        assert_eq!(
            parse_hint_level("partial_answer"),
            Some(HintLevel::PartialAnswer)
        );
        assert_eq!(parse_hint_level("full_answer"), None);
    }
}
