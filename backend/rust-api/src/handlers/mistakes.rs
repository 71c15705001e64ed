use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::middlewares::auth::JwtClaims;
use crate::models::feedback::HistoryQuery;
use crate::services::{
    feedback_service::FeedbackService, mistake_service::MistakeService, AppState,
};

pub async fn history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = MistakeService::new(state.mongo.clone());

    match service.history(&claims.sub, query.limit).await {
        Ok(records) => Ok((StatusCode::OK, Json(records))),
        Err(e) => {
            tracing::error!("Failed to fetch mistake history: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn weaknesses(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = MistakeService::new(state.mongo.clone());

    match service.weaknesses(&claims.sub).await {
        Ok(weaknesses) => Ok((StatusCode::OK, Json(weaknesses))),
        Err(e) => {
            tracing::error!("Failed to fetch weaknesses: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn confusing_words(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = MistakeService::new(state.mongo.clone());

    match service.confusing_pairs(&claims.sub).await {
        Ok(pairs) => Ok((StatusCode::OK, Json(pairs))),
        Err(e) => {
            tracing::error!("Failed to fetch confusing pairs: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = MistakeService::new(state.mongo.clone());

    match service.statistics(&claims.sub).await {
        Ok(stats) => Ok((StatusCode::OK, Json(stats))),
        Err(e) => {
            tracing::error!("Failed to compute statistics: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = FeedbackService::new(
        state.mongo.clone(),
        state.redis.clone(),
        state.generator.clone(),
    );

    match service.improvement_suggestions(&claims.sub).await {
        Ok(suggestions) => Ok((StatusCode::OK, Json(suggestions))),
        Err(e) => {
            tracing::error!("Failed to build improvement suggestions: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
