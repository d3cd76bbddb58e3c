// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use scorekeeper_kernel::catalog::{categories, TranslationQuery, WordQuery};
use scorekeeper_kernel::ScoreSubmission;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::errors::ApiError;
use crate::state::AppState;
use crate::telemetry;

/// Mounts the API under every prefix in `prefixes` (`""` is the root) and `/metrics`
/// at the root.
pub fn build_router(state: AppState, prefixes: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/game/score", post(submit_score))
        .route("/game/leaderboard", get(leaderboard))
        .route("/game/words/:category/:round", get(words))
        .route("/game/categories", get(list_categories))
        .route("/game/translation/:word_id", get(translation))
        .with_state(state);

    let mut app = Router::new();
    let mut mounted: Vec<&str> = Vec::new();
    for prefix in prefixes {
        let prefix = prefix.trim_end_matches('/');
        if mounted.contains(&prefix) {
            continue;
        }
        mounted.push(prefix);
        app = if prefix.is_empty() {
            app.merge(api.clone())
        } else {
            app.nest(prefix, api.clone())
        };
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    app.route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Runs store reads on the blocking pool. Only the calling request sees a timeout.
async fn run_blocking<T, F>(timeout: Duration, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(joined) => joined_outcome(joined),
        Err(_) => {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "request timed out");
            Err(ApiError::Timeout)
        }
    }
}

/// Runs a store write on the blocking pool and always reports its real outcome.
///
/// A started write cannot be cancelled, so past `timeout` the request keeps waiting
/// instead of answering 504 for a write that may still commit.
async fn run_write<T, F>(timeout: Duration, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    let started = Instant::now();
    let mut handle = tokio::task::spawn_blocking(f);
    let joined = match tokio::time::timeout(timeout, &mut handle).await {
        Ok(joined) => joined,
        Err(_) => {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "write exceeded request timeout, waiting for its outcome"
            );
            let joined = handle.await;
            tracing::warn!(elapsed_ms = started.elapsed().as_millis() as u64, "slow write finished");
            joined
        }
    };
    joined_outcome(joined)
}

fn joined_outcome<T>(joined: Result<Result<T, ApiError>, tokio::task::JoinError>) -> Result<T, ApiError> {
    joined.unwrap_or_else(|join_err| {
        tracing::error!(error = %join_err, "blocking task failed");
        Err(ApiError::internal("Internal server error"))
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

async fn metrics() -> String {
    telemetry::render_metrics()
}

async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<Json<SubmitScoreResponse>, ApiError> {
    let Json(submission) = payload.map_err(|e| {
        tracing::info!(error = %e.body_text(), "malformed score submission");
        metrics::counter!("scorekeeper_scores_rejected_total", 1);
        ApiError::from(e)
    })?;

    let orchestrator = state.orchestrator.clone();
    let receipt = run_write(state.request_timeout, move || {
        let result = orchestrator.submit(&submission);
        telemetry::record_submission(&result);
        result.map_err(ApiError::from)
    })
    .await?;

    Ok(Json(SubmitScoreResponse {
        message: "Score submitted successfully".to_string(),
        data: receipt.event.into(),
    }))
}

async fn leaderboard(State(state): State<AppState>) -> Result<Json<LeaderboardResponse>, ApiError> {
    let rankings = state.rankings.clone();
    let size = state.leaderboard_size;

    let view = run_blocking(state.request_timeout, move || {
        let started = Instant::now();
        let view = rankings.build_top_n(size).map_err(|e| {
            tracing::error!(error = %e, "failed to fetch leaderboard");
            ApiError::internal("Failed to fetch leaderboard")
        })?;
        telemetry::record_leaderboard_build(started.elapsed());
        Ok(view)
    })
    .await?;

    tracing::debug!(entries = view.len(), "returning leaderboard");
    Ok(Json(LeaderboardResponse {
        leaderboard: view.entries.into_iter().map(LeaderboardRow::from).collect(),
    }))
}

async fn words(
    State(state): State<AppState>,
    Path((category, round)): Path<(String, String)>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<WordsResponse>, ApiError> {
    let query = WordQuery::parse(&category, &round, params.language.as_deref())?;

    let catalog = state.words.clone();
    let lookup = query.clone();
    let words = run_blocking(state.request_timeout, move || {
        catalog.words(&lookup).map_err(|e| {
            tracing::error!(
                category = %lookup.category,
                round = lookup.round,
                language = %lookup.language,
                error = %e,
                "failed to fetch words"
            );
            ApiError::internal("Failed to fetch words")
        })
    })
    .await?;

    tracing::debug!(count = words.len(), category = %query.category, round = query.round, "fetched words");
    Ok(Json(WordsResponse {
        words,
        category: query.category,
        round: query.round,
        language: query.language,
    }))
}

async fn list_categories(Query(params): Query<LanguageParams>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: categories(params.language.as_deref()),
    })
}

async fn translation(
    State(state): State<AppState>,
    Path(word_id): Path<String>,
    Query(params): Query<LanguageParams>,
) -> Result<Json<TranslationResponse>, ApiError> {
    let query = TranslationQuery::parse(&word_id, params.language.as_deref())?;

    let lookup = state.translations.clone();
    let key = query.clone();
    let found = run_blocking(state.request_timeout, move || {
        lookup.translation(&key).map_err(|e| {
            tracing::error!(word_id = %key.word_id, language = %key.language, error = %e, "failed to fetch translation");
            ApiError::internal("Failed to fetch translation")
        })
    })
    .await?;

    match found {
        Some(translation) => Ok(Json(TranslationResponse {
            translation,
            word_id: query.word_id,
            language: query.language,
        })),
        None => Err(ApiError::NotFound("Translation not found".to_string())),
    }
}
