//! API request handlers

use crate::contact::ContactForm;
use crate::error::{ApiError, Result};
use crate::SharedState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        ConnectInfo, Path, Query, State,
    },
    http::{Extensions, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use devfolio_collector::RepoSort;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Most repositories a client may ask for in one listing
const MAX_LISTING: u32 = 50;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn err(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                success: false,
                data: None,
                error: Some(message.into()),
            }),
        )
    }
}

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "DevFolio API" }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ==================== GitHub ====================

pub async fn github_user(State(state): State<SharedState>) -> Result<impl IntoResponse> {
    state
        .aggregator
        .user_info()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("GitHub user not found".to_string()))
}

#[derive(Deserialize)]
pub struct RepositoryQuery {
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    sort: RepoSort,
}

fn default_limit() -> u32 {
    10
}

pub async fn github_repositories(
    State(state): State<SharedState>,
    query: std::result::Result<Query<RepositoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if query.limit > MAX_LISTING {
        return Err(ApiError::BadRequest(format!(
            "Limit cannot exceed {}",
            MAX_LISTING
        )));
    }

    Ok(Json(state.aggregator.repositories(query.limit, query.sort).await))
}

pub async fn github_featured(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.aggregator.featured().await)
}

pub async fn github_stats(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.aggregator.stats().await)
}

// ==================== Contact ====================

pub async fn submit_contact(
    State(state): State<SharedState>,
    extensions: Extensions,
    form: std::result::Result<Json<ContactForm>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(form) = form.map_err(|e| ApiError::Validation(e.body_text()))?;
    form.validate()?;

    // Only present when served with connect info
    let ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    Ok(Json(state.contact.submit(form, ip).await))
}

#[derive(Deserialize)]
pub struct MessagesQuery {
    #[serde(default = "default_page")]
    limit: i64,
    #[serde(default)]
    skip: i64,
}

fn default_page() -> i64 {
    50
}

/// List contact messages (admin endpoint)
pub async fn contact_messages(
    State(state): State<SharedState>,
    query: std::result::Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.contact.messages(query.limit, query.skip).await))
}

#[derive(Serialize)]
struct Marked {
    id: String,
    status: &'static str,
}

pub async fn mark_message_read(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    if !state.contact.mark_read(&id).await {
        return Err(ApiError::NotFound(format!("Message not found: {}", id)));
    }

    Ok(ApiResponse::ok(Marked { id, status: "read" }))
}

pub async fn contact_stats(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.contact.stats().await)
}

// ==================== Portfolio ====================

pub async fn portfolio(State(state): State<SharedState>) -> impl IntoResponse {
    let projects = state.aggregator.featured().await;
    Json(state.portfolio.with_projects(projects))
}
