//! Request handlers for `/api/facts`.
//!
//! Handlers validate input, hop onto the blocking pool for storage calls and
//! map domain outcomes to status codes. No business logic lives here.
//! Extractor rejections are taken as values so they share the JSON error body.

use crate::error::ApiError;
use crate::state::AppState;
use awesomefacts_core::{core_version, Fact, FactDraft, FactId, FactRepository};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use log::info;
use serde::Serialize;

pub const FACTS_BASE_PATH: &str = "/api/facts";

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: core_version(),
    })
}

pub async fn list_facts<R>(State(state): State<AppState<R>>) -> Result<Json<Vec<Fact>>, ApiError>
where
    R: FactRepository + Send + 'static,
{
    let facts = state.call(|service| service.list_facts()).await?;
    Ok(Json(facts))
}

pub async fn get_fact<R>(
    State(state): State<AppState<R>>,
    id: Result<Path<FactId>, PathRejection>,
) -> Result<Json<Fact>, ApiError>
where
    R: FactRepository + Send + 'static,
{
    let Path(id) = id?;
    state
        .call(move |service| service.get_fact(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub async fn create_fact<R>(
    State(state): State<AppState<R>>,
    draft: Result<Json<FactDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    R: FactRepository + Send + 'static,
{
    let Json(draft) = draft?;
    draft.validate()?;
    let fact = state
        .call(move |service| service.create_fact(&draft))
        .await?;

    info!("event=fact_created module=api status=ok id={}", fact.id);
    let location = format!("{FACTS_BASE_PATH}/{}", fact.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(fact)))
}

pub async fn update_fact<R>(
    State(state): State<AppState<R>>,
    id: Result<Path<FactId>, PathRejection>,
    draft: Result<Json<FactDraft>, JsonRejection>,
) -> Result<Json<Fact>, ApiError>
where
    R: FactRepository + Send + 'static,
{
    let Path(id) = id?;
    let Json(draft) = draft?;
    draft.validate()?;
    let updated = state
        .call(move |service| service.update_fact(id, &draft))
        .await?
        .ok_or(ApiError::NotFound(id))?;

    info!("event=fact_updated module=api status=ok id={id}");
    Ok(Json(updated))
}

pub async fn delete_fact<R>(
    State(state): State<AppState<R>>,
    id: Result<Path<FactId>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
    R: FactRepository + Send + 'static,
{
    let Path(id) = id?;
    if !state.call(move |service| service.delete_fact(id)).await? {
        return Err(ApiError::NotFound(id));
    }

    info!("event=fact_deleted module=api status=ok id={id}");
    Ok(StatusCode::NO_CONTENT)
}
