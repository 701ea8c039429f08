use axum::{
    extract::{FromRequest, FromRequestParts, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use schema::{Document, DocumentSummary, Entity, Relation, Vocabulary};
use serde::{Deserialize, Serialize};
use store::{NewDocument, NewEntity, NewRelation, StoreStats};
use suggest::Suggestion;

use crate::error::ApiError;
use crate::export;
use crate::metrics::{MetricsSnapshot, TimedOperation};
use crate::SharedState;

type ApiResult<T> = Result<T, ApiError>;

/// `Json` body extractor whose failures use the `{code, message}` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose failures use the `{code, message}` error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct StatsResponse {
    store: StoreStats,
    metrics: MetricsSnapshot,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    deleted: usize,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: String,
}

#[derive(Serialize)]
pub struct ImportResponse {
    status: &'static str,
    document_id: String,
}

#[derive(Serialize)]
pub struct SaveAllResponse {
    status: &'static str,
    count: usize,
}

#[derive(Deserialize)]
pub struct SuggestQuery {
    doc_id: String,
}

#[derive(Serialize)]
pub struct SuggestResponse {
    document_id: String,
    suggestions: Vec<Suggestion>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn stats(State(state): State<SharedState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        store: state.store.stats(),
        metrics: state.metrics.snapshot(),
    })
}

pub async fn vocabulary(State(state): State<SharedState>) -> Json<Vocabulary> {
    Json(state.store.vocabulary().clone())
}

pub async fn bootstrap(State(state): State<SharedState>) -> ApiResult<Json<Vec<Document>>> {
    let timer = TimedOperation::start();
    let sources = ingest::ingest_directory(&state.raw_dir).await?;
    let docs = state.store.bootstrap(&sources)?;
    state.metrics.record_bootstrap(timer.elapsed(), docs.len());
    Ok(Json(docs))
}

pub async fn list_documents(State(state): State<SharedState>) -> Json<Vec<DocumentSummary>> {
    Json(state.store.list_documents())
}

pub async fn create_document(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<NewDocument>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let doc = state.metrics.track(state.store.create_document(req))?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn get_document(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    Ok(Json(state.store.get_document(&id)?))
}

pub async fn add_entity(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewEntity>,
) -> ApiResult<(StatusCode, Json<Entity>)> {
    let entity = state.metrics.track(state.store.add_entity(&id, req))?;
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn delete_entity(
    State(state): State<SharedState>,
    Path((id, entity_id)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.metrics.track(state.store.delete_entity(&id, &entity_id))?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn add_relation(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewRelation>,
) -> ApiResult<(StatusCode, Json<Relation>)> {
    let relation = state.metrics.track(state.store.add_relation(&id, req))?;
    Ok((StatusCode::CREATED, Json(relation)))
}

pub async fn delete_relation(
    State(state): State<SharedState>,
    Path((id, relation_id)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state
        .metrics
        .track(state.store.delete_relation(&id, &relation_id))?;
    Ok(Json(DeleteResponse { deleted }))
}

pub async fn set_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdate>,
) -> ApiResult<Json<Document>> {
    let doc = state.metrics.track(state.store.set_status(&id, &req.status))?;
    Ok(Json(doc))
}

pub async fn export_document(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    Ok(Json(state.store.export(&id)?))
}

pub async fn export_all(State(state): State<SharedState>) -> Json<Vec<Document>> {
    Json(state.store.all_documents())
}

pub async fn export_entities_csv(
    State(state): State<SharedState>,
) -> ApiResult<impl IntoResponse> {
    let csv = export::entities_csv(&state.store.all_documents())?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

pub async fn export_relations_csv(
    State(state): State<SharedState>,
) -> ApiResult<impl IntoResponse> {
    let csv = export::relations_csv(&state.store.all_documents())?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

pub async fn import_document(
    State(state): State<SharedState>,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> ApiResult<Json<ImportResponse>> {
    let doc = state.metrics.track(state.store.import_document(body))?;
    Ok(Json(ImportResponse {
        status: "imported",
        document_id: doc.id,
    }))
}

pub async fn save_all(State(state): State<SharedState>) -> ApiResult<Json<SaveAllResponse>> {
    let count = state.store.save_all()?;
    Ok(Json(SaveAllResponse {
        status: "saved",
        count,
    }))
}

pub async fn suggest_entities(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<SuggestQuery>,
) -> ApiResult<Json<SuggestResponse>> {
    let timer = TimedOperation::start();
    let doc = state.store.get_document(&query.doc_id)?;
    let suggestions = suggest::suggest_entities(state.suggester.as_ref(), &doc);

    state.metrics.record_suggest(timer.elapsed(), suggestions.len());
    tracing::info!(doc_id = %doc.id, count = suggestions.len(), "Served entity suggestions");

    Ok(Json(SuggestResponse {
        document_id: doc.id,
        suggestions,
    }))
}
