pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod metrics;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use store::DocumentStore;
use suggest::Suggester;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::metrics::Metrics;

pub struct AppState {
    pub store: DocumentStore,
    pub suggester: Arc<dyn Suggester>,
    pub metrics: Metrics,
    /// Directory scanned by `POST /bootstrap`.
    pub raw_dir: PathBuf,
}

impl AppState {
    pub fn new(store: DocumentStore, suggester: Arc<dyn Suggester>, raw_dir: PathBuf) -> Self {
        Self {
            store,
            suggester,
            metrics: Metrics::new(),
            raw_dir,
        }
    }
}

pub type SharedState = Arc<AppState>;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/vocab", get(handlers::vocabulary))
        .route("/bootstrap", post(handlers::bootstrap))
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route("/documents/:id", get(handlers::get_document))
        .route("/documents/:id/entities", post(handlers::add_entity))
        .route(
            "/documents/:id/entities/:entity_id",
            delete(handlers::delete_entity),
        )
        .route("/documents/:id/relations", post(handlers::add_relation))
        .route(
            "/documents/:id/relations/:relation_id",
            delete(handlers::delete_relation),
        )
        .route("/documents/:id/status", patch(handlers::set_status))
        .route("/documents/:id/export", get(handlers::export_document))
        .route("/export/all", get(handlers::export_all))
        .route("/export/entities.csv", get(handlers::export_entities_csv))
        .route("/export/relations.csv", get(handlers::export_relations_csv))
        .route("/import", post(handlers::import_document))
        .route("/save/all", post(handlers::save_all))
        .route("/suggest/entities", get(handlers::suggest_entities))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
