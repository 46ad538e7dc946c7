use crate::domain::records::{IdentityRecord, ProofRecord};
use crate::transport::http::handlers::{health, identities, proofs};
use crate::transport::http::types::ApiResponse;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        identities::get_identity_handler,
        identities::list_owner_identities_handler,
        proofs::get_proof_handler,
        proofs::list_owner_proofs_handler
    ),
    components(schemas(ApiResponse, IdentityRecord, ProofRecord))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/identities/:alias", get(identities::get_identity_handler))
        .route(
            "/api/owners/:owner/identities",
            get(identities::list_owner_identities_handler),
        )
        .route("/api/owners/:owner/proofs", get(proofs::list_owner_proofs_handler))
        .route("/api/proofs/:id", get(proofs::get_proof_handler))
        .with_state(app_state)
}
