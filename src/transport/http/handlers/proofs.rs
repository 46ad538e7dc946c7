use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/proofs/{id}",
    params(("id" = String, Path, description = "Proof account public key (base58)")),
    responses(
        (status = 200, description = "ProofRecord", body = ApiResponse),
        (status = 400, description = "Id is not a valid public key", body = ApiResponse),
        (status = 404, description = "No proof with that id", body = ApiResponse)
    )
)]
pub async fn get_proof_handler(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    respond(state.client.fetch_proof(&id).await)
}

#[utoipa::path(
    get,
    path = "/api/owners/{owner}/proofs",
    params(("owner" = String, Path, description = "Owner public key (base58)")),
    responses(
        (status = 200, description = "ProofRecords owned by the key, unordered", body = ApiResponse),
        (status = 400, description = "Owner is not a valid public key", body = ApiResponse)
    )
)]
pub async fn list_owner_proofs_handler(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> impl IntoResponse {
    respond(state.client.fetch_proofs_by_owner(&owner).await)
}
