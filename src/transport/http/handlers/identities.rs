use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/identities/{alias}",
    params(("alias" = String, Path, description = "Registered alias")),
    responses(
        (status = 200, description = "IdentityRecord for the alias", body = ApiResponse),
        (status = 404, description = "Alias is not registered", body = ApiResponse),
        (status = 502, description = "RPC node rejected the lookup", body = ApiResponse)
    )
)]
pub async fn get_identity_handler(
    State(state): State<AppState>,
    Path(alias): Path<String>,
) -> impl IntoResponse {
    respond(state.client.fetch_identity(&alias).await)
}

#[utoipa::path(
    get,
    path = "/api/owners/{owner}/identities",
    params(("owner" = String, Path, description = "Owner public key (base58)")),
    responses(
        (status = 200, description = "IdentityRecords owned by the key, unordered", body = ApiResponse),
        (status = 400, description = "Owner is not a valid public key", body = ApiResponse)
    )
)]
pub async fn list_owner_identities_handler(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> impl IntoResponse {
    respond(state.client.list_identities_by_owner(&owner).await)
}
