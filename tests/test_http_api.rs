//! Read-only HTTP API served over the in-memory ledger.

mod common;

use common::{read_only_client, signing_client, MockLedger};
use serde_json::Value;
use solana_sdk::signer::Signer;
use std::sync::Arc;
use vvallet_client::{transport, UnsignedPolicy};

/// Serves the API on an ephemeral port and returns its base URL.
async fn serve(ledger: &Arc<MockLedger>) -> Result<String, Box<dyn std::error::Error>> {
    let state = transport::http::AppState {
        client: Arc::new(read_only_client(ledger, UnsignedPolicy::Reject)),
    };
    let router = transport::http::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://{}", addr))
}

async fn get(url: &str) -> Result<(u16, Value), Box<dyn std::error::Error>> {
    let resp = reqwest::get(url).await?;
    let status = resp.status().as_u16();
    Ok((status, resp.json::<Value>().await?))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn lookups_return_record_shapes() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = MockLedger::new();
    let (writer, owner) = signing_client(&ledger);
    writer.register_identity("satoshi").await?;
    let proof_id = writer
        .register_proof("twitter", "https://x.com/satoshi")
        .await?
        .expect("signed")
        .pubkey()
        .to_string();
    let base = serve(&ledger).await?;

    let (status, body) = get(&format!("{}/api/identities/satoshi", base)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!({ "owner": owner, "alias": "satoshi" }));

    let (status, body) = get(&format!("{}/api/owners/{}/identities", base, owner)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body) = get(&format!("{}/api/proofs/{}", base, proof_id)).await?;
    assert_eq!(status, 200);
    assert_eq!(
        body["data"],
        serde_json::json!({
            "id": proof_id,
            "owner": owner,
            "kind": "twitter",
            "proof": "https://x.com/satoshi",
        })
    );

    let (status, body) = get(&format!("{}/api/owners/{}/proofs", base, owner)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["id"], proof_id);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn errors_map_to_status_codes() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = MockLedger::new();
    let base = serve(&ledger).await?;

    let (status, body) = get(&format!("{}/api/identities/nobody", base)).await?;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap_or_default().contains("AccountNotFound"));

    let (status, _) = get(&format!("{}/api/proofs/not-a-key", base)).await?;
    assert_eq!(status, 400);

    let stranger = solana_sdk::pubkey::Pubkey::new_unique();
    let (status, body) = get(&format!("{}/api/owners/{}/proofs", base, stranger)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::json!([]));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_tracks_rpc_reachability() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = MockLedger::new();
    let base = serve(&ledger).await?;

    let (status, body) = get(&format!("{}/health", base)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "ok");

    ledger.set_offline(true);
    let (status, body) = get(&format!("{}/health", base)).await?;
    assert_eq!(status, 503);
    assert_eq!(body["data"]["status"], "unhealthy");

    let (status, _) = get(&format!("{}/api/identities/satoshi", base)).await?;
    assert_eq!(status, 502);
    Ok(())
}
