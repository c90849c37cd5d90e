use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use pathpal_lib::config::DistributorConfig;
use pathpal_lib::distributor::auth::KeyVerifier;
use pathpal_lib::distributor::{self, DistributorState};
use pathpal_lib::pets::{PetRecord, PetStore, PET_CSV_FIELDS};

const SECRET: &str = "endpoint-secret-123";

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(data_dir: &Path, key: Option<&str>) -> DistributorConfig {
    DistributorConfig {
        port: 0,
        data_dir: data_dir.to_path_buf(),
        csv_path: data_dir.join("pets.csv"),
        log_dir: data_dir.join("logs"),
        endpoint_key: key.map(String::from),
    }
}

fn seed(data_dir: &Path) -> PetStore {
    let store = PetStore::new(data_dir.join("pets.csv"));
    store
        .upsert(PetRecord {
            link: "https://www.petfinder.com/dog/brahndi-1/ny/new-york/details/".into(),
            pet_type: "dog".into(),
            name: "Brahndi".into(),
            location: "New York, NY".into(),
            breed: "Pit Bull Terrier, Mix".into(),
            vaccinated: true,
            kids_compatible: true,
            about_me: "Loves people.\nNeeds a yard.".into(),
            ..Default::default()
        })
        .unwrap();
    store
        .upsert(PetRecord {
            link: "https://www.petfinder.com/cat/luna-2/ny/new-york/details/".into(),
            pet_type: "cat".into(),
            name: "Luna".into(),
            ..Default::default()
        })
        .unwrap();
    store
}

async fn server(key: Option<&str>) -> (SocketAddr, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let state = DistributorState::from_config(&config(dir.path(), key));
    (spawn(distributor::router(state)).await, dir)
}

#[tokio::test]
async fn root_and_health_report_running() {
    let (addr, _dir) = server(Some(SECRET)).await;
    for path in ["/", "/health"] {
        let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: Value = resp.json().await.unwrap();
        assert_eq!(v, json!({ "status": "running", "message": "Petfinder Scraper Server" }));
    }
}

#[tokio::test]
async fn csv_requires_the_right_key() {
    let (addr, _dir) = server(Some(SECRET)).await;
    let client = reqwest::Client::new();

    for wrong in ["WRONG", "endpoint-secret-12", "endpoint-secret-1234", ""] {
        let resp = client
            .get(format!("http://{addr}/pets.csv"))
            .query(&[("key", wrong)])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "key {wrong:?}");
        let v: Value = resp.json().await.unwrap();
        assert_eq!(v["error"], "Invalid or missing endpoint key");
    }

    let none = client.get(format!("http://{addr}/pets.csv")).send().await.unwrap();
    assert_eq!(none.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn csv_download_with_query_key() {
    let (addr, _dir) = server(Some(SECRET)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets.csv"))
        .query(&[("key", SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=pets.csv"
    );

    let body = resp.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], PET_CSV_FIELDS.join(","));
    assert_eq!(lines.len(), 3, "one line per pet plus header");
    assert!(lines[1].contains("Loves people.\\nNeeds a yard."));
    assert!(lines[1].contains("\"Pit Bull Terrier, Mix\""));
}

#[tokio::test]
async fn csv_download_with_header_key() {
    let (addr, _dir) = server(Some(SECRET)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets.csv"))
        .header("X-API-Key", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn no_configured_secret_rejects_everything() {
    let (addr, _dir) = server(None).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets.csv"))
        .query(&[("key", SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_csv_serves_empty_body() {
    let dir = tempfile::tempdir().unwrap();
    let state = DistributorState::from_config(&config(dir.path(), Some(SECRET)));
    let addr = spawn(distributor::router(state)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets.csv"))
        .query(&[("key", SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/csv");
    assert_eq!(resp.text().await.unwrap(), "");
}

#[tokio::test]
async fn unreadable_csv_is_500() {
    let dir = tempfile::tempdir().unwrap();
    // Parent is a regular file, so open fails with something other than NotFound.
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    let mut cfg = config(dir.path(), Some(SECRET));
    cfg.csv_path = blocker.join("pets.csv");
    let addr = spawn(distributor::router(DistributorState::from_config(&cfg))).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets.csv"))
        .query(&[("key", SECRET)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = resp.json().await.unwrap();
    assert_eq!(v, json!({ "error": "Failed to read pets data" }));
}

#[tokio::test]
async fn pets_json_lists_records() {
    let (addr, _dir) = server(Some(SECRET)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets"))
        .header("X-API-Key", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v: Value = resp.json().await.unwrap();
    assert_eq!(v["count"], 2);
    assert_eq!(v["pets"][0]["name"], "Brahndi");
    assert_eq!(v["pets"][0]["vaccinated"], "True");
    assert_eq!(v["pets"][1]["pet_type"], "cat");
}

#[tokio::test]
async fn pets_json_without_data() {
    let dir = tempfile::tempdir().unwrap();
    let state = DistributorState::from_config(&config(dir.path(), Some(SECRET)));
    let addr = spawn(distributor::router(state)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets?key={SECRET}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v: Value = resp.json().await.unwrap();
    assert_eq!(v, json!({ "error": "No pets data available", "pets": [] }));
}

#[tokio::test]
async fn pets_json_passes_rows_through() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pets.csv"),
        "link,name,vaccinated,shelter_id\nhttps://example.org/dog/1,Rex,yes,S-9\n",
    )
    .unwrap();
    let state = DistributorState::from_config(&config(dir.path(), Some(SECRET)));
    let addr = spawn(distributor::router(state)).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/pets?key={SECRET}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let v: Value = resp.json().await.unwrap();
    assert_eq!(
        v,
        json!({
            "count": 1,
            "pets": [{
                "link": "https://example.org/dog/1",
                "name": "Rex",
                "vaccinated": "yes",
                "shelter_id": "S-9"
            }]
        })
    );
}

/// Verifiers are pluggable; the routes never look at the secret themselves.
struct PrefixVerifier;

impl KeyVerifier for PrefixVerifier {
    fn verify(&self, presented: &str) -> bool {
        presented.starts_with("team-")
    }
}

#[tokio::test]
async fn custom_verifier_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let store = seed(dir.path());
    let state = DistributorState::new(store, Arc::new(PrefixVerifier));
    let addr = spawn(distributor::router(state)).await;
    let client = reqwest::Client::new();

    let ok = client
        .get(format!("http://{addr}/pets.csv?key=team-alpha"))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let denied = client
        .get(format!("http://{addr}/pets.csv?key={SECRET}"))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
}
