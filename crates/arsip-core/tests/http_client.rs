//! Wire-contract tests for the HTTP archive client
//!
//! Runs the client and the synchronization store against a small axum
//! backend that mimics the `/arsip/` REST collection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use arsip_core::{
    ArchiveApi, ArchiveId, ArchiveInput, ArchiveStore, HttpArchiveClient, ListQuery,
    TransportError,
};

#[derive(Default)]
struct Backend {
    records: Vec<Value>,
    next_id: u64,
    last_query: HashMap<String, String>,
}

type Db = Arc<Mutex<Backend>>;

type ApiError = (StatusCode, Json<Value>);

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
}

fn validate(body: &Value) -> Result<(), ApiError> {
    let blank = body
        .get("nama")
        .and_then(Value::as_str)
        .map(|s| s.trim().is_empty())
        .unwrap_or(true);
    if blank {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"nama": ["This field may not be blank."]})),
        ));
    }
    Ok(())
}

async fn list(State(db): State<Db>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut backend = db.lock().unwrap();
    backend.last_query = params;
    Json(Value::Array(backend.records.clone()))
}

async fn create(
    State(db): State<Db>,
    Json(mut body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate(&body)?;
    let mut backend = db.lock().unwrap();
    backend.next_id += 1;
    body["id"] = json!(backend.next_id);
    backend.records.push(body.clone());
    Ok((StatusCode::CREATED, Json(body)))
}

async fn update(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    validate(&body)?;
    let mut backend = db.lock().unwrap();
    let slot = backend
        .records
        .iter_mut()
        .find(|r| r["id"] == json!(id))
        .ok_or_else(not_found)?;
    body["id"] = json!(id);
    *slot = body.clone();
    Ok(Json(body))
}

async fn remove(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, ApiError> {
    let mut backend = db.lock().unwrap();
    let before = backend.records.len();
    backend.records.retain(|r| r["id"] != json!(id));
    if backend.records.len() == before {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Start the fake backend and return its base URL
async fn spawn_backend(records: Vec<Value>) -> (String, Db) {
    let next_id = records
        .iter()
        .filter_map(|r| r["id"].as_u64())
        .max()
        .unwrap_or(0);
    let db: Db = Arc::new(Mutex::new(Backend {
        records,
        next_id,
        last_query: HashMap::new(),
    }));

    let app = Router::new()
        .route("/api/arsip/", get(list).post(create))
        .route("/api/arsip/{id}/", axum::routing::put(update).delete(remove))
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), db)
}

fn seed() -> Vec<Value> {
    vec![
        json!({"id": 1, "nama": "Surat A", "deskripsi": "desc", "tanggal": "2024-01-01"}),
        json!({"id": 2, "nama": "Surat B", "deskripsi": null, "tanggal": "2024-02-01"}),
    ]
}

fn input(nama: &str, tanggal: &str) -> ArchiveInput {
    ArchiveInput::new(nama, tanggal.parse().unwrap())
}

#[tokio::test]
async fn test_list_all_decodes_records_and_forwards_query() {
    let (base_url, db) = spawn_backend(seed()).await;
    let client = HttpArchiveClient::new(&base_url).unwrap();

    let query = ListQuery::new().param("search", "surat");
    let records = client.list_all(&query).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, ArchiveId::new(1));
    assert_eq!(records[1].deskripsi, "");
    assert_eq!(
        db.lock().unwrap().last_query.get("search").map(String::as_str),
        Some("surat")
    );
}

#[tokio::test]
async fn test_create_returns_assigned_id() {
    let (base_url, _db) = spawn_backend(Vec::new()).await;
    let client = HttpArchiveClient::new(&base_url).unwrap();

    let created = client
        .create(&input("Surat A", "2024-01-01").with_deskripsi("desc"))
        .await
        .unwrap();

    assert_eq!(created.id, ArchiveId::new(1));
    assert_eq!(created.nama, "Surat A");
    assert_eq!(created.tanggal.to_string(), "2024-01-01");
}

#[tokio::test]
async fn test_validation_rejection_carries_status_and_body() {
    let (base_url, _db) = spawn_backend(Vec::new()).await;
    let client = HttpArchiveClient::new(&base_url).unwrap();

    let err = client.create(&input("  ", "2024-01-01")).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(err.is_client_error());
    assert!(err.body().unwrap().contains("may not be blank"));
}

#[tokio::test]
async fn test_update_and_delete_use_record_path() {
    let (base_url, db) = spawn_backend(seed()).await;
    let client = HttpArchiveClient::new(&format!("{}/", base_url)).unwrap();

    let updated = client
        .update(ArchiveId::new(2), &input("Surat B2", "2024-02-02"))
        .await
        .unwrap();
    assert_eq!(updated.nama, "Surat B2");

    client.delete(ArchiveId::new(1)).await.unwrap();
    let remaining = db.lock().unwrap().records.clone();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["nama"], "Surat B2");
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let (base_url, _db) = spawn_backend(seed()).await;
    let client = HttpArchiveClient::new(&base_url).unwrap();

    let err = client
        .update(ArchiveId::new(42), &input("Ghost", "2024-01-01"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = client.delete(ArchiveId::new(42)).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("/api/arsip/42/"));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpArchiveClient::new(&format!("http://{}/api", addr)).unwrap();
    let err = client.list_all(&ListQuery::new()).await.unwrap_err();

    assert!(matches!(err, TransportError::Network { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_store_round_trip_against_backend() {
    let (base_url, _db) = spawn_backend(Vec::new()).await;
    let store = ArchiveStore::new(HttpArchiveClient::new(&base_url).unwrap());

    store.refresh().await;
    assert!(store.records().is_empty());

    let created = store
        .create(&input("X", "2024-05-01").with_deskripsi("Y"))
        .await
        .unwrap();
    assert_eq!(store.records().len(), 1);

    let err = store
        .update(ArchiveId::new(99), &input("Z", "2024-05-02"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.records().len(), 1);

    store.delete(created.id).await.unwrap();
    assert!(store.records().is_empty());
}
