use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
};
use tea_storefront::{
    config::AppConfig,
    gateway::{HttpObjectStorage, ImageStorage},
};

#[derive(Debug, Clone)]
struct Received {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
}

type Log = Arc<Mutex<Vec<Received>>>;

/// Local stand-in for the object-storage endpoint that records each request
/// and answers with a fixed status and body.
async fn storage_server(status: StatusCode, reply: &'static str) -> (String, Log) {
    let log: Log = Arc::default();
    let recorder = log.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(Received {
                    method,
                    path: uri.path().to_string(),
                    headers,
                    body,
                });
                (status, reply)
            }
        },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), log)
}

fn storage_for(base_url: &str) -> HttpObjectStorage {
    let vars: HashMap<&str, String> = HashMap::from([
        ("SERVICE_URL", base_url.to_string()),
        ("SERVICE_API_KEY", "anon-key".to_string()),
        ("DATABASE_URL", "postgres://localhost/tea".to_string()),
    ]);
    let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("config");
    HttpObjectStorage::new(&config)
}

#[tokio::test]
async fn upload_posts_into_the_bucket_without_overwrite() {
    let (base_url, log) =
        storage_server(StatusCode::OK, r#"{"Key":"tea-varieties/abc.png"}"#).await;
    let storage = storage_for(&base_url);

    let path = storage
        .upload("abc.png", Some("image/png"), Bytes::from_static(b"\x89PNG"))
        .await
        .expect("upload");
    assert_eq!(path, "abc.png");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/storage/v1/object/tea-varieties/abc.png");
    assert_eq!(request.headers["x-upsert"], "false");
    assert_eq!(request.headers["apikey"], "anon-key");
    assert_eq!(request.headers["authorization"], "Bearer anon-key");
    assert_eq!(request.headers["content-type"], "image/png");
    assert_eq!(request.headers["cache-control"], "max-age=3600");
    assert_eq!(request.body, Bytes::from_static(b"\x89PNG"));
}

#[tokio::test]
async fn missing_content_type_is_sent_as_octet_stream() {
    let (base_url, log) = storage_server(StatusCode::OK, "{}").await;
    let storage = storage_for(&base_url);

    storage
        .upload("leaf.jpg", None, Bytes::from_static(b"jpeg"))
        .await
        .expect("upload");

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests[0].headers["content-type"], "application/octet-stream");
}

#[tokio::test]
async fn rejected_upload_surfaces_the_backend_message() {
    let (base_url, _log) = storage_server(
        StatusCode::BAD_REQUEST,
        r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#,
    )
    .await;
    let err = storage_for(&base_url)
        .upload("abc.png", None, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "The resource already exists");
}

#[tokio::test]
async fn error_field_is_used_when_message_is_absent() {
    let (base_url, _log) =
        storage_server(StatusCode::UNAUTHORIZED, r#"{"error":"Invalid JWT"}"#).await;
    let err = storage_for(&base_url)
        .upload("abc.png", None, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Invalid JWT");
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_the_status() {
    let (base_url, _log) =
        storage_server(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").await;
    let err = storage_for(&base_url)
        .upload("abc.png", None, Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Image upload failed with status 500 Internal Server Error"
    );
}
