//! End-to-end integration tests for platereport.
//!
//! Each test runs the full pipeline against a one-shot recognition-service
//! stub bound to a loopback port, so the suite is hermetic: no credentials,
//! no network, no third party. The stub also captures the raw request it
//! received, letting the suite assert the wire contract (Basic auth header,
//! Accept header, JSON body fields) and not just the pipeline outcome.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use platereport::{
    generate, generate_to_file, CarRecord, DamageRecord, InMemoryVehicleStore, ReportConfig,
    ReportError, VehicleStore,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ── Recognition-service stub ─────────────────────────────────────────────────

/// The raw HTTP request the stub received, split at the header boundary.
struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.head
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with(&prefix))
            .map(|l| l[prefix.len()..].trim().to_string())
    }

    fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

/// Serve exactly one HTTP request on a loopback port, answering with the
/// given status line and body, and hand the captured request back.
async fn spawn_stub(
    status_line: &'static str,
    response_body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let url = format!("http://{}/", listener.local_addr().expect("stub addr"));
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut raw: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4096];

        // Read headers, then exactly Content-Length body bytes.
        let (head, body) = loop {
            let n = stream.read(&mut buf).await.expect("read request");
            assert!(n > 0, "client closed before sending a full request");
            raw.extend_from_slice(&buf[..n]);

            if let Some(split) = find_header_end(&raw) {
                let head = String::from_utf8_lossy(&raw[..split]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|l| {
                        l.to_ascii_lowercase()
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().expect("content-length"))
                    })
                    .unwrap_or(0);
                if raw.len() >= split + 4 + content_length {
                    break (head, raw[split + 4..split + 4 + content_length].to_vec());
                }
            }
        };

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
            response_body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.ok();

        tx.send(CapturedRequest { head, body }).ok();
    });

    (url, rx)
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

// ── Test fixtures ────────────────────────────────────────────────────────────

const IMAGE: &[u8] = b"fake image data";

fn test_config(url: &str) -> ReportConfig {
    ReportConfig::builder()
        .recognition_url(url)
        .credentials("user", "secret")
        .api_timeout_secs(5)
        .max_retries(0)
        .build()
        .expect("valid test config")
}

fn fleet_with_abc123() -> Arc<InMemoryVehicleStore> {
    let mut store = InMemoryVehicleStore::new();
    store.insert_car(CarRecord {
        license_plate: "ABC123".into(),
        model: "Test Model".into(),
        color: "Red".into(),
        vin_number: "1HGBH41JXMN109186".into(),
        brand: "Test Brand".into(),
    });
    store.insert_damage(
        "ABC123",
        DamageRecord {
            damage_type: "Scratch".into(),
            damaged_part: "Front Bumper".into(),
            date: "2023-01-01".into(),
        },
    );
    store.insert_damage(
        "ABC123",
        DamageRecord {
            damage_type: "Dent".into(),
            damaged_part: "Left Door".into(),
            date: "2023-01-02".into(),
        },
    );
    Arc::new(store)
}

/// A store that records whether the pipeline ever touched it.
struct TrackingStore {
    touched: Arc<AtomicBool>,
}

impl VehicleStore for TrackingStore {
    fn find_car_by_plate(&self, _plate: &str) -> Result<Option<CarRecord>, ReportError> {
        self.touched.store(true, Ordering::SeqCst);
        Ok(None)
    }

    fn list_damages_by_plate(&self, _plate: &str) -> Result<Vec<DamageRecord>, ReportError> {
        self.touched.store(true, Ordering::SeqCst);
        Ok(vec![])
    }
}

// ── Scenario 1: happy path ───────────────────────────────────────────────────

#[tokio::test]
async fn report_generated_for_known_car() {
    let (url, captured) = spawn_stub("HTTP/1.1 200 OK", r#"[{"plate_text": "ABC123"}]"#).await;

    let response = generate(IMAGE, fleet_with_abc123(), &test_config(&url))
        .await
        .expect("pipeline should succeed");

    assert_eq!(response.plate, "ABC123");
    assert_eq!(response.media_type(), "application/pdf");
    assert_eq!(
        response.content_disposition(),
        "attachment; filename=\"report.pdf\""
    );
    assert!(response.pdf.starts_with(b"%PDF"));
    assert_eq!(response.stats.damage_count, 2);

    let text = String::from_utf8_lossy(&response.pdf).to_string();
    for expected in [
        "Car Details:",
        "License Plate: ABC123",
        "Damages:",
        "Damage Type: Scratch",
        "Damage Type: Dent",
    ] {
        assert!(text.contains(expected), "PDF missing {expected:?}");
    }

    // Wire contract: Basic auth, Accept header, vendor body fields.
    let request = captured.await.expect("stub captured request");
    assert_eq!(
        request.header("authorization").as_deref(),
        Some(format!("Basic {}", STANDARD.encode("user:secret")).as_str())
    );
    assert_eq!(request.header("accept").as_deref(), Some("application/json"));

    let body = request.json_body();
    assert_eq!(body["base64ImageString"], STANDARD.encode(IMAGE));
    assert_eq!(body["languageCode"], "auto");
    assert_eq!(body["plate_output"], "yes");
}

// ── Scenario 2: car not found ────────────────────────────────────────────────

#[tokio::test]
async fn unknown_plate_maps_to_404_car_not_found() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", r#"[{"plate_text": "ABC123"}]"#).await;

    let store = Arc::new(InMemoryVehicleStore::new());
    let err = generate(IMAGE, store, &test_config(&url))
        .await
        .expect_err("no car should match");

    assert!(matches!(&err, ReportError::CarNotFound { plate } if plate == "ABC123"));
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.public_detail(), "Car not found");
}

// ── Scenario 3: recognition service rejects ──────────────────────────────────

#[tokio::test]
async fn upstream_500_passes_through_without_retry() {
    let (url, captured) = spawn_stub("HTTP/1.1 500 Internal Server Error", "{}").await;

    // A retry budget is configured, but a non-2xx answer must not spend it.
    let config = ReportConfig::builder()
        .recognition_url(url.as_str())
        .credentials("user", "secret")
        .api_timeout_secs(5)
        .max_retries(2)
        .build()
        .unwrap();

    let err = generate(IMAGE, fleet_with_abc123(), &config)
        .await
        .expect_err("upstream rejection should fail the run");

    assert!(matches!(err, ReportError::ExternalService { status: 500 }));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.public_detail(), "Failed to upload image to external API");

    // The one-shot stub saw the only request; a retry would have hung the
    // pipeline on a second connection instead.
    captured.await.expect("exactly one request served");
}

// ── Scenario 4: no plate in the OCR text ─────────────────────────────────────

#[tokio::test]
async fn pure_noise_text_never_touches_the_store() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", r#"[{"plate_text": "--- !!! ***"}]"#).await;

    let touched = Arc::new(AtomicBool::new(false));
    let store = Arc::new(TrackingStore {
        touched: Arc::clone(&touched),
    });

    let err = generate(IMAGE, store, &test_config(&url))
        .await
        .expect_err("noise text should not canonicalise");

    assert!(matches!(err, ReportError::NoPlateDetected));
    assert!(
        !touched.load(Ordering::SeqCst),
        "store must not be consulted when no plate was detected"
    );
}

// ── Malformed bodies ─────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_result_array_is_malformed() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", "[]").await;

    let err = generate(IMAGE, fleet_with_abc123(), &test_config(&url))
        .await
        .expect_err("empty array should fail");

    assert!(matches!(err, ReportError::MalformedResponse { .. }));
    // Outwardly equivalent to "no plate detected".
    assert_eq!(err.status_code(), ReportError::NoPlateDetected.status_code());
}

#[tokio::test]
async fn missing_plate_text_field_is_malformed() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", r#"[{"confidence": 0.92}]"#).await;

    let err = generate(IMAGE, fleet_with_abc123(), &test_config(&url))
        .await
        .expect_err("missing field should fail");

    assert!(matches!(err, ReportError::MalformedResponse { .. }));
}

#[tokio::test]
async fn non_array_body_is_malformed() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", r#"{"plate_text": "ABC123"}"#).await;

    let err = generate(IMAGE, fleet_with_abc123(), &test_config(&url))
        .await
        .expect_err("object body should fail");

    assert!(matches!(err, ReportError::MalformedResponse { .. }));
}

// ── Transport failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_endpoint_exhausts_retry_budget() {
    // Bind then drop: the port is very likely unbound when the call runs.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let config = ReportConfig::builder()
        .recognition_url(url.as_str())
        .credentials("user", "secret")
        .api_timeout_secs(1)
        .max_retries(1)
        .retry_backoff_ms(10)
        .build()
        .unwrap();

    let err = generate(IMAGE, fleet_with_abc123(), &config)
        .await
        .expect_err("nothing is listening");

    assert!(
        matches!(err, ReportError::ExternalServiceUnreachable { attempts: 2, .. }),
        "got: {err:?}"
    );
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.public_detail(), "Failed to upload image to external API");
}

// ── Canonicalisation through the full pipeline ───────────────────────────────

#[tokio::test]
async fn doubled_ocr_plate_collapses_before_lookup() {
    let (url, _captured) =
        spawn_stub("HTTP/1.1 200 OK", r#"[{"plate_text": "ABC123ABC123"}]"#).await;

    let response = generate(IMAGE, fleet_with_abc123(), &test_config(&url))
        .await
        .expect("doubled plate should collapse to ABC123");

    assert_eq!(response.plate, "ABC123");
    assert_eq!(response.document.car.license_plate, "ABC123");
}

// ── File output ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_to_file_writes_complete_pdf() {
    let (url, _captured) = spawn_stub("HTTP/1.1 200 OK", r#"[{"plate_text": "ABC123"}]"#).await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.pdf");

    let stats = generate_to_file(IMAGE, fleet_with_abc123(), &test_config(&url), &out)
        .await
        .expect("report should be written");

    assert_eq!(stats.damage_count, 2);
    let pdf = std::fs::read(&out).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(pdf.ends_with(b"%%EOF\n"));
    // No stray temp file left behind.
    assert!(!dir.path().join("report.pdf.tmp").exists());
}
