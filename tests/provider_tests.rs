//! End-to-end provider tests against a mocked Chatterbox server.
//!
//! These tests verify transport-level behavior: health gating at setup,
//! voice catalog fetching and caching, filename resolution fallbacks,
//! and the sentinel "no audio" contract on synthesis failure.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatterbox_tts::{
    ChatterboxClient, ChatterboxConfig, ChatterboxProvider, NoState, SynthesisOptions, TtsError,
    TtsProvider,
};

/// Build a provider pointed at the mock server.
fn provider_for(server: &MockServer) -> ChatterboxProvider {
    let url = url::Url::parse(&server.uri()).expect("mock server uri");
    let config = ChatterboxConfig {
        host: url.host_str().expect("mock host").to_string(),
        port: url.port().expect("mock port"),
        ..Default::default()
    };
    ChatterboxProvider::new(config, Box::new(NoState)).expect("valid config")
}

fn voices_body() -> serde_json::Value {
    json!([
        {"display_name": "Emily", "filename": "Emily.wav"},
        {"display_name": "Marcus", "filename": "Marcus.wav"}
    ])
}

// =============================================================================
// Health / Setup
// =============================================================================

#[tokio::test]
async fn connect_succeeds_on_healthy_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert!(provider.connect().await.is_ok());
}

#[tokio::test]
async fn connect_fails_on_unhealthy_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.connect().await.unwrap_err();
    assert!(matches!(err, TtsError::ConnectionFailed { .. }));
}

#[tokio::test]
async fn connect_fails_when_server_is_down() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    assert!(provider.connect().await.is_err());
}

#[tokio::test]
async fn check_connection_returns_false_on_timeout_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(15)))
        .mount(&server)
        .await;

    let client = ChatterboxClient::new(server.uri()).unwrap();
    assert!(!client.check_connection().await);
}

#[tokio::test]
async fn health_returns_typed_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": "ready",
            "version": "1.4.2",
            "character": "default",
            "components": {"engine": "ok"}
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let health = provider.health().await.unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, "1.4.2");
    assert_eq!(health.components["engine"], "ok");
}

// =============================================================================
// Voice Catalog
// =============================================================================

#[tokio::test]
async fn list_voices_fetches_and_caches_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let first = provider.list_voices().await;
    assert_eq!(first, vec!["Emily", "Marcus"]);

    // Second call within the TTL must come from the cache, same order.
    let second = provider.list_voices().await;
    assert_eq!(second, first);
}

#[tokio::test]
async fn list_voices_falls_back_when_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let voices = provider.list_voices().await;
    assert_eq!(voices.len(), 28);
    assert!(voices.contains(&"Emily".to_string()));
}

#[tokio::test]
async fn fallback_does_not_freshen_cache() {
    let server = MockServer::start().await;
    let failing = Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.list_voices().await.len(), 28);
    drop(failing);

    // The failed fetch left the cache stale, so the next call retries
    // immediately and picks up the real catalog.
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(provider.list_voices().await, vec!["Emily", "Marcus"]);
}

#[tokio::test]
async fn resolve_filename_matches_catalog_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.resolve_filename("Emily").await, "Emily.wav");
}

#[tokio::test]
async fn resolve_filename_infers_when_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert_eq!(provider.resolve_filename("Unknown").await, "Unknown.wav");
    assert_eq!(provider.resolve_filename("Custom.mp3").await, "Custom.mp3");
}

#[tokio::test]
async fn resolve_filename_uses_cache_without_refetching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    provider.list_voices().await;
    // Both lookups are served from the cached snapshot.
    assert_eq!(provider.resolve_filename("Emily").await, "Emily.wav");
    assert_eq!(provider.resolve_filename("Marcus").await, "Marcus.wav");
}

// =============================================================================
// Synthesis
// =============================================================================

#[tokio::test]
async fn synthesis_returns_audio_bytes_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF....WAVE".to_vec()))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let audio = provider
        .get_tts_audio("Hello", &SynthesisOptions::default())
        .await
        .expect("audio");
    assert_eq!(audio.format.as_str(), "wav");
    assert_eq!(audio.data.as_ref(), b"RIFF....WAVE");
}

#[tokio::test]
async fn synthesis_returns_sentinel_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let audio = provider
        .get_tts_audio("Hello", &SynthesisOptions::default())
        .await;
    assert!(audio.is_none());
}

#[tokio::test]
async fn synthesis_returns_sentinel_when_server_is_down() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    let audio = provider
        .get_tts_audio("Hello", &SynthesisOptions::default())
        .await;
    assert!(audio.is_none());
}

#[tokio::test]
async fn synthesis_accepts_empty_audio_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let audio = provider
        .get_tts_audio("Hello", &SynthesisOptions::default())
        .await
        .expect("200 yields audio even with an empty body");
    assert!(audio.data.is_empty());
}

#[tokio::test]
async fn synthesis_request_carries_resolved_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;
    // The end-to-end defaults scenario: empty options, no selector state,
    // so the request body must equal the configured defaults with the
    // default voice resolved to its catalog filename.
    Mock::given(method("POST"))
        .and(path("/tts"))
        .and(body_partial_json(json!({
            "text": "Hello",
            "predefined_voice_id": "Emily.wav",
            "temperature": 0.8,
            "exaggeration": 1.0,
            "cfg_weight": 0.5,
            "seed": 0,
            "speed_factor": 1.0,
            "output_format": "wav"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let audio = provider
        .get_tts_audio("Hello", &SynthesisOptions::default())
        .await;
    assert!(audio.is_some());
}

#[tokio::test]
async fn synthesis_honors_explicit_zero_seed() {
    let server = MockServer::start().await;
    let url = url::Url::parse(&server.uri()).unwrap();
    let config = ChatterboxConfig {
        host: url.host_str().unwrap().to_string(),
        port: url.port().unwrap(),
        seed: 42,
        ..Default::default()
    };
    let provider = ChatterboxProvider::new(config, Box::new(NoState)).unwrap();

    Mock::given(method("GET"))
        .and(path("/get_predefined_voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(voices_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .and(body_partial_json(json!({"seed": 0})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFF".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let options = SynthesisOptions {
        seed: Some(0),
        ..Default::default()
    };
    assert!(provider.get_tts_audio("Hello", &options).await.is_some());
}

// =============================================================================
// Interrupt / Queue Status
// =============================================================================

#[tokio::test]
async fn interrupt_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/interrupt"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    assert!(provider.interrupt().await.is_ok());
}

#[tokio::test]
async fn interrupt_reports_api_error_on_non_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/interrupt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.interrupt().await.unwrap_err();
    assert!(matches!(err, TtsError::ApiError { status: 503, .. }));
}

#[tokio::test]
async fn queue_status_deserializes_server_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queue/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queue_size": 2,
            "queue_enabled": true,
            "is_playing": false,
            "current_item": null,
            "estimated_wait_seconds": 4.0
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let status = provider.queue_status().await.unwrap();
    assert_eq!(status.queue_size, 2);
    assert!(status.queue_enabled);
    assert!(!status.is_playing);
    assert!(status.current_item.is_none());
}
