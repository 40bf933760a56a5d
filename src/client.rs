//! HTTP client for the Chatterbox TTS server.
//!
//! Thin typed wrapper over the server's REST API:
//!
//! - `GET /health` - server status, used as the setup-time probe
//! - `GET /get_predefined_voices` - voice catalog
//! - `POST /tts` - synthesis, raw audio bytes in the response body
//! - `POST /interrupt` - stop in-progress remote playback
//! - `GET /queue/status` - queue metrics for status reporting
//!
//! Every call carries a bounded timeout and issues exactly one request;
//! there is deliberately no retry. Failures map to [`TtsError`] here and
//! are downgraded to fallback/sentinel outcomes at the provider boundary.

use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AudioOutputFormat;
use crate::error::{TtsError, TtsResult};
use crate::params::EffectiveParameters;
use crate::voices::VoiceEntry;

/// Timeout for synthesis requests
pub const SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for the health probe
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for voice catalog fetches
pub const VOICES_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for interrupt and queue status calls
pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Wire Types
// =============================================================================

/// JSON body of a `POST /tts` request
#[derive(Debug, Serialize)]
struct SynthesisRequestBody<'a> {
    text: &'a str,
    predefined_voice_id: &'a str,
    temperature: f64,
    exaggeration: f64,
    cfg_weight: f64,
    seed: i64,
    speed_factor: f64,
    output_format: &'a str,
}

/// Server status reported by `GET /health`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthStatus {
    /// Overall server status, e.g. "ok"
    #[serde(default)]
    pub status: String,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Server version string
    #[serde(default)]
    pub version: String,
    /// Active character/persona, if the server exposes one
    #[serde(default)]
    pub character: String,
    /// Per-component status map
    #[serde(default)]
    pub components: serde_json::Map<String, serde_json::Value>,
}

/// Queue metrics reported by `GET /queue/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueStatus {
    /// Number of queued items
    #[serde(default)]
    pub queue_size: u32,
    /// Whether server-side queueing is enabled
    #[serde(default)]
    pub queue_enabled: bool,
    /// Whether the server is currently playing audio
    #[serde(default)]
    pub is_playing: bool,
    /// Identifier of the item being played, if any
    #[serde(default)]
    pub current_item: Option<String>,
    /// Estimated wait before a new item would play
    #[serde(default)]
    pub estimated_wait_seconds: f64,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client bound to one Chatterbox server.
pub struct ChatterboxClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatterboxClient {
    /// Create a client for the server at `base_url`.
    ///
    /// Timeouts are applied per request, not on the client, since the
    /// synthesis call allows a longer bound than the control calls.
    pub fn new(base_url: impl Into<String>) -> TtsResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TtsError::InvalidConfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One-shot connectivity probe for setup.
    ///
    /// Returns `true` only on HTTP 200; any other status, timeout, or
    /// connection error is `false`, never an error.
    pub async fn check_connection(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.http.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                debug!(url = %url, error = %err, "Health probe failed");
                false
            }
        }
    }

    /// Fetch the typed server status from `/health`.
    pub async fn health(&self) -> TtsResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);

        let response = self.http.get(&url).timeout(HEALTH_TIMEOUT).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid health payload: {e}")))
    }

    /// Fetch the voice catalog from `/get_predefined_voices`.
    pub async fn fetch_voices(&self) -> TtsResult<Vec<VoiceEntry>> {
        let url = format!("{}/get_predefined_voices", self.base_url);
        debug!(url = %url, "Fetching voice catalog");

        let response = self.http.get(&url).timeout(VOICES_TIMEOUT).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let voices: Vec<VoiceEntry> = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid voice catalog: {e}")))?;

        debug!(count = voices.len(), "Fetched voice catalog");
        Ok(voices)
    }

    /// Synthesize speech via `POST /tts`.
    ///
    /// One request, 30 second bound, no retry. HTTP 200 returns the raw
    /// response body unconditionally, even if it is empty.
    pub async fn synthesize(
        &self,
        text: &str,
        voice_filename: &str,
        params: &EffectiveParameters,
        output_format: AudioOutputFormat,
    ) -> TtsResult<Bytes> {
        let url = format!("{}/tts", self.base_url);

        let body = SynthesisRequestBody {
            text,
            predefined_voice_id: voice_filename,
            temperature: params.temperature,
            exaggeration: params.exaggeration,
            cfg_weight: params.cfg_weight,
            seed: params.seed,
            speed_factor: params.speed_factor,
            output_format: output_format.as_str(),
        };

        debug!(
            text_len = text.len(),
            voice = %voice_filename,
            temperature = params.temperature,
            exaggeration = params.exaggeration,
            cfg_weight = params.cfg_weight,
            seed = params.seed,
            speed_factor = params.speed_factor,
            format = %output_format,
            "Chatterbox TTS synthesis request"
        );

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(SYNTHESIS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let audio = response.bytes().await?;
        debug!(audio_bytes = audio.len(), "Chatterbox TTS synthesis complete");
        Ok(audio)
    }

    /// Interrupt in-progress remote playback via `POST /interrupt`.
    ///
    /// Fire-and-forget: success is HTTP 200, the response body is ignored.
    pub async fn interrupt(&self) -> TtsResult<()> {
        let url = format!("{}/interrupt", self.base_url);

        let response = self.http.post(&url).timeout(CONTROL_TIMEOUT).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Fetch queue metrics from `/queue/status`.
    pub async fn queue_status(&self) -> TtsResult<QueueStatus> {
        let url = format!("{}/queue/status", self.base_url);

        let response = self.http.get(&url).timeout(CONTROL_TIMEOUT).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<QueueStatus>()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Invalid queue status: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_body_serializes_all_fields() {
        let params = EffectiveParameters {
            voice: "Emily".to_string(),
            temperature: 0.8,
            exaggeration: 1.0,
            cfg_weight: 0.5,
            seed: 0,
            speed_factor: 1.0,
        };
        let body = SynthesisRequestBody {
            text: "Hello",
            predefined_voice_id: "Emily.wav",
            temperature: params.temperature,
            exaggeration: params.exaggeration,
            cfg_weight: params.cfg_weight,
            seed: params.seed,
            speed_factor: params.speed_factor,
            output_format: AudioOutputFormat::Wav.as_str(),
        };

        let json: serde_json::Value = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["predefined_voice_id"], "Emily.wav");
        assert_eq!(json["temperature"], 0.8);
        assert_eq!(json["exaggeration"], 1.0);
        assert_eq!(json["cfg_weight"], 0.5);
        assert_eq!(json["seed"], 0);
        assert_eq!(json["speed_factor"], 1.0);
        assert_eq!(json["output_format"], "wav");
    }

    #[test]
    fn test_queue_status_deserializes_documented_fields() {
        let status: QueueStatus = serde_json::from_str(
            r#"{
                "queue_size": 3,
                "queue_enabled": true,
                "is_playing": true,
                "current_item": "tts_output_20240101.wav",
                "estimated_wait_seconds": 12.5
            }"#,
        )
        .unwrap();
        assert_eq!(status.queue_size, 3);
        assert!(status.queue_enabled);
        assert!(status.is_playing);
        assert_eq!(status.current_item.as_deref(), Some("tts_output_20240101.wav"));
        assert_eq!(status.estimated_wait_seconds, 12.5);
    }

    #[test]
    fn test_health_status_tolerates_missing_fields() {
        let health: HealthStatus = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(health.status, "ok");
        assert!(health.message.is_empty());
        assert!(health.components.is_empty());
    }
}
