//! Chatterbox TTS provider.
//!
//! [`ChatterboxProvider`] is the object the hosting platform talks to:
//! it validates configuration, gates activation on a health probe,
//! resolves per-request parameters, translates voice display names to
//! server filenames, and turns HTTP outcomes into the platform's
//! two-valued result (audio or no audio).
//!
//! Synthesis failures never escape as errors. The platform contract is a
//! sentinel "no audio" result: a failed request is logged and yields
//! `None`, and the host simply produces no audio for that request.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::client::{ChatterboxClient, HealthStatus, QueueStatus};
use crate::config::{AudioOutputFormat, ChatterboxConfig, SUPPORTED_LANGUAGE};
use crate::error::{TtsError, TtsResult};
use crate::params::{EffectiveParameters, StateLookup, SynthesisOptions, resolve_parameters};
use crate::voices::{VoiceCatalog, fallback_voice_names, infer_filename};

/// Display name of this provider inside the hosting platform
pub const PROVIDER_NAME: &str = "Chatterbox TTS";

/// Languages this provider advertises
pub const SUPPORTED_LANGUAGES: [&str; 1] = [SUPPORTED_LANGUAGE];

/// Options a caller may override per request
pub const SUPPORTED_OPTIONS: [&str; 6] = [
    "voice",
    "temperature",
    "exaggeration",
    "cfg_weight",
    "seed",
    "speed_factor",
];

/// Synthesized audio handed back to the platform
#[derive(Debug, Clone)]
pub struct TtsAudio {
    /// Container format of the payload
    pub format: AudioOutputFormat,
    /// Raw audio bytes as returned by the server
    pub data: Bytes,
}

/// Platform-facing speech provider seam.
///
/// The hosting platform drives a cooperative scheduler; every method
/// here is async and never issues blocking I/O on the caller's thread.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Provider display name.
    fn name(&self) -> &str;

    /// Default language tag.
    fn default_language(&self) -> &str;

    /// Languages this provider can synthesize.
    fn supported_languages(&self) -> &[&str];

    /// Voice used when no override is supplied.
    fn default_voice(&self) -> &str;

    /// Option keys a caller may override per request.
    fn supported_options(&self) -> &[&str];

    /// One-shot setup probe. An error blocks activation.
    async fn connect(&self) -> TtsResult<()>;

    /// Voice display names, from the server catalog or the fallback list.
    async fn list_voices(&self) -> Vec<String>;

    /// Synthesize speech, or `None` when the server fails.
    async fn get_tts_audio(&self, message: &str, options: &SynthesisOptions) -> Option<TtsAudio>;
}

/// Chatterbox TTS provider implementation.
pub struct ChatterboxProvider {
    config: ChatterboxConfig,
    client: ChatterboxClient,
    catalog: tokio::sync::Mutex<VoiceCatalog>,
    states: Box<dyn StateLookup>,
}

impl ChatterboxProvider {
    /// Create a provider from validated configuration.
    ///
    /// `states` is the read-only accessor for the platform's live
    /// selector entities; inject [`crate::params::NoState`] on hosts
    /// without selectors.
    pub fn new(config: ChatterboxConfig, states: Box<dyn StateLookup>) -> TtsResult<Self> {
        config.validate().map_err(TtsError::InvalidConfiguration)?;

        let client = ChatterboxClient::new(config.base_url())?;
        debug!(base_url = %config.base_url(), "Chatterbox TTS provider initialized");

        Ok(Self {
            config,
            client,
            catalog: tokio::sync::Mutex::new(VoiceCatalog::new()),
            states,
        })
    }

    /// The configuration this provider was built with.
    pub fn config(&self) -> &ChatterboxConfig {
        &self.config
    }

    /// Typed server status from `/health`.
    pub async fn health(&self) -> TtsResult<HealthStatus> {
        self.client.health().await
    }

    /// Queue metrics from `/queue/status`, for status reporting only.
    pub async fn queue_status(&self) -> TtsResult<QueueStatus> {
        self.client.queue_status().await
    }

    /// Stop in-progress remote playback.
    pub async fn interrupt(&self) -> TtsResult<()> {
        self.client.interrupt().await?;
        info!("Chatterbox TTS playback interrupted");
        Ok(())
    }

    /// Resolve a voice display name to the server-side filename.
    ///
    /// Cached entries match first, stale or not. A miss triggers one
    /// fresh catalog fetch, which also refreshes the cache. If the name
    /// still cannot be resolved the filename is inferred from the name
    /// itself.
    pub async fn resolve_filename(&self, display_name: &str) -> String {
        {
            let catalog = self.catalog.lock().await;
            if let Some(filename) = catalog.filename_for(display_name) {
                return filename;
            }
        }

        match self.client.fetch_voices().await {
            Ok(entries) => {
                let mut catalog = self.catalog.lock().await;
                catalog.replace(entries);
                if let Some(filename) = catalog.filename_for(display_name) {
                    return filename;
                }
            }
            Err(err) => {
                error!(voice = %display_name, error = %err, "Failed to fetch voice catalog for filename lookup");
            }
        }

        let inferred = infer_filename(display_name);
        debug!(voice = %display_name, filename = %inferred, "Voice not in catalog, inferred filename");
        inferred
    }

    /// Resolve the effective parameters for one request.
    pub fn resolve(&self, options: &SynthesisOptions) -> EffectiveParameters {
        resolve_parameters(options, self.states.as_ref(), &self.config)
    }
}

#[async_trait]
impl TtsProvider for ChatterboxProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn default_language(&self) -> &str {
        SUPPORTED_LANGUAGE
    }

    fn supported_languages(&self) -> &[&str] {
        &SUPPORTED_LANGUAGES
    }

    fn default_voice(&self) -> &str {
        &self.config.voice
    }

    fn supported_options(&self) -> &[&str] {
        &SUPPORTED_OPTIONS
    }

    /// Probe the server once. A failed probe is a hard setup failure:
    /// activation is blocked rather than degraded.
    async fn connect(&self) -> TtsResult<()> {
        let url = format!("{}/health", self.client.base_url());

        if !self.client.check_connection().await {
            error!(url = %url, "Chatterbox TTS server not responding");
            return Err(TtsError::ConnectionFailed {
                url,
                reason: "health check failed".to_string(),
            });
        }

        info!(base_url = %self.client.base_url(), "Connected to Chatterbox TTS server");
        Ok(())
    }

    /// Voice display names with a 5 minute cache.
    ///
    /// A failed fetch returns the fallback list without touching the
    /// cache's freshness, so the next call retries immediately.
    async fn list_voices(&self) -> Vec<String> {
        let mut catalog = self.catalog.lock().await;

        if catalog.is_fresh() {
            let names = catalog.display_names();
            debug!(count = names.len(), "Returning cached voices");
            return names;
        }

        match self.client.fetch_voices().await {
            Ok(entries) => {
                catalog.replace(entries);
                catalog.display_names()
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch voices, using fallback list");
                fallback_voice_names()
            }
        }
    }

    async fn get_tts_audio(&self, message: &str, options: &SynthesisOptions) -> Option<TtsAudio> {
        if message.is_empty() {
            warn!("Refusing to synthesize empty message");
            return None;
        }

        let params = self.resolve(options);
        let voice_filename = self.resolve_filename(&params.voice).await;
        debug!(voice = %params.voice, filename = %voice_filename, "Using voice");

        match self
            .client
            .synthesize(message, &voice_filename, &params, self.config.output_format)
            .await
        {
            Ok(data) => Some(TtsAudio {
                format: self.config.output_format,
                data,
            }),
            Err(err) => {
                error!(error = %err, "Chatterbox TTS request failed");
                None
            }
        }
    }
}
