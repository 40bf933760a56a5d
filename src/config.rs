//! Configuration for the Chatterbox TTS provider.
//!
//! The hosting platform hands this crate a [`ChatterboxConfig`] once at
//! setup; it is immutable for the provider's lifetime. Validation happens
//! here, at the boundary, so out-of-range values surface as a setup
//! failure rather than mid-synthesis surprises.
//!
//! # Parameter ranges
//!
//! - `temperature`: 0.0 to 1.0
//! - `exaggeration`: 0.0 to 2.0
//! - `cfg_weight`: 0.0 to 1.0
//! - `speed_factor`: 0.5 to 2.0
//! - `seed`: any integer (0 is a valid seed, not "unset")

use serde::{Deserialize, Serialize};

/// Default Chatterbox server host
pub const DEFAULT_HOST: &str = "172.30.3.9";
/// Default Chatterbox server port
pub const DEFAULT_PORT: u16 = 8005;
/// Default voice display name
pub const DEFAULT_VOICE: &str = "Emily";
/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
/// Default emotion exaggeration
pub const DEFAULT_EXAGGERATION: f64 = 1.0;
/// Default classifier-free guidance weight
pub const DEFAULT_CFG_WEIGHT: f64 = 0.5;
/// Default generation seed
pub const DEFAULT_SEED: i64 = 0;
/// Default playback speed factor
pub const DEFAULT_SPEED_FACTOR: f64 = 1.0;
/// The single locale this provider advertises
pub const SUPPORTED_LANGUAGE: &str = "en-US";

// =============================================================================
// Audio Output Format
// =============================================================================

/// Audio container requested from the Chatterbox server.
///
/// The server can return either an uncompressed WAV container or MP3.
/// WAV is the canonical default; the bytes are passed through untouched
/// either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioOutputFormat {
    /// Uncompressed WAV container
    #[default]
    Wav,
    /// MP3 compressed container
    Mp3,
}

impl AudioOutputFormat {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }

    /// Parse from string, with fallback to default.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mp3" => Self::Mp3,
            _ => Self::Wav,
        }
    }
}

impl std::fmt::Display for AudioOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Chatterbox TTS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatterboxConfig {
    /// Chatterbox server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Chatterbox server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default voice display name
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Default sampling temperature (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Default emotion exaggeration (0.0 to 2.0)
    #[serde(default = "default_exaggeration")]
    pub exaggeration: f64,

    /// Default classifier-free guidance weight (0.0 to 1.0)
    #[serde(default = "default_cfg_weight")]
    pub cfg_weight: f64,

    /// Default generation seed
    #[serde(default)]
    pub seed: i64,

    /// Default playback speed factor (0.5 to 2.0)
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,

    /// Audio container requested from the server
    #[serde(default)]
    pub output_format: AudioOutputFormat,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_exaggeration() -> f64 {
    DEFAULT_EXAGGERATION
}

fn default_cfg_weight() -> f64 {
    DEFAULT_CFG_WEIGHT
}

fn default_speed_factor() -> f64 {
    DEFAULT_SPEED_FACTOR
}

impl Default for ChatterboxConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            voice: default_voice(),
            temperature: default_temperature(),
            exaggeration: default_exaggeration(),
            cfg_weight: default_cfg_weight(),
            seed: DEFAULT_SEED,
            speed_factor: default_speed_factor(),
            output_format: AudioOutputFormat::default(),
        }
    }
}

impl ChatterboxConfig {
    /// Base URL for all API calls, derived from host and port.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Validate the configuration.
    ///
    /// Returns a message describing the first violated constraint. Run at
    /// setup only; a valid config stays valid for the provider's lifetime.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("port must be non-zero".to_string());
        }
        if self.voice.trim().is_empty() {
            return Err("voice must not be empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ));
        }
        if !(0.0..=2.0).contains(&self.exaggeration) {
            return Err(format!(
                "exaggeration must be between 0.0 and 2.0, got {}",
                self.exaggeration
            ));
        }
        if !(0.0..=1.0).contains(&self.cfg_weight) {
            return Err(format!(
                "cfg_weight must be between 0.0 and 1.0, got {}",
                self.cfg_weight
            ));
        }
        if !(0.5..=2.0).contains(&self.speed_factor) {
            return Err(format!(
                "speed_factor must be between 0.5 and 2.0, got {}",
                self.speed_factor
            ));
        }
        Ok(())
    }
}
