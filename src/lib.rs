//! Chatterbox TTS provider integration.
//!
//! Exposes a remote Chatterbox text-to-speech HTTP server as a pluggable
//! speech provider for a hosting automation platform. The crate validates
//! configuration, health-checks the server at setup, merges per-request
//! options with live selector state and configured defaults, translates
//! voice display names to server filenames (with a short TTL cache), and
//! returns raw audio bytes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use chatterbox_tts::{ChatterboxConfig, ChatterboxProvider, NoState, SynthesisOptions, TtsProvider};
//!
//! let config = ChatterboxConfig {
//!     host: "192.168.1.50".to_string(),
//!     ..Default::default()
//! };
//! let provider = ChatterboxProvider::new(config, Box::new(NoState))?;
//! provider.connect().await?;
//!
//! if let Some(audio) = provider.get_tts_audio("Hello", &SynthesisOptions::default()).await {
//!     println!("{} bytes of {}", audio.data.len(), audio.format);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod params;
pub mod provider;
pub mod voices;

// Re-export commonly used items for convenience
pub use client::{ChatterboxClient, HealthStatus, QueueStatus};
pub use config::{AudioOutputFormat, ChatterboxConfig};
pub use error::{TtsError, TtsResult};
pub use params::{EffectiveParameters, NoState, StateLookup, SynthesisOptions};
pub use provider::{ChatterboxProvider, TtsAudio, TtsProvider};
pub use voices::{VoiceCatalog, VoiceEntry};
