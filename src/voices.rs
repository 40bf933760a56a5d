//! Voice catalog and cache.
//!
//! The Chatterbox server advertises its predefined voices as
//! `{display_name, filename}` pairs via `/get_predefined_voices`. The
//! catalog changes rarely and fetching it is a network round trip, so a
//! short TTL cache bounds staleness without paying a request per
//! synthesis call. The TTL is a fixed constant, not configurable.
//!
//! When the server is unreachable a hard-coded fallback list keeps the
//! voice dropdown populated; the fallback never touches the cache's
//! freshness, so the next call retries the fetch immediately.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How long a fetched voice catalog stays fresh
pub const VOICE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Extension appended when a voice name cannot be resolved to a filename
const DEFAULT_VOICE_EXTENSION: &str = ".wav";

/// Voices offered when the server cannot be reached
pub const FALLBACK_VOICES: [&str; 28] = [
    "Abigail", "Adrian", "Alexander", "Alice", "Austin", "Axel", "Connor",
    "Cora", "Elena", "Eli", "Emily", "Everett", "Gabriel", "Gianna", "Henry",
    "Ian", "Jade", "Jeremiah", "Jordan", "Julian", "Layla", "Leonardo",
    "Michael", "Miles", "Olivia", "Ryan", "Taylor", "Thomas",
];

/// One server-advertised voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceEntry {
    /// Human-readable name, unique within a catalog snapshot
    pub display_name: String,
    /// Server-side identifier, conventionally ending in `.wav`
    pub filename: String,
}

/// TTL-cached snapshot of the server's voice catalog.
///
/// Replaced wholesale on each successful refresh, never partially
/// updated. Owned by the provider instance behind a mutex; concurrent
/// refreshes serialize there so the server is not stampeded.
#[derive(Debug, Default)]
pub struct VoiceCatalog {
    entries: Vec<VoiceEntry>,
    fetched_at: Option<Instant>,
}

impl VoiceCatalog {
    /// Empty, stale catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last successful fetch is still within the TTL.
    pub fn is_fresh(&self) -> bool {
        self.fetched_at
            .is_some_and(|at| at.elapsed() < VOICE_CACHE_TTL)
    }

    /// Whether any snapshot has been stored, fresh or stale.
    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Replace the snapshot with a freshly fetched catalog.
    pub fn replace(&mut self, entries: Vec<VoiceEntry>) {
        self.entries = entries;
        self.fetched_at = Some(Instant::now());
    }

    /// Display names in the server's original order.
    pub fn display_names(&self) -> Vec<String> {
        self.entries.iter().map(|v| v.display_name.clone()).collect()
    }

    /// Filename for an exact display-name match.
    ///
    /// Matching is case-sensitive and exact; stale entries still match.
    pub fn filename_for(&self, display_name: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|v| v.display_name == display_name)
            .map(|v| v.filename.clone())
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, age: Duration) {
        self.fetched_at = Instant::now().checked_sub(age);
    }
}

/// Last-resort voice filename inference.
///
/// If the name already carries a recognized audio extension it is assumed
/// to be a filename; otherwise the default extension is appended.
pub fn infer_filename(voice_name: &str) -> String {
    if voice_name.ends_with(".wav") || voice_name.ends_with(".mp3") {
        voice_name.to_string()
    } else {
        format!("{voice_name}{DEFAULT_VOICE_EXTENSION}")
    }
}

/// The fallback voice names as owned strings.
pub fn fallback_voice_names() -> Vec<String> {
    FALLBACK_VOICES.iter().map(|v| (*v).to_string()).collect()
}
