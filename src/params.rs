//! Per-request parameter resolution.
//!
//! Every synthesis call merges three sources into one effective parameter
//! set, in fixed priority order:
//!
//! 1. The per-call [`SynthesisOptions`] (explicit, non-empty values only)
//! 2. Live selector state read through the injected [`StateLookup`]
//!    accessor (the end user can change these without reconfiguring)
//! 3. The provider's configured defaults
//!
//! One deliberate asymmetry: `seed` keeps an explicit `0` as a valid
//! value, while the float parameters treat `0.0` as "not provided" and
//! fall through to the next source. A seed of zero is a legitimate seed;
//! a temperature of zero is an unset selector.

use serde::Deserialize;

use crate::config::ChatterboxConfig;

/// Selector entity holding the live voice override
pub const VOICE_SELECT_ENTITY: &str = "input_select.chatterbox_voice";
/// Selector entity holding the live temperature override
pub const TEMPERATURE_SELECT_ENTITY: &str = "input_select.chatterbox_temperature";
/// Selector entity holding the live exaggeration override
pub const EXAGGERATION_SELECT_ENTITY: &str = "input_select.chatterbox_exaggeration";
/// Selector entity holding the live cfg weight override
pub const CFG_WEIGHT_SELECT_ENTITY: &str = "input_select.chatterbox_cfg";
/// Selector entity holding the live speed factor override
pub const SPEED_SELECT_ENTITY: &str = "input_select.chatterbox_speed";

/// Read-only accessor for live platform state.
///
/// The hosting platform exposes user-facing selector entities whose
/// current value can override configured defaults per request. The
/// provider only ever reads through this seam; a platform without
/// selectors can inject [`NoState`].
pub trait StateLookup: Send + Sync {
    /// Current state of the entity, or `None` if the entity does not exist.
    fn get(&self, entity_id: &str) -> Option<String>;
}

/// A [`StateLookup`] with no entities, for hosts without live selectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoState;

impl StateLookup for NoState {
    fn get(&self, _entity_id: &str) -> Option<String> {
        None
    }
}

/// Per-call synthesis options.
///
/// All fields are optional; any omitted field falls through to selector
/// state and then to the configured default. Deserialized once at the
/// platform boundary rather than probed field-by-field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynthesisOptions {
    /// Voice display name
    #[serde(default)]
    pub voice: Option<String>,
    /// Sampling temperature (0.0 to 1.0)
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Emotion exaggeration (0.0 to 2.0)
    #[serde(default)]
    pub exaggeration: Option<f64>,
    /// Classifier-free guidance weight (0.0 to 1.0)
    #[serde(default)]
    pub cfg_weight: Option<f64>,
    /// Generation seed (0 is valid and honored)
    #[serde(default)]
    pub seed: Option<i64>,
    /// Playback speed factor (0.5 to 2.0)
    #[serde(default)]
    pub speed_factor: Option<f64>,
}

/// Fully resolved synthesis parameters for one request.
///
/// Every field holds exactly one final value; resolution never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveParameters {
    pub voice: String,
    pub temperature: f64,
    pub exaggeration: f64,
    pub cfg_weight: f64,
    pub seed: i64,
    pub speed_factor: f64,
}

/// Resolve per-call options against selector state and configured defaults.
pub fn resolve_parameters(
    options: &SynthesisOptions,
    states: &dyn StateLookup,
    config: &ChatterboxConfig,
) -> EffectiveParameters {
    let voice = options
        .voice
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| states.get(VOICE_SELECT_ENTITY).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| config.voice.clone());

    let temperature = resolve_float(
        options.temperature,
        states,
        TEMPERATURE_SELECT_ENTITY,
        config.temperature,
    );
    let exaggeration = resolve_float(
        options.exaggeration,
        states,
        EXAGGERATION_SELECT_ENTITY,
        config.exaggeration,
    );
    let cfg_weight = resolve_float(
        options.cfg_weight,
        states,
        CFG_WEIGHT_SELECT_ENTITY,
        config.cfg_weight,
    );
    let speed_factor = resolve_float(
        options.speed_factor,
        states,
        SPEED_SELECT_ENTITY,
        config.speed_factor,
    );

    // Seed has no selector source and an explicit 0 is honored.
    let seed = options.seed.unwrap_or(config.seed);

    EffectiveParameters {
        voice,
        temperature,
        exaggeration,
        cfg_weight,
        seed,
        speed_factor,
    }
}

/// Resolve one float parameter: explicit non-zero option, then a parsable
/// non-zero selector state, then the configured default.
fn resolve_float(
    option: Option<f64>,
    states: &dyn StateLookup,
    entity_id: &str,
    default: f64,
) -> f64 {
    if let Some(value) = option.filter(|v| *v != 0.0) {
        return value;
    }
    if let Some(value) = states
        .get(entity_id)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| *v != 0.0)
    {
        return value;
    }
    default
}
