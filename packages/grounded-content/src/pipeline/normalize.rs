//! Request normalization - merge, validate, clamp.
//!
//! Raw input wins over stored preferences, which win over built-in
//! defaults. Pure computation: no side effects, no I/O.

use tracing::debug;

use crate::error::ValidationError;
use crate::types::request::{
    Constraints, ContentType, GenerationRequest, GroundingLevel, RawGenerationRequest,
    StoredPreferences,
};

/// Built-in defaults used when neither input nor preferences specify a field.
const DEFAULT_INDUSTRY: &str = "general";
const DEFAULT_TONE: &str = "professional";
const DEFAULT_AUDIENCE: &str = "general audience";

/// A validated request plus any non-fatal notes produced while building it.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    /// The immutable request handed to the rest of the pipeline
    pub request: GenerationRequest,

    /// Non-fatal notes (e.g. a clamped length constraint)
    pub warnings: Vec<String>,
}

/// Build a `GenerationRequest` from raw input and stored preferences.
///
/// Unknown `content_type` or `grounding_level` values fail with a
/// `ValidationError`; an over-ceiling `max_length` is silently clamped
/// and noted in `warnings`.
pub fn normalize(
    raw: &RawGenerationRequest,
    prefs: &StoredPreferences,
) -> Result<NormalizedRequest, ValidationError> {
    let mut warnings = Vec::new();

    let topic = raw
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ValidationError::new("topic", "required and must be non-empty"))?
        .to_string();

    let content_type = parse_field(
        "content_type",
        raw.content_type.as_deref(),
        prefs.content_type.as_deref(),
        ContentType::parse,
        ContentType::default(),
    )?;

    let grounding_level = parse_field(
        "grounding_level",
        raw.grounding_level.as_deref(),
        prefs.grounding_level.as_deref(),
        GroundingLevel::parse,
        GroundingLevel::default(),
    )?;

    let ceiling = content_type.length_ceiling();
    let max_length = raw.max_length.map(|requested| {
        if requested > ceiling {
            warnings.push(format!(
                "max_length {} exceeds the {} ceiling of {}; clamped",
                requested, content_type, ceiling
            ));
            ceiling
        } else {
            requested
        }
    });

    let constraints = Constraints {
        max_length,
        require_hashtags: raw
            .require_hashtags
            .or(prefs.require_hashtags)
            .unwrap_or(false),
        require_cta: raw.require_cta.or(prefs.require_cta).unwrap_or(false),
    };

    let request = GenerationRequest {
        topic,
        industry: merge_text(raw.industry.as_deref(), prefs.industry.as_deref(), DEFAULT_INDUSTRY),
        tone: merge_text(raw.tone.as_deref(), prefs.tone.as_deref(), DEFAULT_TONE),
        audience: merge_text(raw.audience.as_deref(), prefs.audience.as_deref(), DEFAULT_AUDIENCE),
        content_type,
        constraints,
        grounding_level,
    };

    debug!(
        topic = %request.topic,
        content_type = %request.content_type,
        grounding = ?request.grounding_level,
        warnings = warnings.len(),
        "Request normalized"
    );

    Ok(NormalizedRequest { request, warnings })
}

/// Merge a free-text field: raw over preference over default.
fn merge_text(raw: Option<&str>, pref: Option<&str>, default: &str) -> String {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| pref.map(str::trim).filter(|v| !v.is_empty()))
        .unwrap_or(default)
        .to_string()
}

/// Merge and parse an enum field; an unparseable explicit value is an error.
fn parse_field<T>(
    field: &str,
    raw: Option<&str>,
    pref: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
    default: T,
) -> Result<T, ValidationError> {
    match raw.or(pref) {
        Some(value) => parse(value)
            .ok_or_else(|| ValidationError::new(field, format!("unknown value '{}'", value))),
        None => Ok(default),
    }
}
